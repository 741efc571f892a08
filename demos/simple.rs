use std::sync::Arc;
use std::time::Duration;

use cloudwatch_metrics::metrics::{MetricsRegistry, Timer};
use cloudwatch_metrics::publisher::{self, LoggingClient, PublisherConfig, Sink};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 1. Registry with one timer ───────────────────────────────
    let registry = Arc::new(MetricsRegistry::new());
    let timer = Arc::new(Timer::new());
    if let Err(e) = registry.register("sample", timer.clone()) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    timer.update(Duration::from_millis(1));

    // ── 2. Stop on Ctrl-C ────────────────────────────────────────
    let token = CancellationToken::new();
    let stop = token.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        stop.cancel();
    });

    // ── 3. Publish every 5 s until stopped ───────────────────────
    let config = PublisherConfig::builder()
        .interval(Duration::from_secs(5))
        .dimensions(["taskID", "123"])
        .percentiles([0.5, 0.75, 0.95, 0.99])
        .cancellation(token)
        .log(Sink::stderr())
        .debug(Sink::stdout())
        .build();

    println!("Publishing to sample-namespace every 5s, Ctrl-C to stop");
    publisher::publish(LoggingClient::new(), registry, "sample-namespace", config).await;
    println!("   ✓ stopped");
}
