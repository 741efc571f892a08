use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::datum::Dimension;

// ─── Defaults ────────────────────────────────────────────────────

/// Flush period when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Quantiles reported for histograms and timers when none are configured.
pub const DEFAULT_PERCENTILES: [f64; 4] = [0.5, 0.75, 0.95, 0.99];

// ─── Sink ────────────────────────────────────────────────────────

/// Plain-text line sink for debug traces or error logs.
/// Write failures are ignored.
#[derive(Clone)]
pub struct Sink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    fn line(&self, msg: &str) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{msg}");
        let _ = writer.flush();
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sink")
    }
}

// ─── PublisherConfig ─────────────────────────────────────────────

/// Immutable publisher settings. Build one with [`PublisherConfig::builder`].
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    interval: Duration,
    percentiles: Vec<f64>,
    dimensions: Arc<[Dimension]>,
    cancellation: CancellationToken,
    debug: Option<Sink>,
    log: Option<Sink>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PublisherConfig {
    pub fn builder() -> PublisherConfigBuilder {
        PublisherConfigBuilder::default()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Shared handle to the dimension set, attached to every datum.
    pub(crate) fn shared_dimensions(&self) -> Arc<[Dimension]> {
        Arc::clone(&self.dimensions)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Verbose trace: `tracing::debug!` plus the debug sink, if any.
    pub(crate) fn debug(&self, msg: &str) {
        tracing::debug!(target: "cloudwatch_metrics", "{msg}");
        if let Some(sink) = &self.debug {
            sink.line(msg);
        }
    }

    /// Error report: `tracing::error!` plus the log sink, if any.
    pub(crate) fn error(&self, msg: &str) {
        tracing::error!(target: "cloudwatch_metrics", "{msg}");
        if let Some(sink) = &self.log {
            sink.line(msg);
        }
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "cloudwatch_metrics", "{msg}");
        if let Some(sink) = &self.log {
            sink.line(msg);
        }
    }
}

// ─── Builder ─────────────────────────────────────────────────────

/// Collects options; invalid ones are dropped and reported on `build()`.
#[derive(Debug, Default)]
pub struct PublisherConfigBuilder {
    interval: Option<Duration>,
    percentiles: Option<Vec<f64>>,
    dimensions: Vec<Dimension>,
    cancellation: Option<CancellationToken>,
    debug: Option<Sink>,
    log: Option<Sink>,
    warnings: Vec<String>,
}

impl PublisherConfigBuilder {
    /// Flush period. Defaults to one minute.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Append dimensions from alternating key, value arguments.
    /// An odd number of arguments is rejected and adds nothing.
    pub fn dimensions<I, S>(mut self, keys_and_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = keys_and_values.into_iter().map(Into::into).collect();
        if args.len() % 2 != 0 {
            self.warnings
                .push("Dimensions requires an even number of arguments".to_string());
            return self;
        }

        let mut args = args.into_iter();
        while let (Some(name), Some(value)) = (args.next(), args.next()) {
            self.dimensions.push(Dimension { name, value });
        }
        self
    }

    /// Replace the reported quantiles. Values outside `[0, 1]` are dropped.
    pub fn percentiles(mut self, percentiles: impl IntoIterator<Item = f64>) -> Self {
        let mut kept = Vec::new();
        for q in percentiles {
            if (0.0..=1.0).contains(&q) {
                kept.push(q);
            } else {
                self.warnings
                    .push(format!("Percentiles ignores {q}: quantiles must be within [0, 1]"));
            }
        }
        self.percentiles = Some(kept);
        self
    }

    /// External stop signal. Without one the publisher runs until its
    /// own token (see [`PublisherConfig::cancellation`]) is cancelled.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn debug(mut self, sink: Sink) -> Self {
        self.debug = Some(sink);
        self
    }

    pub fn log(mut self, sink: Sink) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn build(self) -> PublisherConfig {
        let config = PublisherConfig {
            interval: self.interval.unwrap_or(DEFAULT_INTERVAL),
            percentiles: self
                .percentiles
                .unwrap_or_else(|| DEFAULT_PERCENTILES.to_vec()),
            dimensions: Arc::from(self.dimensions),
            cancellation: self.cancellation.unwrap_or_default(),
            debug: self.debug,
            log: self.log,
        };

        for warning in &self.warnings {
            config.warn(warning);
        }
        config
    }
}
