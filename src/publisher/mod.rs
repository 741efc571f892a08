//! Periodic flush of a metrics registry to a `PutMetricData` endpoint.
//!
//! Each cycle: wait one interval, translate the registry into data points,
//! submit them in chunks of at most 20. Cancellation is only observed while
//! waiting; a cycle that has started always runs to completion.

pub mod batch;
pub mod client;
pub mod config;
pub mod datum;
pub mod translate;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::PublishError;
use crate::metrics::Registry;

pub use batch::{publish_metrics, PublishSummary, MAX_DATUMS_PER_REQUEST};
pub use client::{LoggingClient, PutMetricsClient};
pub use config::{PublisherConfig, PublisherConfigBuilder, Sink};
pub use datum::{Dimension, MetricDatum, PutMetricDataInput, StandardUnit};
pub use translate::read_metrics;

/// Owns everything one publish loop needs. Runs once, until cancelled.
pub struct Publisher<C, R: ?Sized> {
    client: C,
    registry: Arc<R>,
    namespace: String,
    config: PublisherConfig,
}

impl<C, R> Publisher<C, R>
where
    C: PutMetricsClient,
    R: Registry + ?Sized,
{
    pub fn new(
        client: C,
        registry: Arc<R>,
        namespace: impl Into<String>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            client,
            registry,
            namespace: namespace.into(),
            config,
        }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Translate the registry's current state without sending it.
    pub fn read_metrics(&self) -> Vec<MetricDatum> {
        read_metrics(self.registry.as_ref(), &self.config)
    }

    /// One full cycle: read, then submit in chunks.
    pub async fn flush(&self) -> Result<PublishSummary, PublishError> {
        let data = self.read_metrics();
        publish_metrics(&self.client, &self.namespace, data).await
    }

    /// Wait → flush → wait … until the cancellation token fires.
    /// Failed cycles are logged and the next interval is tried again.
    pub async fn run(self) {
        let cancellation = self.config.cancellation().clone();
        let interval = self.config.interval();

        loop {
            self.config.debug(&format!("waiting ... {interval:?}"));

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    tracing::info!(
                        target: "cloudwatch_metrics",
                        namespace = %self.namespace,
                        "Metrics publisher shutdown requested"
                    );
                    return;
                }
                _ = tokio::time::sleep(interval) => {
                    match self.flush().await {
                        Ok(summary) => {
                            tracing::debug!(
                                target: "cloudwatch_metrics",
                                namespace = %self.namespace,
                                requests = summary.requests,
                                datums = summary.datums,
                                "Published metrics"
                            );
                        }
                        Err(err) => {
                            self.config.error(&format!(
                                "failed to publish metrics to CloudWatch: {err}"
                            ));
                        }
                    }
                }
            }
        }
    }
}

/// Publish `registry` to `namespace` every interval, on the caller's task.
/// Returns once `config`'s cancellation token is cancelled.
pub async fn publish<C, R>(
    client: C,
    registry: Arc<R>,
    namespace: impl Into<String>,
    config: PublisherConfig,
) where
    C: PutMetricsClient,
    R: Registry + ?Sized,
{
    Publisher::new(client, registry, namespace, config).run().await;
}

/// Like [`publish`], but on a background task. Cancel through the config's
/// token; the handle resolves once the loop has stopped.
pub fn spawn<C, R>(
    client: C,
    registry: Arc<R>,
    namespace: impl Into<String>,
    config: PublisherConfig,
) -> JoinHandle<()>
where
    C: PutMetricsClient + 'static,
    R: Registry + ?Sized + 'static,
{
    tokio::spawn(Publisher::new(client, registry, namespace, config).run())
}
