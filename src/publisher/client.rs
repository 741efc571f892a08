use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ClientError;

use super::datum::PutMetricDataInput;

/// The remote side: accepts one batch of at most 20 data points per call.
pub trait PutMetricsClient: Send + Sync {
    fn put_metric_data(
        &self,
        input: PutMetricDataInput,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl<C: PutMetricsClient> PutMetricsClient for Arc<C> {
    fn put_metric_data(
        &self,
        input: PutMetricDataInput,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        (**self).put_metric_data(input)
    }
}

/// Client that writes each request as JSON to the `cloudwatch` tracing
/// target instead of sending it anywhere. Useful for local runs.
#[derive(Debug, Default)]
pub struct LoggingClient {
    requests: AtomicU64,
}

impl LoggingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests accepted so far.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl PutMetricsClient for LoggingClient {
    async fn put_metric_data(&self, input: PutMetricDataInput) -> Result<(), ClientError> {
        let body = serde_json::to_string(&input)?;
        self.requests.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            target: "cloudwatch",
            namespace = %input.namespace,
            datums = input.metric_data.len(),
            body = %body,
            "PutMetricData"
        );
        Ok(())
    }
}
