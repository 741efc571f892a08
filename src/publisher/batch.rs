use crate::error::PublishError;

use super::client::PutMetricsClient;
use super::datum::{MetricDatum, PutMetricDataInput};

/// Hard per-call item limit of `PutMetricData`.
pub const MAX_DATUMS_PER_REQUEST: usize = 20;

/// What one successful cycle sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishSummary {
    pub requests: usize,
    pub datums: usize,
}

/// Submit `data` in order, at most 20 per request, one request at a time.
///
/// The first failing request ends the cycle; the chunks after it are
/// dropped, the chunks before it stay published.
pub async fn publish_metrics<C: PutMetricsClient + ?Sized>(
    client: &C,
    namespace: &str,
    data: Vec<MetricDatum>,
) -> Result<PublishSummary, PublishError> {
    let mut summary = PublishSummary::default();
    let mut remaining = data.into_iter().peekable();

    while remaining.peek().is_some() {
        let chunk: Vec<MetricDatum> = remaining.by_ref().take(MAX_DATUMS_PER_REQUEST).collect();
        let len = chunk.len();

        client
            .put_metric_data(PutMetricDataInput {
                namespace: namespace.to_string(),
                metric_data: chunk,
            })
            .await
            .map_err(|source| PublishError::Send {
                sent_requests: summary.requests,
                source,
            })?;

        summary.requests += 1;
        summary.datums += len;
    }

    Ok(summary)
}
