use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// CloudWatch standard units this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandardUnit {
    Count,
}

/// One name/value tag attached to a datum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single timestamped data point, shaped like a CloudWatch `MetricDatum`.
///
/// Built fresh each cycle and never mutated afterwards. The dimension set
/// is shared between every datum of a publisher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<StandardUnit>,
    pub dimensions: Arc<[Dimension]>,
    pub timestamp: DateTime<Utc>,
}

impl MetricDatum {
    pub fn new(
        metric_name: impl Into<String>,
        value: f64,
        unit: Option<StandardUnit>,
        dimensions: Arc<[Dimension]>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            value,
            unit,
            dimensions,
            timestamp: Utc::now(),
        }
    }
}

/// Body of one `PutMetricData` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutMetricDataInput {
    pub namespace: String,
    pub metric_data: Vec<MetricDatum>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_cloudwatch_field_names() {
        let dims: Arc<[Dimension]> = Arc::from(vec![Dimension::new("taskID", "123")]);
        let input = PutMetricDataInput {
            namespace: "sample-namespace".into(),
            metric_data: vec![
                MetricDatum::new("hits", 3.0, Some(StandardUnit::Count), dims.clone()),
                MetricDatum::new("latency.p50", 1.5, None, dims),
            ],
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["Namespace"], "sample-namespace");

        let first = &json["MetricData"][0];
        assert_eq!(first["MetricName"], "hits");
        assert_eq!(first["Value"], 3.0);
        assert_eq!(first["Unit"], "Count");
        assert_eq!(first["Dimensions"][0]["Name"], "taskID");
        assert_eq!(first["Dimensions"][0]["Value"], "123");
        assert!(first["Timestamp"].is_string());

        assert!(json["MetricData"][1].get("Unit").is_none());
    }
}
