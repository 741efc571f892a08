//! Publish an in-process metrics registry to a CloudWatch-style
//! `PutMetricData` API on a fixed interval.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use cloudwatch_metrics::metrics::{MetricsRegistry, Timer};
//! use cloudwatch_metrics::publisher::{self, LoggingClient, PublisherConfig};
//!
//! # async fn run() {
//! let registry = Arc::new(MetricsRegistry::new());
//! let timer = Arc::new(Timer::new());
//! registry.register("sample", timer.clone()).unwrap();
//! timer.update(Duration::from_millis(1));
//!
//! let config = PublisherConfig::builder()
//!     .interval(Duration::from_secs(5))
//!     .dimensions(["taskID", "123"])
//!     .build();
//! publisher::publish(LoggingClient::new(), registry, "sample-namespace", config).await;
//! # }
//! ```

pub mod error;
pub mod metrics;
pub mod publisher;

pub use error::{ClientError, PublishError, RegistryError};
pub use metrics::{Metric, MetricsRegistry, Registry};
pub use publisher::{publish, spawn, Publisher, PublisherConfig, PutMetricsClient};
