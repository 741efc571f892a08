use thiserror::Error;

/// Failures reported by a `PutMetricsClient` implementation.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A publish cycle that stopped early. Chunks accepted before the
/// failure stay accepted on the remote side.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to send metrics: {source}")]
    Send {
        /// Requests that succeeded before the failing one
        sent_requests: usize,
        #[source]
        source: ClientError,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate metric: {0}")]
    Duplicate(String),
}
