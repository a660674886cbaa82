use std::time::Duration;

/// Failure of the data-source fetch path.
///
/// This is the only error kind the controller ever sees: filtering and
/// sorting cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum DataFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record at index {index}: field '{field}' {reason}")]
    Schema {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fetch was cancelled")]
    Cancelled,

    #[error("A fetch is already in flight")]
    Busy,

    /// The fetch task panicked or was aborted before producing a result.
    #[error("Fetch task failed: {0}")]
    Task(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DataFetchError {
    pub(crate) fn schema(index: usize, field: &str, reason: impl Into<String>) -> Self {
        Self::Schema {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataFetchError>;
