use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// An AWS call failed at the transport or service level.
    #[error("{service} {operation} failed: {message}")]
    Service {
        service: &'static str,
        operation: &'static str,
        message: String,
    },

    /// Persisted session state exists but does not parse as cookie records.
    /// Callers fall back to a fresh login rather than failing the run.
    #[error("Corrupt session state: {0}")]
    CorruptSession(String),

    /// Secret payload is missing or not valid credential JSON.
    #[error("Secret {name} is unusable: {message}")]
    BadSecret { name: String, message: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn service(
        service: &'static str,
        operation: &'static str,
        err: impl std::fmt::Display,
    ) -> Self {
        StoreError::Service {
            service,
            operation,
            message: err.to_string(),
        }
    }
}
