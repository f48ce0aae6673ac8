use thiserror::Error;

/// Canonical result for iquery.
pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Raised synchronously by the offset/limit setters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::Config(e.to_string())
    }
}
