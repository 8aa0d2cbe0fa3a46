use thiserror::Error;

/// Main error type for dictionary operations
#[derive(Error, Debug)]
pub enum WordsDictError {
    #[error("Token is empty")]
    EmptyToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Result type alias for dictionary operations
pub type Result<T> = std::result::Result<T, WordsDictError>;

impl WordsDictError {
    /// Check if this error is a caller contract violation rather than a runtime failure
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            WordsDictError::EmptyToken | WordsDictError::InvalidToken(_)
        )
    }
}
