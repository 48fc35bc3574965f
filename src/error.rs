use thiserror::Error;

/// Main error type for rankeval
///
/// Metric computation itself never fails; these variants cover the boundary
/// (dataset files, recorded replies, cutoff lists from configuration or
/// the command line).
#[derive(Error, Debug)]
pub enum EvalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dataset or recommendation reply
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;
