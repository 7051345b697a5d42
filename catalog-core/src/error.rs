//! Store error taxonomy.

use thiserror::Error;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded
    #[error("Corrupt record at {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;
