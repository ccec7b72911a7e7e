//! Store error types.

use thiserror::Error;

use braindriver_core::EngineError;

/// Errors that can occur when reading or writing persisted sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No session with this id exists.
    #[error("session not found: {0}")]
    NotFound(String),

    /// The session id cannot be used as a storage key.
    #[error("invalid session id: {0:?}")]
    InvalidId(String),

    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored decision references a question the catalog does not know.
    #[error("cannot score session: {0}")]
    Scoring(#[from] EngineError),
}
