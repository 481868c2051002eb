use thiserror::Error;

/// Errors that can occur when decoding a snapshot back into scene data
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors the canvas surface can raise while restoring a snapshot
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] CodecError),

    #[error("failed to load resource during restore: {0}")]
    ResourceLoad(String),
}

/// Errors surfaced by history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("restore failed: {0}")]
    Restore(#[from] RestoreError),
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
