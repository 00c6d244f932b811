use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    // Expected on a cache miss, callers fall back to the network
    #[error("No artifact found at '{0}'")]
    NotFound(PathBuf),

    #[error("Failed to read artifact '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write artifact '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to compress payload for '{0}'")]
    Compress(PathBuf, #[source] std::io::Error),

    #[error("Failed to decompress artifact '{0}'")]
    Decompress(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove legacy artifact '{0}'")]
    LegacyRemoval(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// `true` when the artifact simply does not exist yet, as opposed to an I/O failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
