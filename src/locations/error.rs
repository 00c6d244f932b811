use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationListError {
    #[error("Failed to read location list '{0}'")]
    Read(PathBuf, #[source] PolarsError),

    #[error("Location list '{path}' has {found} columns, expected at least {expected}")]
    MissingColumns {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("Invalid {field} '{value}' for location '{location}'")]
    InvalidCoordinate {
        location: String,
        field: &'static str,
        value: String,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),
}
