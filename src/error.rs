use crate::locations::error::LocationListError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WxHistError {
    #[error(transparent)]
    LocationList(#[from] LocationListError),

    #[error("Failed to create data directory '{0}'")]
    DataRootCreation(PathBuf, #[source] std::io::Error),
}
