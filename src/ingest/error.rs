use crate::store::error::StoreError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] std::io::Error),
}

/// Why a single day could not be ingested. Never stops the location's run.
#[derive(Debug, Error)]
pub enum DayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize day record for {0}")]
    Serialize(NaiveDate, #[source] serde_json::Error),

    #[error("No usable report URL to fetch {0} from")]
    NoTemplate(NaiveDate),
}
