use crate::locations::error::ResolveError;
use std::fmt;
use std::time::Duration;

/// Counters reported by a location worker once it has walked its whole date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub location_id: String,
    /// Days already present in the cache.
    pub files_read: usize,
    /// Days fetched from the network and written to the cache.
    pub files_downloaded: usize,
    /// Days that could not be ingested.
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            files_read: 0,
            files_downloaded: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn days(&self) -> usize {
        self.files_read + self.files_downloaded + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} complete: {} files downloaded, {} files read, {} failed, elapsed {:.2?}",
            self.location_id, self.files_downloaded, self.files_read, self.failed, self.elapsed
        )
    }
}

/// Outcome of a whole ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// One summary per location that had a worker, in completion order.
    pub summaries: Vec<RunSummary>,
    /// Locations skipped because their cache directories could not be created.
    pub unresolved: Vec<(String, ResolveError)>,
}

impl IngestReport {
    pub fn summary(&self, location_id: &str) -> Option<&RunSummary> {
        self.summaries
            .iter()
            .find(|summary| summary.location_id == location_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = RunSummary {
            location_id: "KJFK".into(),
            files_read: 0,
            files_downloaded: 3,
            failed: 1,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            summary.to_string(),
            "KJFK complete: 3 files downloaded, 0 files read, 1 failed, elapsed 1.50s"
        );
        assert_eq!(summary.days(), 4);
    }
}
