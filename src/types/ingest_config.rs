//! Run configuration. Nothing provider- or machine-specific is hardcoded elsewhere:
//! endpoints and markup markers live in [`ProviderConfig`], paths and limits in
//! [`IngestConfig`].

use crate::extract::table_extractor::TableSchema;
use crate::locations::url_resolver::SearchSchema;
use bon::Builder;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// First day of every location's history.
pub fn history_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2004, 1, 1).expect("2004-01-01 is a valid date")
}

/// Endpoints and markup of the history provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Prepended to scraped report paths.
    pub history_base: String,
    /// Search endpoint; the location's `lat,lon` query is appended.
    pub search_base: String,
    pub table: TableSchema,
    pub search: SearchSchema,
    /// Station paths (e.g. `/airport/TJSJ`) by region code, used when a search
    /// turns up no history link.
    pub fallback_stations: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let fallback_stations = [
            ("ES", "/airport/LEEC"),
            ("GU", "/airport/PGUM"),
            ("IT", "/airport/LICZ"),
            ("JP", "/airport/ROAH"),
            ("NO", "/airport/ENVA"),
            ("PI", "/airport/RPUH"),
            ("PR", "/airport/TJSJ"),
            ("RO", "/airport/LRTZ"),
        ]
        .into_iter()
        .map(|(region, station)| (region.to_string(), station.to_string()))
        .collect();

        Self {
            history_base: "https://www.wunderground.com".to_string(),
            search_base: "https://www.wunderground.com/cgi-bin/findweather/getForecast?query="
                .to_string(),
            table: TableSchema::default(),
            search: SearchSchema::default(),
            fallback_stations,
        }
    }
}

/// Settings of one ingestion run.
///
/// # Examples
///
/// ```
/// use wxhist::IngestConfig;
/// use chrono::NaiveDate;
/// use std::time::Duration;
///
/// let config = IngestConfig::builder()
///     .data_root("/srv/wxhist/data")
///     .end_date(NaiveDate::from_ymd_opt(2004, 12, 31).unwrap())
///     .concurrency(4)
///     .request_delay(Duration::from_millis(250))
///     .build();
///
/// assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2004, 1, 1).unwrap());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct IngestConfig {
    /// Directory holding one sub-directory per location.
    #[builder(into)]
    pub data_root: PathBuf,
    #[builder(default = history_epoch())]
    pub start_date: NaiveDate,
    /// Last day to ingest, inclusive. Defaults to today in local time.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of locations ingested at the same time.
    #[builder(default = 8)]
    pub concurrency: usize,
    /// Pause before every network fetch of a worker.
    pub request_delay: Option<Duration>,
    #[builder(default)]
    pub provider: ProviderConfig,
}

impl IngestConfig {
    /// First and last day to ingest, both inclusive.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let end = self
            .end_date
            .unwrap_or_else(|| Local::now().date_naive());
        (self.start_date, end)
    }
}
