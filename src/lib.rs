//! Bulk ingestion of historical daily weather observations.
//!
//! For every location in a location list, `wxhist` discovers the provider's daily
//! history report URL, then walks every day from a start date to today: each day's
//! report is fetched once, its observation table extracted into a [`DayRecord`],
//! and both the raw table and the record are cached gzip-compressed on disk.
//! Reruns only fetch days that are missing from the cache.

mod error;
mod extract;
mod history;
mod ingest;
mod locations;
mod store;
mod types;
mod utils;
mod weather_history;

pub use error::WxHistError;
pub use weather_history::*;

pub use extract::table_extractor::{TableExtractor, TableSchema};
pub use history::date_cursor::{advance, date_token, extract_date};
pub use history::url_template::UrlTemplate;
pub use ingest::location_worker::{DayOutcome, LocationWorker};
pub use ingest::page_source::{HttpPageSource, PageSource};
pub use locations::location_list::load_locations;
pub use locations::url_resolver::{scrape_history_path, SearchSchema, UrlResolver};
pub use store::compressed_store::CompressedStore;
pub use utils::{default_data_root, ensure_dir_exists};

pub use types::artifact::{Artifact, CacheLayout};
pub use types::day_record::DayRecord;
pub use types::ingest_config::{history_epoch, IngestConfig, ProviderConfig};
pub use types::location::{LatLon, Location};
pub use types::run_summary::{IngestReport, RunSummary};

pub use ingest::error::{DayError, FetchError};
pub use locations::error::{LocationListError, ResolveError};
pub use store::error::StoreError;
