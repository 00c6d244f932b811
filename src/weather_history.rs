//! This module provides the main entry point of the crate: it loads the location
//! list, resolves a report URL for every location and runs one ingestion worker
//! per location on a bounded pool.

use crate::error::WxHistError;
use crate::extract::table_extractor::TableExtractor;
use crate::ingest::location_worker::LocationWorker;
use crate::ingest::page_source::{HttpPageSource, PageSource};
use crate::locations::error::ResolveError;
use crate::locations::location_list::load_locations;
use crate::locations::url_resolver::UrlResolver;
use crate::types::artifact::CacheLayout;
use crate::types::ingest_config::IngestConfig;
use crate::types::location::Location;
use crate::types::run_summary::{IngestReport, RunSummary};
use crate::utils::ensure_dir_exists;
use log::{error, info};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Ingests the daily history of a set of locations into a local cache.
///
/// Every location gets its own worker, which walks the configured date range day by
/// day. At most [`IngestConfig::concurrency`] workers run at the same time; each
/// uses its own [`PageSource`] so no connection pool is shared between locations.
///
/// # Examples
///
/// ```no_run
/// # use wxhist::{IngestConfig, WeatherHistory, WxHistError};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), WxHistError> {
/// let config = IngestConfig::builder().data_root("/srv/wxhist/data").build();
/// let history = WeatherHistory::new(config).await?;
///
/// let report = history.run(Path::new("/srv/wxhist/GEO_LOCATIONS.csv")).await?;
/// for summary in &report.summaries {
///     println!("{summary}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct WeatherHistory {
    config: IngestConfig,
    layout: CacheLayout,
    resolver: UrlResolver,
}

impl WeatherHistory {
    /// Creates the orchestrator, creating [`IngestConfig::data_root`] if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WxHistError::DataRootCreation`] if the data root cannot be created.
    pub async fn new(config: IngestConfig) -> Result<Self, WxHistError> {
        ensure_dir_exists(&config.data_root)
            .await
            .map_err(|e| WxHistError::DataRootCreation(config.data_root.clone(), e))?;

        let layout = CacheLayout::new(&config.data_root);
        let resolver = UrlResolver::new(
            layout.clone(),
            Arc::new(config.provider.clone()),
            config.start_date,
        );
        Ok(Self {
            config,
            layout,
            resolver,
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Loads the location list at `locations_csv` and ingests every location over HTTP.
    ///
    /// # Errors
    ///
    /// Only a location list that cannot be loaded fails the run. Per-location and
    /// per-day problems are logged and reflected in the returned [`IngestReport`].
    pub async fn run(&self, locations_csv: &Path) -> Result<IngestReport, WxHistError> {
        let locations = load_locations(locations_csv).await?;
        Ok(self.ingest(&locations).await)
    }

    /// Ingests `locations` over HTTP.
    pub async fn ingest(&self, locations: &BTreeMap<String, Location>) -> IngestReport {
        self.ingest_with(locations, HttpPageSource::new).await
    }

    /// Ingests `locations`, calling `make_source` once for the URL resolution pass and
    /// once for every location worker.
    ///
    /// URLs are resolved one location at a time, then the workers are started. The
    /// call returns once every started worker has reported its [`RunSummary`].
    pub async fn ingest_with<S, F>(
        &self,
        locations: &BTreeMap<String, Location>,
        make_source: F,
    ) -> IngestReport
    where
        S: PageSource + 'static,
        F: Fn() -> S,
    {
        let (urls, unresolved) = self.resolve_all(&make_source(), locations).await;
        let (start_date, end_date) = self.config.date_range();
        let extractor = TableExtractor::new(self.config.provider.table.clone());
        let permits = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<RunSummary>();

        let mut outstanding = 0usize;
        for (location_id, url) in urls {
            let worker = LocationWorker::builder()
                .location_id(location_id)
                .url(url)
                .layout(self.layout.clone())
                .extractor(extractor.clone())
                .source(make_source())
                .start_date(start_date)
                .end_date(end_date)
                .maybe_request_delay(self.config.request_delay)
                .build();
            let tx = tx.clone();
            let permits = Arc::clone(&permits);

            outstanding += 1;
            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let summary = worker.run().await;
                if tx.send(summary).is_err() {
                    error!("Summary of {} was dropped", worker.location_id());
                }
            });
        }
        drop(tx);

        let mut summaries = Vec::with_capacity(outstanding);
        while outstanding > 0 {
            match rx.recv().await {
                Some(summary) => {
                    info!("{}", summary);
                    summaries.push(summary);
                    outstanding -= 1;
                }
                None => {
                    error!("{} location workers stopped without reporting", outstanding);
                    break;
                }
            }
        }

        info!("Done with all locations");
        IngestReport {
            summaries,
            unresolved,
        }
    }

    async fn resolve_all<S: PageSource>(
        &self,
        source: &S,
        locations: &BTreeMap<String, Location>,
    ) -> (BTreeMap<String, String>, Vec<(String, ResolveError)>) {
        let mut urls = BTreeMap::new();
        let mut unresolved = Vec::new();
        for (location_id, location) in locations {
            match self.resolver.resolve(source, location).await {
                Ok(url) => {
                    urls.insert(location_id.clone(), url);
                }
                Err(e) => {
                    error!("Skipping {}: {}", location_id, e);
                    unresolved.push((location_id.clone(), e));
                }
            }
        }
        (urls, unresolved)
    }
}
