//! Walks every day of one location's history, oldest first.
//!
//! For each day the worker checks the cache, fetches and extracts the report on a
//! miss, and stores both the raw table and the day record. A failing day is
//! logged and counted; the walk always continues with the next day.

use crate::extract::table_extractor::TableExtractor;
use crate::history::url_template::UrlTemplate;
use crate::ingest::error::DayError;
use crate::ingest::page_source::PageSource;
use crate::store::compressed_store::CompressedStore;
use crate::types::artifact::{Artifact, CacheLayout};
use crate::types::run_summary::RunSummary;
use bon::Builder;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

/// How a day was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// Both artifacts were already cached.
    Cached,
    /// The report was fetched and both artifacts written.
    Downloaded,
}

#[derive(Builder)]
pub struct LocationWorker<S> {
    #[builder(into)]
    location_id: String,
    /// Any dated report URL of the location.
    #[builder(into)]
    url: String,
    layout: CacheLayout,
    #[builder(default)]
    extractor: TableExtractor,
    #[builder(default)]
    store: CompressedStore,
    source: S,
    start_date: NaiveDate,
    /// Inclusive.
    end_date: NaiveDate,
    request_delay: Option<Duration>,
}

impl<S: PageSource> LocationWorker<S> {
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// Ingests every day in range and reports the counters.
    pub async fn run(&self) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(self.location_id.as_str());

        let template = UrlTemplate::parse(&self.url);
        if template.is_none() {
            error!(
                "Report url '{}' of {} has no date segment, uncached days will fail",
                self.url, self.location_id
            );
        }

        info!(
            "Ingesting {} from {} to {}",
            self.location_id, self.start_date, self.end_date
        );
        for date in self
            .start_date
            .iter_days()
            .take_while(|date| *date <= self.end_date)
        {
            match self.ingest_day(template.as_ref(), date).await {
                Ok(DayOutcome::Cached) => summary.files_read += 1,
                Ok(DayOutcome::Downloaded) => summary.files_downloaded += 1,
                Err(e) => {
                    error!("Ingesting {} for {} failed: {}", date, self.location_id, e);
                    summary.failed += 1;
                }
            }
        }

        summary.elapsed = started.elapsed();
        summary
    }

    /// Makes sure both artifacts of `date` are cached, fetching the report if needed.
    pub async fn ingest_day(
        &self,
        template: Option<&UrlTemplate>,
        date: NaiveDate,
    ) -> Result<DayOutcome, DayError> {
        let html_path = self.layout.path(&self.location_id, Artifact::Html(date));
        let json_path = self.layout.path(&self.location_id, Artifact::Json(date));

        if self.store.contains(&html_path).await? && self.store.contains(&json_path).await? {
            debug!("Cache hit for {} on {}", self.location_id, date);
            return Ok(DayOutcome::Cached);
        }

        let template = template.ok_or(DayError::NoTemplate(date))?;
        if let Some(delay) = self.request_delay {
            tokio::time::sleep(delay).await;
        }
        let url = template.url_for(date);
        debug!("Cache miss for {} on {}, fetching {}", self.location_id, date, url);
        let page = self.source.fetch(&url).await?;

        let (record, raw_table) = self.extractor.parse(&page);
        if record.is_empty() {
            warn!(
                "No observation table in {} for {} on {}, storing an empty record",
                url, self.location_id, date
            );
        }
        let json = serde_json::to_vec(&record).map_err(|e| DayError::Serialize(date, e))?;

        self.store.write(&html_path, &raw_table).await?;
        self.store.write(&json_path, &json).await?;
        Ok(DayOutcome::Downloaded)
    }
}
