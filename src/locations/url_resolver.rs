//! Discovers the history report URL of a location and caches it.
//!
//! The provider has no lookup by coordinates for history pages, so the resolver
//! runs a regular search and scrapes the link to the location's history page out
//! of the results. The scraped URL is stored as the location's `url` artifact and
//! served from there on later runs.

use crate::extract::markers::{after, before};
use crate::history::date_cursor::date_token;
use crate::ingest::page_source::PageSource;
use crate::locations::error::ResolveError;
use crate::store::compressed_store::CompressedStore;
use crate::types::artifact::{Artifact, CacheLayout};
use crate::types::ingest_config::ProviderConfig;
use crate::types::location::Location;
use crate::utils::ensure_dir_exists;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::sync::Arc;

const ATTRIBUTE_END: &str = "\"";

/// Literal markers locating the history link in a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSchema {
    /// Only text before this marker is searched.
    pub section_end: String,
    /// Markup immediately preceding the link's path.
    pub link_open: String,
    /// Leading part of the path, kept in the result.
    pub path_prefix: String,
    /// Where the path ends, usually the start of the query string.
    pub path_end: String,
    /// Report page appended to fallback station paths.
    pub report_page: String,
}

impl Default for SearchSchema {
    fn default() -> Self {
        Self {
            section_end: r#"id="city-nav-history""#.to_string(),
            link_open: r#"<li><a href=""#.to_string(),
            path_prefix: "/history/airport".to_string(),
            path_end: "?".to_string(),
            report_page: "DailyHistory.html".to_string(),
        }
    }
}

/// Extracts the history report path (e.g.
/// `/history/airport/KJFK/2017/5/8/DailyHistory.html`) from a search results page.
pub fn scrape_history_path(page: &str, schema: &SearchSchema) -> Option<String> {
    let section = before(page, &schema.section_end);
    let link_marker = format!("{}{}", schema.link_open, schema.path_prefix);
    let rest = after(section, &link_marker)?;
    let rest = before(before(rest, &schema.path_end), ATTRIBUTE_END);
    Some(format!("{}{}", schema.path_prefix, rest))
}

#[derive(Debug, Clone)]
pub struct UrlResolver {
    store: CompressedStore,
    layout: CacheLayout,
    provider: Arc<ProviderConfig>,
    start_date: NaiveDate,
}

impl UrlResolver {
    pub fn new(layout: CacheLayout, provider: Arc<ProviderConfig>, start_date: NaiveDate) -> Self {
        Self {
            store: CompressedStore::new(),
            layout,
            provider,
            start_date,
        }
    }

    /// Returns the report URL of `location`, searching the provider only when no URL
    /// is cached yet. Also creates the location's cache directories.
    ///
    /// When the search fails or its results contain no history link, and no fallback
    /// station is configured for the location's region, the returned URL is just the
    /// provider's base URL. That is logged and not persisted, and every uncached day
    /// of the location will then fail.
    ///
    /// # Errors
    ///
    /// Only failing to create the location's cache directories is an error.
    pub async fn resolve<S: PageSource + ?Sized>(
        &self,
        source: &S,
        location: &Location,
    ) -> Result<String, ResolveError> {
        self.ensure_location_dirs(&location.id).await?;

        let url_path = self.layout.path(&location.id, Artifact::Url);
        match self.store.read(&url_path).await {
            Ok(bytes) => {
                let url = String::from_utf8_lossy(&bytes).trim().to_string();
                if !url.is_empty() {
                    info!("Using cached url for {}: {}", location.id, url);
                    return Ok(url);
                }
                warn!("Cached url for {} is empty, searching again", location.id);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => warn!("Ignoring unreadable cached url for {}: {}", location.id, e),
        }

        let search_url = format!("{}{}", self.provider.search_base, location.search_query());
        let scraped = match source.fetch(&search_url).await {
            Ok(page) => scrape_history_path(&String::from_utf8_lossy(&page), &self.provider.search),
            Err(e) => {
                error!("Search for {} failed: {}", location.id, e);
                None
            }
        };

        let path = scraped.or_else(|| self.fallback_path(location));
        let Some(path) = path else {
            let url = self.provider.history_base.clone();
            warn!(
                "No history link found for {} ({}); using malformed url {}",
                location.id,
                location.search_query(),
                url
            );
            return Ok(url);
        };

        let url = format!("{}{}", self.provider.history_base, path);
        if let Err(e) = self.store.write(&url_path, url.as_bytes()).await {
            error!("Failed to cache url for {}: {}", location.id, e);
        }
        info!("{} url created: {}", location.id, url);
        Ok(url)
    }

    fn fallback_path(&self, location: &Location) -> Option<String> {
        let station = self.provider.fallback_stations.get(&location.region)?;
        info!(
            "Using fallback station {} for {} (region {})",
            station, location.id, location.region
        );
        Some(format!(
            "/history{}/{}/{}",
            station,
            date_token(self.start_date, "/"),
            self.provider.search.report_page
        ))
    }

    async fn ensure_location_dirs(&self, location_id: &str) -> Result<(), ResolveError> {
        for dir in self.layout.location_dirs(location_id) {
            ensure_dir_exists(&dir)
                .await
                .map_err(|e| ResolveError::DirCreation(dir.clone(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::error::FetchError;
    use crate::types::location::LatLon;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    const SEARCH_PAGE: &str = r#"<ul class="city-nav">
        <li><a href="/weather/us/ny/new-york">Forecast</a></li>
        <li><a href="/history/airport/KJFK/2017/5/8/DailyHistory.html?req_city=New+York&req_state=NY" id="city-nav-history" class="">History</a></li>
        </ul>"#;

    /// Serves one page for every URL and records what was requested.
    struct CannedSearch {
        page: Option<&'static str>,
        requests: Mutex<Vec<String>>,
    }

    impl CannedSearch {
        fn new(page: Option<&'static str>) -> Self {
            Self {
                page,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for CannedSearch {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.page {
                Some(page) => Ok(page.as_bytes().to_vec()),
                None => Err(FetchError::Body(
                    url.to_string(),
                    std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"),
                )),
            }
        }
    }

    fn location(id: &str, region: &str) -> Location {
        Location {
            id: id.to_string(),
            region: region.to_string(),
            coordinates: LatLon(40.7128, -74.006),
            fields: vec![id.to_string(), region.to_string()],
        }
    }

    fn resolver(root: &std::path::Path) -> UrlResolver {
        UrlResolver::new(
            CacheLayout::new(root),
            Arc::new(ProviderConfig::default()),
            NaiveDate::from_ymd_opt(2004, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_scrape_history_path() {
        assert_eq!(
            scrape_history_path(SEARCH_PAGE, &SearchSchema::default()).as_deref(),
            Some("/history/airport/KJFK/2017/5/8/DailyHistory.html")
        );
        assert_eq!(
            scrape_history_path("<html>No results</html>", &SearchSchema::default()),
            None
        );
    }

    #[tokio::test]
    async fn test_resolve_searches_then_caches() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        let resolver = resolver(dir.path());
        let source = CannedSearch::new(Some(SEARCH_PAGE));
        let new_york = location("New_York", "NY");

        let url = resolver.resolve(&source, &new_york).await?;

        assert_eq!(
            url,
            "https://www.wunderground.com/history/airport/KJFK/2017/5/8/DailyHistory.html"
        );
        assert_eq!(
            source.requests(),
            vec!["https://www.wunderground.com/cgi-bin/findweather/getForecast?query=40.7128,-74.006"]
        );
        for sub_dir in ["html", "json"] {
            assert!(dir.path().join("New_York").join(sub_dir).is_dir());
        }
        assert!(dir.path().join("New_York/url.txt.gz").is_file());

        let again = resolver.resolve(&source, &new_york).await?;
        assert_eq!(again, url);
        assert_eq!(source.requests().len(), 1, "second resolve must hit the cache");
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_migrates_legacy_url_file() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("KSEA")).unwrap();
        std::fs::write(
            dir.path().join("KSEA/url.txt"),
            "https://www.wunderground.com/history/airport/KSEA/2016/1/1/DailyHistory.html",
        )
        .unwrap();
        let source = CannedSearch::new(None);

        let url = resolver(dir.path())
            .resolve(&source, &location("KSEA", "WA"))
            .await?;

        assert!(url.contains("/KSEA/2016/1/1/"));
        assert!(source.requests().is_empty());
        assert!(!dir.path().join("KSEA/url.txt").exists());
        assert!(dir.path().join("KSEA/url.txt.gz").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_uses_fallback_station() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        let source = CannedSearch::new(Some("<html>No results</html>"));

        let url = resolver(dir.path())
            .resolve(&source, &location("San_Juan", "PR"))
            .await?;

        assert_eq!(
            url,
            "https://www.wunderground.com/history/airport/TJSJ/2004/1/1/DailyHistory.html"
        );
        assert!(dir.path().join("San_Juan/url.txt.gz").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_unscrapable_search_gives_uncached_base_url() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        let source = CannedSearch::new(Some("<html>No results</html>"));

        let url = resolver(dir.path())
            .resolve(&source, &location("Nowhere", "ZZ"))
            .await?;

        assert_eq!(url, "https://www.wunderground.com");
        assert!(!dir.path().join("Nowhere/url.txt.gz").exists());
        assert!(dir.path().join("Nowhere/html").is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_base_url() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        let source = CannedSearch::new(None);

        let url = resolver(dir.path())
            .resolve(&source, &location("New_York", "NY"))
            .await?;

        assert_eq!(url, "https://www.wunderground.com");
        assert_eq!(source.requests().len(), 1);
        assert!(!dir.path().join("New_York/url.txt.gz").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_search_uses_fallback_station() -> Result<(), ResolveError> {
        let dir = tempdir().unwrap();
        let source = CannedSearch::new(None);

        let url = resolver(dir.path())
            .resolve(&source, &location("Tokyo", "JP"))
            .await?;

        assert_eq!(
            url,
            "https://www.wunderground.com/history/airport/ROAH/2004/1/1/DailyHistory.html"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_creation_failure() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");
        std::fs::write(&root, b"not a directory").unwrap();
        let source = CannedSearch::new(Some(SEARCH_PAGE));

        let err = resolver(&root)
            .resolve(&source, &location("New_York", "NY"))
            .await
            .expect_err("root is a file");

        assert!(matches!(err, ResolveError::DirCreation(_, _)), "got {err:?}");
    }
}
