//! On-disk layout of the ingestion cache.
//!
//! ```text
//! <root>/<location>/url.txt.gz
//! <root>/<location>/html/2004-1-1.html.gz
//! <root>/<location>/json/2004-1-1.json.gz
//! ```
//!
//! Paths returned here are logical paths; the compressed store appends `.gz`.

use crate::history::date_cursor::date_token;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const URL_FILE_NAME: &str = "url.txt";
const HTML_DIR_NAME: &str = "html";
const JSON_DIR_NAME: &str = "json";

/// One cached artifact of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// The resolved report URL.
    Url,
    /// The raw observation table markup of a day.
    Html(NaiveDate),
    /// The serialized [`DayRecord`](crate::DayRecord) of a day.
    Json(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn location_dir(&self, location_id: &str) -> PathBuf {
        self.root.join(location_id)
    }

    /// Every directory that must exist before artifacts of `location_id` are written,
    /// parents first.
    pub fn location_dirs(&self, location_id: &str) -> [PathBuf; 4] {
        let location_dir = self.location_dir(location_id);
        [
            self.root.clone(),
            location_dir.join(HTML_DIR_NAME),
            location_dir.join(JSON_DIR_NAME),
            location_dir,
        ]
    }

    pub fn path(&self, location_id: &str, artifact: Artifact) -> PathBuf {
        let location_dir = self.location_dir(location_id);
        match artifact {
            Artifact::Url => location_dir.join(URL_FILE_NAME),
            Artifact::Html(date) => location_dir
                .join(HTML_DIR_NAME)
                .join(format!("{}.html", date_token(date, "-"))),
            Artifact::Json(date) => location_dir
                .join(JSON_DIR_NAME)
                .join(format!("{}.json", date_token(date, "-"))),
        }
    }
}
