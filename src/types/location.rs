//! Locations read from the location list.

use std::fmt;

pub(crate) const KEY_COLUMN: usize = 0;
pub(crate) const REGION_COLUMN: usize = 1;
pub(crate) const LATITUDE_COLUMN: usize = 2;
pub(crate) const LONGITUDE_COLUMN: usize = 3;

/// A geographical coordinate, latitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

/// One row of the location list.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Key of the location; also the name of its cache directory.
    pub id: String,
    /// Region or state code, e.g. `"NY"` or `"PR"`.
    pub region: String,
    pub coordinates: LatLon,
    /// Every field of the row as it appeared in the file, key included.
    pub fields: Vec<String>,
}

impl Location {
    /// The free-text query used to search the provider for this location: the
    /// latitude and longitude as written in the location list.
    pub fn search_query(&self) -> String {
        match (
            self.fields.get(LATITUDE_COLUMN),
            self.fields.get(LONGITUDE_COLUMN),
        ) {
            (Some(lat), Some(lon)) => format!("{},{}", lat.trim(), lon.trim()),
            _ => self.coordinates.to_string(),
        }
    }
}
