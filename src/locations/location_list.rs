//! Loads the delimited location list.
//!
//! The file has a header row. The first column is the location key, followed by a
//! region code, latitude and longitude; any further columns are kept verbatim.

use crate::locations::error::LocationListError;
use crate::types::location::{
    LatLon, Location, KEY_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN, REGION_COLUMN,
};
use log::{info, warn};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::task;

/// Characters that cannot appear in a location's cache directory name.
const KEY_SEPARATORS: [char; 3] = [' ', '/', '\\'];

/// Reads the location list at `path` into a map keyed by location id.
pub async fn load_locations(path: &Path) -> Result<BTreeMap<String, Location>, LocationListError> {
    let path_buf = path.to_path_buf();
    let locations = task::spawn_blocking(move || read_locations(path_buf)).await??;
    info!(
        "Loaded {} locations from {}",
        locations.len(),
        path.display()
    );
    Ok(locations)
}

fn read_locations(path: PathBuf) -> Result<BTreeMap<String, Location>, LocationListError> {
    // A schema inference length of zero reads every column as a string.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.clone()))
        .map_err(|e| LocationListError::Read(path.clone(), e))?
        .finish()
        .map_err(|e| LocationListError::Read(path.clone(), e))?;

    if df.width() <= LONGITUDE_COLUMN {
        return Err(LocationListError::MissingColumns {
            path,
            found: df.width(),
            expected: LONGITUDE_COLUMN + 1,
        });
    }

    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.str())
        .collect::<PolarsResult<Vec<_>>>()
        .map_err(|e| LocationListError::Read(path.clone(), e))?;

    let mut locations = BTreeMap::new();
    for idx in 0..df.height() {
        let fields: Vec<String> = columns
            .iter()
            .map(|ca| ca.get(idx).unwrap_or_default().to_string())
            .collect();
        let Some(id) = location_key(&fields[KEY_COLUMN]) else {
            warn!(
                "Skipping row {} of {}: unusable location key '{}'",
                idx + 1,
                path.display(),
                fields[KEY_COLUMN]
            );
            continue;
        };
        let location = location_from_fields(id, fields)?;
        locations.insert(location.id.clone(), location);
    }
    Ok(locations)
}

/// The cache directory name for a raw key: separators become `_`. Keys that are
/// empty or made only of dots have no usable name.
fn location_key(raw: &str) -> Option<String> {
    let id = raw.trim().replace(KEY_SEPARATORS, "_");
    if id.chars().all(|c| c == '.') {
        return None;
    }
    Some(id)
}

fn location_from_fields(id: String, fields: Vec<String>) -> Result<Location, LocationListError> {
    let latitude = parse_coordinate(&id, "latitude", &fields[LATITUDE_COLUMN])?;
    let longitude = parse_coordinate(&id, "longitude", &fields[LONGITUDE_COLUMN])?;

    Ok(Location {
        region: fields[REGION_COLUMN].trim().to_string(),
        coordinates: LatLon(latitude, longitude),
        id,
        fields,
    })
}

fn parse_coordinate(
    location: &str,
    field: &'static str,
    value: &str,
) -> Result<f64, LocationListError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| LocationListError::InvalidCoordinate {
            location: location.to_string(),
            field,
            value: value.to_string(),
        })
}
