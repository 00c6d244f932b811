//! The structured form of one day's observation table.

use serde::{Deserialize, Serialize};

/// Column headers and row cells scraped from one daily history report.
///
/// Cells are kept as display strings (e.g. `"45.0 F"`, `"12:51 AM"`). The number
/// of cells in a row is not checked against the number of headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Column labels in table order, whitespace removed (e.g. `"Temp."`).
    pub headers: Vec<String>,
    /// One entry per observation row, each an ordered list of cell values.
    #[serde(rename = "data")]
    pub rows: Vec<Vec<String>>,
}

impl DayRecord {
    /// `true` when extraction found neither headers nor rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}
