//! Turns a daily history report page into a [`DayRecord`].
//!
//! The observation table is located purely by literal markers described in a
//! [`TableSchema`], so a change in the provider's markup only needs a new schema.
//! Extraction is best effort: whatever markers are missing simply leave the
//! corresponding part of the record empty.

use crate::extract::markers::{after, before, bytes_between, pieces_after, slice_between};
use crate::types::day_record::DayRecord;

const TAG_OPEN: &str = "<";
const TAG_END: char = '>';
const CLOSING_TAG: &str = "</";
const ENTITY_END: char = ';';

/// Literal markers that delimit the observation table in a report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Start of the observations block.
    pub table_begin: String,
    /// Start of whatever follows the table; everything before it is the raw table.
    pub table_end: String,
    /// End of the header section.
    pub header_end: String,
    pub header_row_open: String,
    pub header_row_close: String,
    /// Opening tag of each header cell.
    pub header_cell: String,
    /// Opening tag of each observation row.
    pub row_open: String,
    /// Opening tag of each observation cell.
    pub cell_open: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            table_begin: r#"<div id="observations_details" class="high-res" >"#.to_string(),
            table_end: r#"<div class="obs-table-footer">"#.to_string(),
            header_end: "</thead>".to_string(),
            header_row_open: "<tr>".to_string(),
            header_row_close: "</tr>".to_string(),
            header_cell: "<th>".to_string(),
            row_open: r#"<tr class="no-metars">"#.to_string(),
            cell_open: "<td >".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    schema: TableSchema,
}

impl TableExtractor {
    pub fn new(schema: TableSchema) -> Self {
        Self { schema }
    }

    /// Extracts the day record from `page`, along with the raw bytes of the table
    /// markup it was read from.
    ///
    /// A page without the table's begin marker produces an empty record and no raw
    /// bytes.
    pub fn parse(&self, page: &[u8]) -> (DayRecord, Vec<u8>) {
        let Some(raw_table) = bytes_between(
            page,
            self.schema.table_begin.as_bytes(),
            self.schema.table_end.as_bytes(),
        ) else {
            return (DayRecord::default(), Vec::new());
        };

        // The stored table keeps the page's bytes; only the record is read as text.
        let text = String::from_utf8_lossy(page);
        let Some(body) = after(&text, &self.schema.table_begin) else {
            return (DayRecord::default(), raw_table.to_vec());
        };
        let table = before(body, &self.schema.table_end);

        let record = DayRecord {
            headers: self.headers(body),
            rows: self.rows(table),
        };
        (record, raw_table.to_vec())
    }

    fn headers(&self, body: &str) -> Vec<String> {
        let head = before(body, &self.schema.header_end);
        let Some(row) = slice_between(
            head,
            &self.schema.header_row_open,
            &self.schema.header_row_close,
        ) else {
            return Vec::new();
        };

        pieces_after(row, &self.schema.header_cell)
            .map(|cell| {
                before(cell, TAG_OPEN)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect()
            })
            .collect()
    }

    fn rows(&self, table: &str) -> Vec<Vec<String>> {
        pieces_after(table, &self.schema.row_open)
            .map(|row| {
                pieces_after(row, &self.schema.cell_open)
                    .map(cell_value)
                    .collect()
            })
            .collect()
    }
}

/// The text of a cell: whatever precedes the first closing tag, after the last
/// opening tag. A unit written after an entity such as `&nbsp;&deg;F` is appended
/// after a space, giving e.g. `45.0 F`.
fn cell_value(cell: &str) -> String {
    let mut parts = cell.splitn(3, CLOSING_TAG);
    let text = parts.next().unwrap_or_default();
    let mut value = text.rsplit(TAG_END).next().unwrap_or_default().to_string();

    if let Some((_, unit)) = parts.next().and_then(|tail| tail.rsplit_once(ENTITY_END)) {
        let unit = unit.trim();
        if !unit.is_empty() {
            value.push(' ');
            value.push_str(unit);
        }
    }
    value.replace('\n', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table: &str) -> String {
        format!(
            "<html><body><h1>History</h1>\
             <div id=\"observations_details\" class=\"high-res\" >{table}\
             <div class=\"obs-table-footer\"><p>footer</p></div></body></html>"
        )
    }

    const TABLE: &str = "<table><thead>\n<tr>\n<th>Time (EST)</th><th>Temp.</th><th>Humidity</th></tr>\n</thead><tbody>\n\
        <tr class=\"no-metars\">\n<td >12:51 AM</td>\n\
        <td >\n<span class=\"wx-data\"><span class=\"wx-value\">45.0</span>&nbsp;&deg;F</span>\n</td>\n\
        <td >80%</td>\n</tr>\n\
        <tr class=\"no-metars\">\n<td >1:51 AM</td>\n\
        <td >\n<span class=\"wx-data\"><span class=\"wx-value\">44.1</span>&nbsp;&deg;F</span>\n</td>\n\
        <td >82%</td>\n</tr>\n</tbody></table>";

    #[test]
    fn test_parse_headers_and_rows() {
        let (record, raw) = TableExtractor::default().parse(page(TABLE).as_bytes());

        assert_eq!(record.headers, vec!["Time(EST)", "Temp.", "Humidity"]);
        assert_eq!(
            record.rows,
            vec![
                vec!["12:51 AM", "45.0 F", "80%"],
                vec!["1:51 AM", "44.1 F", "82%"],
            ]
        );
        assert_eq!(String::from_utf8(raw).unwrap(), TABLE);
    }

    #[test]
    fn test_raw_table_keeps_non_utf8_bytes() {
        // Latin-1 degree sign.
        let table: &[u8] = b"<table><tr class=\"no-metars\"><td >45\xb0F</td></tr></table>";
        let mut html = b"<div id=\"observations_details\" class=\"high-res\" >".to_vec();
        html.extend_from_slice(table);
        html.extend_from_slice(b"<div class=\"obs-table-footer\">");

        let (record, raw) = TableExtractor::default().parse(&html);

        assert_eq!(raw, table);
        assert_eq!(record.rows, vec![vec!["45\u{fffd}F"]]);
    }

    #[test]
    fn test_missing_begin_marker_degrades_to_empty() {
        let (record, raw) = TableExtractor::default().parse(b"<html>No data for this day</html>");

        assert!(record.is_empty());
        assert!(raw.is_empty());
    }

    #[test]
    fn test_missing_end_marker_keeps_rest_of_page() {
        let html = format!("<div id=\"observations_details\" class=\"high-res\" >{TABLE}");
        let (record, raw) = TableExtractor::default().parse(html.as_bytes());

        assert_eq!(record.rows.len(), 2);
        assert_eq!(raw, TABLE.as_bytes());
    }

    #[test]
    fn test_table_without_rows_keeps_headers() {
        let table = "<table><thead><tr><th>Time</th><th>Temp</th></tr></thead></table>";
        let (record, _) = TableExtractor::default().parse(page(table).as_bytes());

        assert_eq!(record.headers, vec!["Time", "Temp"]);
        assert!(record.rows.is_empty());
    }

    #[test]
    fn test_custom_schema() {
        let schema = TableSchema {
            table_begin: "<table id=\"obs\">".into(),
            table_end: "</table>".into(),
            header_end: "</thead>".into(),
            header_row_open: "<tr>".into(),
            header_row_close: "</tr>".into(),
            header_cell: "<th>".into(),
            row_open: "<tr class=\"row\">".into(),
            cell_open: "<td>".into(),
        };
        let html = "<table id=\"obs\"><thead><tr><th>Hour</th></tr></thead>\
                    <tr class=\"row\"><td>01</td></tr></table><p>after</p>";

        let (record, raw) = TableExtractor::new(schema).parse(html.as_bytes());

        assert_eq!(record.headers, vec!["Hour"]);
        assert_eq!(record.rows, vec![vec!["01"]]);
        assert!(!String::from_utf8(raw).unwrap().contains("after"));
    }

    #[test]
    fn test_cell_value_variants() {
        assert_eq!(cell_value("Calm</td>\n"), "Calm");
        assert_eq!(cell_value("\n-\n</td>"), "-");
        assert_eq!(
            cell_value("<span class=\"wx-value\">29.92</span>&nbsp;in</span>"),
            "29.92 in"
        );
        assert_eq!(cell_value("<span>7</span>&nbsp;</span>"), "7");
    }
}
