use crate::history::date_cursor::{date_token, HISTORY_SEGMENT};
use chrono::NaiveDate;
use std::fmt;

/// A report URL with its date segment factored out.
///
/// Built from any dated report URL of a location, e.g.
/// `https://host/history/airport/KJFK/2017/5/8/DailyHistory.html?req_city=NA`,
/// and able to produce the URL of any other day for the same station. The
/// query string is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    prefix: String,
    suffix: String,
    date: NaiveDate,
}

impl UrlTemplate {
    /// Parses a report URL. Returns `None` unless the URL contains
    /// `/history/<kind>/<station>/<year>/<month>/<day>` with a valid calendar date.
    pub fn parse(url: &str) -> Option<Self> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let history_at = without_query.find(HISTORY_SEGMENT)?;
        let base_end = history_at + HISTORY_SEGMENT.len();
        let segments: Vec<&str> = without_query[base_end..].splitn(6, '/').collect();
        if segments.len() < 5 || segments[0].is_empty() || segments[1].is_empty() {
            return None;
        }

        let year: i32 = segments[2].parse().ok()?;
        let month: u32 = segments[3].parse().ok()?;
        let day: u32 = segments[4].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        Some(Self {
            prefix: format!(
                "{}{}/{}",
                &without_query[..base_end],
                segments[0],
                segments[1]
            ),
            suffix: segments
                .get(5)
                .map(|rest| format!("/{rest}"))
                .unwrap_or_default(),
            date,
        })
    }

    /// Composes the report URL for `date`.
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}{}", self.prefix, date_token(date, "/"), self.suffix)
    }

    /// The date the template was parsed from.
    pub fn source_date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_for(self.date))
    }
}
