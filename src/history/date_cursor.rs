//! Date tokens embedded in history report URLs.
//!
//! Report URLs look like
//! `https://host/history/airport/KJFK/2004/1/1/DailyHistory.html`: the three path
//! segments after the station form the report date, without zero padding.

use chrono::{Datelike, NaiveDate};

pub(crate) const HISTORY_SEGMENT: &str = "/history/";

/// Formats `date` the way the provider does, e.g. `2004-1-1` for separator `-`.
pub fn date_token(date: NaiveDate, separator: &str) -> String {
    format!(
        "{}{separator}{}{separator}{}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Rebuilds the date token of a report URL using `separator`.
///
/// Returns whatever year/month/day segments are present after `/history/`, so a
/// truncated URL yields a partial token and a URL without `/history/` yields an
/// empty string.
pub fn extract_date(url: &str, separator: &str) -> String {
    let Some((_, rest)) = url.split_once(HISTORY_SEGMENT) else {
        return String::new();
    };
    let segments: Vec<&str> = rest.split('/').collect();

    let mut token = String::new();
    if let Some(year) = segments.get(2) {
        token.push_str(year);
        token.push_str(separator);
    }
    if let Some(month) = segments.get(3) {
        token.push_str(month);
        token.push_str(separator);
    }
    if let Some(day) = segments.get(4) {
        token.push_str(day.split(['?', '#']).next().unwrap_or(day));
    }
    token
}

/// Replaces `from_token` in `url` with the `/`-separated token for `to`.
///
/// This is a literal substring replacement: when `from_token` is empty or does not
/// occur in `url`, the URL comes back unchanged and the date does not move.
/// [`UrlTemplate`](crate::UrlTemplate) composes URLs from a structured date instead
/// and is what the ingestion loop uses.
pub fn advance(url: &str, from_token: &str, to: NaiveDate) -> String {
    if from_token.is_empty() {
        return url.to_string();
    }
    url.replace(from_token, &date_token(to, "/"))
}
