//! Sentinel date handling.
//!
//! Upstream writes placeholder values for dates it does not know: a bare time component
//! (starting with `T`) or a date in the year 1900. Such values are treated exactly like a
//! missing date and are never written to a resource.

use chrono::{NaiveDate, NaiveDateTime};

/// True when `value` is one of the upstream null-date placeholders.
pub fn is_sentinel(value: &str) -> bool {
    value.starts_with('T') || value.starts_with("1900")
}

/// The date, if it was actually recorded.
pub fn recorded(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && !is_sentinel(v))
        .map(str::to_owned)
}

/// Parse the calendar day of a recorded date or date-time (`YYYY-MM-DD...`).
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse the date and time of a recorded date-time (`YYYY-MM-DDTHH:MM:SS...`).
///
/// Fractional seconds and offsets are ignored. Date-only values have no time and yield `None`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let stamp = value.get(..19)?;
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
