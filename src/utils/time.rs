use chrono::{NaiveDate, NaiveDateTime};

/// Canonical textual form for every persisted timestamp.
pub const LOCAL_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Fallback patterns for hand-edited or imported files. Tried in order only
/// when [LOCAL_FORMAT] does not match.
const FALLBACK_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a wall-clock timestamp as local calendar fields. The value never
/// goes through a UTC conversion, so `2025/03/15 09:30` means 09:30 on the
/// user's clock regardless of timezone.
pub fn parse_local(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(v) = NaiveDateTime::parse_from_str(text, LOCAL_FORMAT) {
        return Some(v);
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
}

/// Inverse of [parse_local] for any timestamp with zero seconds.
pub fn format_local(moment: NaiveDateTime) -> String {
    moment.format(LOCAL_FORMAT).to_string()
}

/// This is the standard way of converting a date to a day key in hoursme.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day_key(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}
