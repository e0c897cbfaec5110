//! Timestamp rendering for query records

use chrono::{DateTime, Utc};

const DISPLAY_FORMAT: &str = "%d-%m-%Y, %H:%M:%S";

/// Render Unix seconds as `dd-mm-YYYY, HH:MM:SS` in UTC; empty for 0 or out of range
pub fn format_timestamp(secs: u64) -> String {
    if secs == 0 {
        return String::new();
    }
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}
