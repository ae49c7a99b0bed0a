// Types layer - All data structures
pub mod db;
pub mod dto;
pub mod internal;

/// Current time as Unix epoch milliseconds, the resolution stored in every timestamp column
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a stored millisecond timestamp as RFC 3339
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_default()
}
