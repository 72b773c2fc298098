use chrono::DateTime;

/// Compact elapsed time, e.g. `1D 2H 5Min`. Zero components are omitted and
/// seconds are dropped, so anything under a minute renders as an empty string.
pub fn format_runtime(elapsed_seconds: i64) -> String {
    let total = elapsed_seconds.max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    let mut parts: Vec<String> = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days}D"));
    }
    if hours > 0 {
        parts.push(format!("{hours}H"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}Min"));
    }
    parts.join(" ")
}

/// Bar wall-clock time as `10:00 AM (01 March 2021)`.
pub fn format_clock(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%I:%M %p (%d %B %Y)").to_string(),
        None => timestamp.to_string(),
    }
}
