use chrono::{NaiveDateTime, TimeZone, Utc};

const ENTRY_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Accepts `true|1|yes` and `false|0|no`, case-insensitive.
pub fn parse_breakeven(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!(
            "invalid breakeven value: {other} (expected true|1|yes or false|0|no)"
        )),
    }
}

/// Parses an entry time and truncates it to the calendar minute.
///
/// ISO-like forms are tried first, then the price file's own pattern.
pub fn parse_entry_time(value: &str, data_format: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    let naive = ENTRY_TIME_FORMATS
        .iter()
        .copied()
        .chain(std::iter::once(data_format))
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            format!("invalid entry time: {value} (expected YYYY-MM-DD HH:MM or {data_format})")
        })?;
    let timestamp = Utc.from_utc_datetime(&naive).timestamp();
    Ok(timestamp - timestamp.rem_euclid(60))
}
