//! Shared utility functions for the air-quality crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
    use serde::Serializer;

    /// Date format used for daily rows: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Timestamp format used for hourly and forecast rows: "YYYY-MM-DD HH:MM:SS"
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Timestamp layouts accepted on input, tried in order.
    const TIMESTAMP_INPUT_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    #[derive(Debug, thiserror::Error)]
    #[error("Date error: {0}")]
    pub struct DateError(pub String);

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|e| DateError(format!("{s:?} is not a YYYY-MM-DD date: {e}")))
    }

    /// Format a NaiveDateTime as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp, with either a space or a `T` between date and time
    /// and with or without seconds.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = s.trim();
        TIMESTAMP_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| DateError(format!("{s:?} is not a recognized timestamp")))
    }

    /// Serde helper writing a NaiveDateTime in [`TIMESTAMP_FORMAT`].
    pub fn serialize_timestamp<S: Serializer>(
        ts: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    /// Encode a date as the integer YYYYMMDD, e.g. 2024-01-15 -> 20240115.
    pub fn date_key(date: &NaiveDate) -> i64 {
        i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
    }

    /// Season code for a calendar month: 1=winter (Dec-Feb), 2=spring (Mar-May),
    /// 3=summer (Jun-Aug), 4=autumn (Sep-Nov).
    pub fn season_code(month: u32) -> u8 {
        ((month % 12 + 3) / 3) as u8
    }

    /// Saturday and Sunday are weekend days.
    pub fn is_weekend(date: &NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Day of week with Monday = 0 and Sunday = 6.
    pub fn day_of_week(date: &NaiveDate) -> u32 {
        date.weekday().num_days_from_monday()
    }

    /// Drop minutes, seconds and sub-seconds from a timestamp.
    pub fn truncate_to_hour(ts: &NaiveDateTime) -> NaiveDateTime {
        ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap_or(*ts)
    }

}

/// Value range helpers
pub mod range {
    /// Lower bound for AQI and PM2.5 values.
    pub const VALUE_MIN: f64 = 0.0;

    /// Upper bound for AQI and PM2.5 values.
    pub const VALUE_MAX: f64 = 500.0;

    /// Clip a value into `[lo, hi]`. NaN maps to `lo`.
    pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
        value.max(lo).min(hi)
    }

    /// Clip a pollutant value into `[VALUE_MIN, VALUE_MAX]`.
    pub fn clip_value(value: f64) -> f64 {
        clip(value, VALUE_MIN, VALUE_MAX)
    }

    /// Round to one decimal place.
    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

}
