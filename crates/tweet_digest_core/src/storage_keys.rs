use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Width of a collection window. Each UTC day splits into 24 / WINDOW_HOURS
/// windows; the window index is part of the bucket key.
pub const WINDOW_HOURS: u32 = 8;

pub const BUCKET_FILE_NAME: &str = "tweets.json";

/// Bucket key for the window containing `instant`, of the form
/// `<prefix>/<year>-<month>-<day>-<window_index>/tweets.json`.
pub fn bucket_key_at(prefix: &str, instant: DateTime<Utc>) -> String {
    let trimmed = prefix.trim_matches('/');
    let window_index = instant.hour() / WINDOW_HOURS;
    format!(
        "{trimmed}/{}-{:02}-{:02}-{window_index}/{BUCKET_FILE_NAME}",
        instant.year(),
        instant.month(),
        instant.day(),
    )
}

pub fn current_bucket_key(prefix: &str, now: DateTime<Utc>) -> String {
    bucket_key_at(prefix, now)
}

/// Key of the window immediately preceding the one containing `now`.
pub fn previous_bucket_key(prefix: &str, now: DateTime<Utc>) -> String {
    bucket_key_at(prefix, now - Duration::hours(i64::from(WINDOW_HOURS)))
}
