//! Response timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a UTC instant as RFC 3339 with millisecond precision and a `Z` suffix.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the current time formatted with [`format_timestamp`].
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
