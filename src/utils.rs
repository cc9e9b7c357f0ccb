use chrono::{DateTime, Utc};

use crate::error::Error;

/// Formats a unix timestamp as a 12-hour wall-clock string, e.g. "07:45 PM".
///
/// Display convention is UTC, zero-padded hour, no seconds. Timestamps chrono
/// cannot represent are surfaced as an error rather than defaulted.
pub fn clock_time(seconds: i64) -> Result<String, Error> {
    let time = DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or(Error::TimestampOutOfRange { seconds })?;

    Ok(time.format("%I:%M %p").to_string())
}
