//! Resolves the configured canonical timezone into concrete local times.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current wall-clock date and time in `local_timezone`.
///
/// Aggregation and month-bound calculations work with naive local datetimes,
/// so the offset is applied here and then discarded.
pub fn current_local_datetime(local_timezone: &str) -> Result<PrimitiveDateTime, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    let now = OffsetDateTime::now_utc().to_offset(local_offset);

    Ok(PrimitiveDateTime::new(now.date(), now.time()))
}
