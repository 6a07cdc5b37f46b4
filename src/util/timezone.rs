use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, UtcOffset};

/// Calendar date of `instant` as observed on a wall clock in `tz`.
pub fn localized_date(instant: OffsetDateTime, tz: Tz) -> Date {
    let utc = instant.to_offset(UtcOffset::UTC);
    utc.to_offset(zone_offset(utc, tz)).date()
}

/// Offset of `tz` at `utc`; instants chrono cannot represent fall back to UTC.
fn zone_offset(utc: OffsetDateTime, tz: Tz) -> UtcOffset {
    DateTime::<Utc>::from_timestamp(utc.unix_timestamp(), 0)
        .map(|moment| {
            tz.offset_from_utc_datetime(&moment.naive_utc())
                .fix()
                .local_minus_utc()
        })
        .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
        .unwrap_or(UtcOffset::UTC)
}
