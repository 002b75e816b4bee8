//! Mapping a local calendar day onto a UTC instant range.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Converts a local date at midnight to UTC.
///
/// Handles DST ambiguity (fall-back) by picking the earlier instant. A
/// spring-forward gap at midnight is rare but possible; 1am local is
/// guaranteed to exist, so fall forward to it.
pub fn local_midnight_to_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            tz.from_local_datetime(&one_am)
                .earliest()
                .unwrap()
                .with_timezone(&Utc)
        }
    }
}

/// Returns the half-open UTC window `[midnight, next midnight)` covering one
/// local calendar day.
///
/// The wall-clock span is always exactly one day, but the UTC span may be 23
/// or 25 hours on DST transition days.
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date + Duration::days(1);
    (local_midnight_to_utc(date, tz), local_midnight_to_utc(next, tz))
}
