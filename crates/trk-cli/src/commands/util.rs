//! Shared argument parsing for CLI commands.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parses a time argument into a UTC instant.
///
/// Accepts:
/// - `now` (the provided reference instant)
/// - `-N`: N minutes before now
/// - `HH:MM`: that wall-clock time today, in the local timezone
pub fn parse_time_arg(arg: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if arg.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Some(offset) = arg.strip_prefix('-') {
        let minutes: i64 = offset
            .parse()
            .with_context(|| format!("{offset} in {arg} is not an integer"))?;
        return Ok(now - Duration::minutes(minutes));
    }

    let Some((hours, minutes)) = arg.split_once(':') else {
        bail!("{arg} is neither 'now', -minutes, nor HH:MM");
    };
    if minutes.contains(':') {
        bail!("{arg} is neither 'now', -minutes, nor HH:MM");
    }
    let hour: u32 = hours
        .parse()
        .with_context(|| format!("bad hour in {arg}"))?;
    let minute: u32 = minutes
        .parse()
        .with_context(|| format!("bad minute in {arg}"))?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .with_context(|| format!("{arg} is not a valid clock time"))?;

    let today = now.with_timezone(&Local).date_naive();
    match Local.from_local_datetime(&today.and_time(time)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => bail!("{arg} does not exist today (DST transition)"),
    }
}

/// Parses a date argument.
///
/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, `MM-DD`, and `MMDD`; the month-day
/// forms assume the current year. `None` means today.
pub fn parse_date_arg(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(arg) = arg else {
        return Ok(today);
    };
    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(arg, format) {
            return Ok(date);
        }
    }
    // chrono cannot parse a date without a year, so splice in the current one.
    let with_year = format!("{}-{arg}", today.year());
    for format in ["%Y-%m-%d", "%Y-%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
            return Ok(date);
        }
    }
    bail!("{arg} is not a date");
}
