//! The editable day-block text format.
//!
//! A day serializes to UTF-8 text: a `YYYY-MM-DD` header, one empty
//! separator line, then one line per event in ascending start-time order:
//!
//! ```text
//! 2025-06-15
//!
//! 09:00  write report
//! \t09:30  phone call %pauses
//! \t10:05  END
//! ```
//!
//! Indentation is one tab per nesting level, times are local wall clock,
//! and a trailing ` %pauses` records the pause flag. [`parse_day`] inverts
//! [`format_day`] exactly, so a user can bulk-edit a day as text.

use std::fmt;

use chrono::{Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

use crate::day::local_midnight_to_utc;
use crate::event::{Event, PAUSE_MARKER, ValidationError};

/// Errors raised by the day-block codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// `format_day` was handed an event from a different calendar day.
    /// This is a caller defect, not a user input error.
    #[error("event {name:?} at {start_time} does not fall on {date}")]
    MixedDays {
        name: String,
        start_time: chrono::DateTime<Utc>,
        date: NaiveDate,
    },

    /// The first line is not a `YYYY-MM-DD` date.
    #[error("first line must be a YYYY-MM-DD date, found {line:?}")]
    BadHeader {
        line: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The second line must be empty.
    #[error("second line must be empty, found {line:?}")]
    SeparatorNotEmpty { line: String },

    /// An event line does not start with a `HH:MM` time after its
    /// indentation.
    #[error("line {number}: expected HH:MM after indentation, found {rest:?}")]
    BadTime { number: usize, rest: String },

    /// An event line's name failed validation.
    #[error("line {number}: {source}")]
    BadName {
        number: usize,
        #[source]
        source: ValidationError,
    },
}

/// Formats a day's events as an editable text block.
///
/// Events may arrive in any order; output lines are sorted ascending by
/// start time. Every event must fall on `date` in `tz`, otherwise the
/// caller assembled an inconsistent set and [`CodecError::MixedDays`] is
/// returned. An empty set produces just the header and separator.
pub fn format_day<Tz>(events: &[Event], date: NaiveDate, tz: &Tz) -> Result<String, CodecError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|event| event.start_time);

    let mut text = format!("{}\n\n", date.format("%Y-%m-%d"));
    for event in ordered {
        let local = event.start_time.with_timezone(tz);
        if local.date_naive() != date {
            return Err(CodecError::MixedDays {
                name: event.name.clone(),
                start_time: event.start_time,
                date,
            });
        }
        for _ in 0..event.level {
            text.push('\t');
        }
        text.push_str(&format!("{}  {}", local.format("%H:%M"), event.name));
        if event.pauses {
            text.push(' ');
            text.push_str(PAUSE_MARKER);
        }
        text.push('\n');
    }
    Ok(text)
}

/// Parses an edited day block back into events.
///
/// The header date is the local reference day for every timestamp in the
/// block. Blank lines after the separator are skipped. Each event line is
/// `<tabs><HH:MM>  <name>[ %pauses]`; the tab count is the level and the
/// time is local wall clock on the header date.
pub fn parse_day<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<Vec<Event>, CodecError> {
    let lines: Vec<&str> = text.split('\n').collect();

    let header = lines.first().copied().unwrap_or_default();
    let date = NaiveDate::parse_from_str(header.trim_end(), "%Y-%m-%d").map_err(|source| {
        CodecError::BadHeader {
            line: header.to_owned(),
            source,
        }
    })?;
    if lines.len() > 1 && !lines[1].is_empty() {
        return Err(CodecError::SeparatorNotEmpty {
            line: lines[1].to_owned(),
        });
    }

    let mut events = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(2) {
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let level = line.chars().take_while(|&c| c == '\t').count() as u32;
        let rest = line.trim_start_matches('\t');

        let time = parse_clock(rest).ok_or_else(|| CodecError::BadTime {
            number,
            rest: rest.to_owned(),
        })?;
        let start_time = local_time_to_utc(date, time, tz);

        let remainder = rest[5..].trim();
        let (name, pauses) = match remainder.strip_suffix(&format!(" {PAUSE_MARKER}")) {
            Some(name) => (name, true),
            None => (remainder, false),
        };

        let event = Event::new(start_time, pauses, name, level)
            .map_err(|source| CodecError::BadName { number, source })?;
        events.push(event);
    }
    Ok(events)
}

/// Parses the fixed-width `HH:MM` prefix of an event line.
fn parse_clock(rest: &str) -> Option<NaiveTime> {
    // `get` refuses to split a multibyte character, so garbage lines fail
    // here rather than panic.
    let field = rest.get(..5)?;
    if field.as_bytes()[2] != b':' {
        return None;
    }
    let hour: u32 = field[..2].parse().ok()?;
    let minute: u32 = field[3..5].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Interprets a wall-clock time on a local date as a UTC instant.
///
/// Fall-back ambiguity takes the earlier instant; a time inside a
/// spring-forward gap is measured as an offset from local midnight.
fn local_time_to_utc<Tz: TimeZone>(
    date: NaiveDate,
    time: NaiveTime,
    tz: &Tz,
) -> chrono::DateTime<Utc> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            local_midnight_to_utc(date, tz)
                + Duration::seconds(i64::from(time.num_seconds_from_midnight()))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, Timelike};

    use super::*;

    // UTC+2, no DST, keeps the local/UTC distinction visible in tests.
    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn event(hour: u32, minute: u32, pauses: bool, name: &str, level: u32) -> Event {
        let local = tz()
            .with_ymd_and_hms(2025, 6, 15, hour, minute, 0)
            .unwrap();
        if name == "END" {
            Event::end(local.with_timezone(&Utc), level)
        } else {
            Event::new(local.with_timezone(&Utc), pauses, name, level).unwrap()
        }
    }

    #[test]
    fn empty_day_is_header_and_separator_only() {
        let text = format_day(&[], day(), &tz()).unwrap();
        assert_eq!(text, "2025-06-15\n\n");
        assert_eq!(parse_day(&text, &tz()).unwrap(), Vec::<Event>::new());
    }

    #[test]
    fn formats_sorted_with_tabs_and_pause_marker() {
        // Deliberately out of order.
        let events = vec![
            event(9, 30, true, "phone call", 1),
            event(9, 0, false, "write report", 0),
            event(10, 5, false, "END", 1),
        ];
        let text = format_day(&events, day(), &tz()).unwrap();
        assert_eq!(
            text,
            "2025-06-15\n\
             \n\
             09:00  write report\n\
             \t09:30  phone call %pauses\n\
             \t10:05  END\n"
        );
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let events = vec![
            event(9, 0, false, "write report", 0),
            event(9, 30, true, "phone call", 1),
            event(10, 5, false, "END", 1),
            event(11, 45, false, "deep work", 2),
        ];
        let text = format_day(&events, day(), &tz()).unwrap();
        let parsed = parse_day(&text, &tz()).unwrap();
        assert_eq!(parsed, events);
    }

    #[test]
    fn mixed_days_is_an_internal_error() {
        let stray = Event::new(
            tz().with_ymd_and_hms(2025, 6, 16, 9, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
            false,
            "stray",
            0,
        )
        .unwrap();
        let result = format_day(&[stray], day(), &tz());
        assert!(matches!(result, Err(CodecError::MixedDays { .. })));
    }

    #[test]
    fn parse_rejects_nonempty_separator() {
        let result = parse_day("2025-06-15\noops\n09:00  task\n", &tz());
        assert!(matches!(result, Err(CodecError::SeparatorNotEmpty { .. })));
    }

    #[test]
    fn parse_rejects_bad_header() {
        let result = parse_day("not a date\n\n", &tz());
        assert!(matches!(result, Err(CodecError::BadHeader { .. })));
    }

    #[test]
    fn parse_rejects_malformed_time_field() {
        for line in ["9:00  task", "09.00  task", "09:0", "task"] {
            let text = format!("2025-06-15\n\n{line}\n");
            let result = parse_day(&text, &tz());
            assert!(
                matches!(result, Err(CodecError::BadTime { number: 3, .. })),
                "{line:?} should fail"
            );
        }
    }

    #[test]
    fn parse_rejects_multibyte_garbage_in_the_time_field() {
        // The fifth byte lands inside 'é'; this must be a parse error,
        // never a slice panic.
        let result = parse_day("2025-06-15\n\nab:cé  x\n", &tz());
        assert!(matches!(result, Err(CodecError::BadTime { .. })));
    }

    #[test]
    fn parse_rejects_out_of_range_time() {
        let result = parse_day("2025-06-15\n\n25:00  task\n", &tz());
        assert!(matches!(result, Err(CodecError::BadTime { .. })));
    }

    #[test]
    fn parse_rejects_reserved_character_in_name() {
        let result = parse_day("2025-06-15\n\n09:00  fifty % done\n", &tz());
        assert!(matches!(
            result,
            Err(CodecError::BadName {
                number: 3,
                source: ValidationError::ReservedCharacter { .. }
            })
        ));
    }

    #[test]
    fn parse_skips_blank_lines_between_events() {
        let text = "2025-06-15\n\n09:00  one\n\n\t10:00  two\n\n";
        let parsed = parse_day(text, &tz()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "one");
        assert_eq!(parsed[1].level, 1);
    }

    #[test]
    fn parse_interprets_times_as_local_wall_clock() {
        let parsed = parse_day("2025-06-15\n\n09:00  task\n", &tz()).unwrap();
        let expected: DateTime<Utc> = tz()
            .with_ymd_and_hms(2025, 6, 15, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed[0].start_time, expected);
        assert_eq!(parsed[0].start_time.hour(), 7);
    }

    #[test]
    fn header_without_separator_line_parses_as_empty_day() {
        assert_eq!(parse_day("2025-06-15", &tz()).unwrap(), Vec::<Event>::new());
    }

    #[test]
    fn fall_back_ambiguity_takes_the_earlier_instant() {
        use chrono_tz::America::New_York;
        // 01:30 occurs twice on 2025-11-02; the EDT (UTC-4) reading wins.
        let parsed = parse_day("2025-11-02\n\n01:30  overnight\n", &New_York).unwrap();
        assert_eq!(
            parsed[0].start_time,
            Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap()
        );
    }

    #[test]
    fn spring_forward_gap_measures_from_midnight() {
        use chrono_tz::America::New_York;
        // 02:30 does not exist on 2025-03-09; midnight EST + 2h30m = 07:30 UTC.
        let parsed = parse_day("2025-03-09\n\n02:30  ghost\n", &New_York).unwrap();
        assert_eq!(
            parsed[0].start_time,
            Utc.with_ymd_and_hms(2025, 3, 9, 7, 30, 0).unwrap()
        );
    }
}
