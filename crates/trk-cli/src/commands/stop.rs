//! Stop command: close the active task's frame.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, Utc};

use trk_core::{Event, level_for_stop, resolve_active};
use trk_db::{Database, SortOrder};

use super::start::clock;
use super::util;

/// Runs the stop command.
///
/// Appends an END marker at the active level, then re-resolves: if an
/// enclosing frame is still open, report that we are returning to it.
pub fn run<W: Write>(writer: &mut W, db: &Database, at: &str) -> Result<()> {
    let now = Utc::now();
    let stop_time = util::parse_time_arg(at, now)?;

    let today = now.with_timezone(&Local).date_naive();
    let events = db.events_for_day(today, &Local, SortOrder::Descending)?;
    let active = resolve_active(&events);

    let level = level_for_stop(active);
    let marker = Event::end(stop_time, level);

    match active {
        Some(active) => writeln!(
            writer,
            "ending '{}', start time = {}, end time = {}",
            active.name,
            clock(active.start_time),
            clock(marker.start_time),
        )?,
        None => writeln!(writer, "end time = {}", clock(marker.start_time))?,
    }

    db.insert_event(&marker)?;

    let events = db.events_for_day(today, &Local, SortOrder::Descending)?;
    if let Some(resumed) = resolve_active(&events) {
        writeln!(
            writer,
            "returning to '{}', start time = {}",
            resumed.name,
            clock(resumed.start_time),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use trk_core::StartMode;

    use super::*;

    fn start(db: &Database, mode: StartMode, name: &str) {
        let mut sink = Vec::new();
        super::super::start::run(&mut sink, db, mode, false, "now", &[name.to_owned()]).unwrap();
    }

    fn stop(db: &Database) -> String {
        let mut output = Vec::new();
        run(&mut output, db, "now").unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn stop_returns_to_the_enclosing_task() {
        let db = Database::open_in_memory().unwrap();
        start(&db, StartMode::Push, "top");
        start(&db, StartMode::Push, "sub");

        let output = stop(&db);
        assert!(output.contains("ending 'sub'"), "{output}");
        assert!(output.contains("returning to 'top'"), "{output}");

        let today = Utc::now().with_timezone(&Local).date_naive();
        let events = db
            .events_for_day(today, &Local, SortOrder::Descending)
            .unwrap();
        assert_eq!(resolve_active(&events).unwrap().name, "top");
    }

    #[test]
    fn final_stop_leaves_nothing_active() {
        let db = Database::open_in_memory().unwrap();
        start(&db, StartMode::Push, "top");

        let output = stop(&db);
        assert!(output.contains("ending 'top'"), "{output}");
        assert!(!output.contains("returning to"), "{output}");

        let today = Utc::now().with_timezone(&Local).date_naive();
        let events = db
            .events_for_day(today, &Local, SortOrder::Descending)
            .unwrap();
        assert_eq!(resolve_active(&events), None);
    }

    #[test]
    fn stop_with_nothing_active_writes_a_marker_at_level_zero() {
        let db = Database::open_in_memory().unwrap();
        let output = stop(&db);
        assert!(output.starts_with("end time = "), "{output}");

        let today = Utc::now().with_timezone(&Local).date_naive();
        let events = db
            .events_for_day(today, &Local, SortOrder::Descending)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_end());
        assert_eq!(events[0].level, 0);
    }
}
