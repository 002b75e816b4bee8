//! Start command: begin a task, as a sub-task, a pause, or a sibling.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use trk_core::{Event, StartMode, level_for_start, resolve_active};
use trk_db::{Database, SortOrder};

use super::util;

/// Runs the start command.
///
/// `Push` nests the new task one level under the active one (`pause`
/// tells a pause apart from a planned sub-task, display-wise). `Next`
/// replaces the active task with a sibling at the same level; no END
/// marker is written, the sibling shadows it by being later in time.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    mode: StartMode,
    pause: bool,
    at: &str,
    name: &[String],
) -> Result<()> {
    let now = Utc::now();
    let start_time = util::parse_time_arg(at, now)?;
    let name = name.join(" ");

    let today = now.with_timezone(&Local).date_naive();
    let events = db.events_for_day(today, &Local, SortOrder::Descending)?;
    let active = resolve_active(&events);

    let level = level_for_start(active, mode);
    let event = Event::new(start_time, pause, name, level)?;

    if let Some(active) = active {
        match mode {
            StartMode::Next => writeln!(
                writer,
                "ending '{}', start time = {}, end time = {}",
                active.name,
                clock(active.start_time),
                clock(event.start_time),
            )?,
            StartMode::Push => {
                let verb = if pause { "pausing" } else { "subtask of" };
                writeln!(
                    writer,
                    "{verb} '{}', start time = {}",
                    active.name,
                    clock(active.start_time),
                )?;
            }
        }
    }
    writeln!(
        writer,
        "starting '{}', start time = {}",
        event.name,
        clock(event.start_time),
    )?;

    db.insert_event(&event)?;
    Ok(())
}

/// Local wall-clock HH:MM for status lines.
pub(super) fn clock(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}
