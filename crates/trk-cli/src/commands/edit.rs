//! Edit command: round-trip a day through the user's editor.

use anyhow::{Context, Result};
use chrono::{Local, Utc};

use trk_core::{format_day, parse_day};
use trk_db::{Database, SortOrder};

use crate::editor;

use super::util;

/// Runs the edit command for the given day (default today).
///
/// The day is formatted, handed to the editor, parsed back, and the
/// stored day is atomically replaced. A parse failure aborts before any
/// write, leaving the day untouched.
pub fn run(db: &mut Database, date: Option<&str>) -> Result<()> {
    let today = Utc::now().with_timezone(&Local).date_naive();
    let date = util::parse_date_arg(date, today)?;

    let events = db.events_for_day(date, &Local, SortOrder::Ascending)?;
    let text = format_day(&events, date, &Local)
        .context("stored events are inconsistent with the requested day")?;

    let edited = editor::edit_string(&text)?;

    let events = parse_day(&edited, &Local)
        .context("edited text is not a valid day block; nothing was saved")?;
    db.overwrite_day(date, &Local, &events)?;
    tracing::info!(%date, count = events.len(), "day replaced from editor");
    Ok(())
}
