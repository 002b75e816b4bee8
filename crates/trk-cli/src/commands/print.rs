//! Print command: render a day as the indented text block.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, Utc};

use trk_core::format_day;
use trk_db::{Database, SortOrder};

use super::util;

/// Runs the print command for the given day (default today).
pub fn run<W: Write>(writer: &mut W, db: &Database, date: Option<&str>) -> Result<()> {
    let today = Utc::now().with_timezone(&Local).date_naive();
    let date = util::parse_date_arg(date, today)?;

    let events = db.events_for_day(date, &Local, SortOrder::Ascending)?;
    let text = format_day(&events, date, &Local)
        .context("stored events are inconsistent with the requested day")?;
    write!(writer, "{text}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use trk_core::Event;

    use super::*;

    fn print(db: &Database, date: Option<&str>) -> String {
        let mut output = Vec::new();
        run(&mut output, db, date).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn empty_day_prints_header_and_separator_only() {
        let db = Database::open_in_memory().unwrap();
        let output = print(&db, Some("2025-06-15"));
        assert_eq!(output, "2025-06-15\n\n");
    }

    #[test]
    fn prints_events_in_ascending_order_with_indentation() {
        let db = Database::open_in_memory().unwrap();
        // Build instants from local wall-clock times so the output is
        // stable regardless of the machine's timezone.
        let nine = Local
            .with_ymd_and_hms(2025, 6, 15, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let ten = Local
            .with_ymd_and_hms(2025, 6, 15, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        db.insert_event(&Event::new(ten, true, "phone call", 1).unwrap())
            .unwrap();
        db.insert_event(&Event::new(nine, false, "write report", 0).unwrap())
            .unwrap();

        let output = print(&db, Some("2025-06-15"));
        assert_eq!(
            output,
            "2025-06-15\n\n09:00  write report\n\t10:00  phone call %pauses\n"
        );
    }
}
