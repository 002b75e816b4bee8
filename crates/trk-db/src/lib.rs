//! Storage layer for the nested task tracker.
//!
//! Provides persistence for day logs using `rusqlite`.
//!
//! # Schema
//!
//! One table, `entries`, mirroring the event value exactly:
//! `(start_time TEXT, pauses INTEGER, name TEXT, level INTEGER)`.
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC format (e.g.,
//! `2025-06-15T10:30:00Z`), so lexicographic ordering matches chronological
//! ordering and day-window queries are plain string range comparisons.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. The tracker is single-writer by design; nothing here coordinates
//! concurrent access beyond SQLite's own locking.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use rusqlite::{Connection, params};
use thiserror::Error;

use trk_core::{Event, day_window};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored timestamp failed to parse back.
    #[error("invalid timestamp for entry {name:?}: {timestamp}")]
    TimestampParse {
        name: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A stored row failed event validation (e.g., a reserved character
    /// snuck into a name outside this code path).
    #[error("invalid entry row: {source}")]
    InvalidEntry {
        #[source]
        source: trk_core::ValidationError,
    },

    /// A stored level is out of range.
    #[error("invalid level for entry {name:?}: {level}")]
    InvalidLevel { name: String, level: i64 },
}

/// Query ordering for a day's events.
///
/// Display wants ascending; resolution scans newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entries (
                start_time TEXT NOT NULL,
                pauses INTEGER NOT NULL CHECK (pauses IN (0, 1)),
                name TEXT NOT NULL,
                level INTEGER NOT NULL CHECK (level >= 0)
            );

            CREATE INDEX IF NOT EXISTS idx_entries_start_time ON entries(start_time);
            ",
        )?;
        Ok(())
    }

    /// Appends one event. The instant is already UTC by construction.
    pub fn insert_event(&self, event: &Event) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO entries (start_time, pauses, name, level) VALUES (?, ?, ?, ?)",
            params![
                format_timestamp(event.start_time),
                i64::from(event.pauses),
                event.name,
                i64::from(event.level),
            ],
        )?;
        tracing::debug!(name = %event.name, level = event.level, "inserted entry");
        Ok(())
    }

    /// Returns every event falling on `date` in `tz`, ordered by start time.
    ///
    /// The window is the local calendar day's half-open UTC range, so DST
    /// transition days query 23 or 25 UTC hours.
    pub fn events_for_day<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        tz: &Tz,
        order: SortOrder,
    ) -> Result<Vec<Event>, DbError> {
        let (start, end) = day_window(date, tz);
        let sql = match order {
            SortOrder::Ascending => {
                "SELECT start_time, pauses, name, level FROM entries
                 WHERE start_time >= ? AND start_time < ?
                 ORDER BY start_time ASC"
            }
            SortOrder::Descending => {
                "SELECT start_time, pauses, name, level FROM entries
                 WHERE start_time >= ? AND start_time < ?
                 ORDER BY start_time DESC"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(
            [format_timestamp(start), format_timestamp(end)],
            |row| {
                Ok(RawEntry {
                    start_time: row.get(0)?,
                    pauses: row.get(1)?,
                    name: row.get(2)?,
                    level: row.get(3)?,
                })
            },
        )?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_event()?);
        }
        Ok(events)
    }

    /// Atomically replaces every event on `date` with `events`.
    ///
    /// Delete-then-insert inside one transaction: either the whole day is
    /// replaced or, on any failure, the prior state is left intact.
    pub fn overwrite_day<Tz: TimeZone>(
        &mut self,
        date: NaiveDate,
        tz: &Tz,
        events: &[Event],
    ) -> Result<(), DbError> {
        let (start, end) = day_window(date, tz);
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM entries WHERE start_time >= ? AND start_time < ?",
            params![format_timestamp(start), format_timestamp(end)],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (start_time, pauses, name, level) VALUES (?, ?, ?, ?)",
            )?;
            for event in events {
                stmt.execute(params![
                    format_timestamp(event.start_time),
                    i64::from(event.pauses),
                    event.name,
                    i64::from(event.level),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(%date, deleted, inserted = events.len(), "overwrote day");
        Ok(())
    }
}

/// An entry row as stored, before conversion back to an [`Event`].
struct RawEntry {
    start_time: String,
    pauses: i64,
    name: String,
    level: i64,
}

impl RawEntry {
    fn into_event(self) -> Result<Event, DbError> {
        let start_time = DateTime::parse_from_rfc3339(&self.start_time)
            .map_err(|source| DbError::TimestampParse {
                name: self.name.clone(),
                timestamp: self.start_time.clone(),
                source,
            })?
            .with_timezone(&Utc);
        let level = u32::try_from(self.level).map_err(|_| DbError::InvalidLevel {
            name: self.name.clone(),
            level: self.level,
        })?;
        Event::new(start_time, self.pauses != 0, self.name, level)
            .map_err(|source| DbError::InvalidEntry { source })
    }
}

/// Formats a timestamp in the canonical storage format.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
