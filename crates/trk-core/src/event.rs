//! The event record and its validated construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved event name that closes the current nesting level.
///
/// An event named `END` is a marker, not a real task: resolution treats it
/// as "everything at this level or deeper is now closed".
pub const END_NAME: &str = "END";

/// Suffix appended to a formatted line when the event pauses its parent.
pub const PAUSE_MARKER: &str = "%pauses";

/// Validation errors raised when constructing an [`Event`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `%` is reserved for the pause marker in the text format.
    #[error("'%' is a reserved symbol, not permitted in name {name:?}")]
    ReservedCharacter { name: String },

    /// Names must be non-empty.
    #[error("event name cannot be empty")]
    EmptyName,

    /// Tabs and newlines carry structure in the text format, so a name
    /// containing them could never round-trip through an edit.
    #[error("control characters are not permitted in name {name:?}")]
    ControlCharacter { name: String },
}

/// One timestamped record in a day's log.
///
/// Events are immutable once constructed. The instant is canonically UTC;
/// the local calendar day it belongs to is derived at query and display
/// time. `level` is the nesting depth, 0 being top-level; it only has
/// meaning relative to neighboring events in time order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// When the task (or END marker) begins, in UTC.
    pub start_time: DateTime<Utc>,
    /// Whether this event interrupts its parent rather than refining it.
    /// Display-only: has no effect on level arithmetic or resolution.
    pub pauses: bool,
    /// Free-form label. `END` is reserved for close markers.
    pub name: String,
    /// Nesting depth, 0 = top-level.
    pub level: u32,
}

impl Event {
    /// Constructs a validated event.
    ///
    /// Rejects empty names, names containing `%`, and names containing
    /// control characters (tab and newline would corrupt the text
    /// format). Validation happens here, once, so downstream code never
    /// has to re-check.
    pub fn new(
        start_time: DateTime<Utc>,
        pauses: bool,
        name: impl Into<String>,
        level: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.contains('%') {
            return Err(ValidationError::ReservedCharacter { name });
        }
        if name.chars().any(char::is_control) {
            return Err(ValidationError::ControlCharacter { name });
        }
        Ok(Self {
            start_time,
            pauses,
            name,
            level,
        })
    }

    /// Constructs the END marker closing the frame at `level`.
    pub fn end(start_time: DateTime<Utc>, level: u32) -> Self {
        Self {
            start_time,
            pauses: false,
            name: END_NAME.to_owned(),
            level,
        }
    }

    /// Whether this event is a close marker rather than a real task.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.name == END_NAME
    }
}
