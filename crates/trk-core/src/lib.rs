//! Core domain logic for the nested task tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the immutable timestamped records a day is made of
//! - Resolution: deriving the currently active task from a day's events
//! - Text codec: the editable day-block format and its parser
//! - Day windows: mapping a local calendar day to a UTC instant range

pub mod day;
pub mod event;
pub mod resolve;
pub mod text;

pub use day::{day_window, local_midnight_to_utc};
pub use event::{END_NAME, Event, PAUSE_MARKER, ValidationError};
pub use resolve::{StartMode, level_for_start, level_for_stop, resolve_active};
pub use text::{CodecError, format_day, parse_day};
