//! Deriving the active task from a day's events.
//!
//! A day's log is flat: no parent pointers, just timestamped events with a
//! nesting level. The nesting stack is implicit in the time ordering. An
//! `END` at level L closes everything at depth >= L that was still open,
//! while shallower ancestor frames stay open. Scanning backward in time and
//! tracking the minimum closing level seen reconstructs which frame, if any,
//! is still open, in a single pass.

use crate::event::Event;

/// How a new start relates to the currently active event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Descend one level: a sub-task or a pause of the active event.
    Push,
    /// Replace the active event with a sibling at the same level.
    ///
    /// No `END` marker is written; the superseded sibling becomes
    /// unreachable purely because the new event is chronologically later
    /// at the same level. Resolution depends on this shadowing.
    Next,
}

/// Returns the currently active event, given a day's events ordered from
/// most recent to oldest.
pub fn resolve_active(events_desc: &[Event]) -> Option<&Event> {
    let mut closed_at_or_above = u32::MAX;
    for event in events_desc {
        if event.is_end() {
            closed_at_or_above = closed_at_or_above.min(event.level);
        } else if event.level < closed_at_or_above {
            return Some(event);
        }
        // Otherwise the event's level was already closed by a later END.
    }
    None
}

/// Level at which a new start event should be recorded.
pub fn level_for_start(active: Option<&Event>, mode: StartMode) -> u32 {
    match (active, mode) {
        (None, _) => 0,
        (Some(event), StartMode::Next) => event.level,
        (Some(event), StartMode::Push) => event.level + 1,
    }
}

/// Level at which a stop's `END` marker should be recorded.
pub fn level_for_stop(active: Option<&Event>) -> u32 {
    active.map_or(0, |event| event.level)
}
