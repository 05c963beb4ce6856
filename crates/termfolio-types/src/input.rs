//! Front-end agnostic key events.
//!
//! A terminal front-end (stdin loop, web view, test harness) maps its native
//! key handling onto these variants before handing them to a session.

use serde::{Deserialize, Serialize};

/// Keys with special meaning to a terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Submit the current input line.
    Enter,
    /// Replace the input with the best completion suggestion.
    Tab,
    /// Recall the previous (older) history entry.
    Up,
    /// Recall the next (newer) history entry, or clear the line.
    Down,
}

/// What the front-end should do with its input line after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Replace the input line with this text.
    SetInput(String),
    /// Leave the input line as it is.
    Keep,
}
