//! Foundation types for termfolio.
//!
//! This crate holds the pieces shared by every other termfolio crate: the
//! error taxonomy surfaced by the terminal, the runtime configuration, and
//! the key events a terminal front-end feeds into a session.

pub mod config;
pub mod error;
pub mod input;
