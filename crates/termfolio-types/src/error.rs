//! Error types for termfolio.
//!
//! Every variant renders as the exact line the terminal shows the visitor,
//! so the executor can turn any error into a displayable result with
//! `to_string()`.

use std::io;

/// Errors produced by the termfolio filesystem, handlers, and session.
#[derive(Debug, thiserror::Error)]
pub enum TermfolioError {
    #[error("{0}: No such file or directory")]
    NotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("{0}: File exists")]
    AlreadyExists(String),

    #[error("{0}: parent directory does not exist")]
    InvalidParent(String),

    #[error("{0}: Directory not empty")]
    NotEmpty(String),

    /// Malformed flag value, bad pattern, or missing argument. The payload
    /// is the complete message (usually a usage line).
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unknown command: {0}. Type 'help' to see all available commands.")]
    UnknownCommand(String),

    #[error("Error during execution: {0}")]
    HandlerFault(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TermfolioError>;

/// Shorthand for a usage error: `usage("cat [file]")` renders as
/// `Usage: cat [file]`.
pub fn usage(text: &str) -> TermfolioError {
    TermfolioError::InvalidArgument(format!("Usage: {text}"))
}
