//! Command interpreter for the termfolio terminal.
//!
//! Provides a `Command` trait, a registry that dispatches input lines to
//! commands, the built-in command set (navigation, text tools, network
//! flavor, portfolio pages and the backdoor easter egg), tab completion,
//! and a [`TerminalSession`] that ties them to history and a transcript.

mod commands;
pub mod completion;
mod fun_commands;
mod interpreter;
mod network_commands;
mod profile_commands;
mod security_commands;
mod session;
mod text_commands;

#[cfg(test)]
mod testutil;

pub use commands::register_builtins;
pub use completion::complete;
pub use fun_commands::register_fun_commands;
pub use interpreter::{
    Command, CommandOutput, CommandRegistry, CommandResult, Environment, Privilege,
};
pub use network_commands::register_network_commands;
pub use profile_commands::register_profile_commands;
pub use security_commands::register_security_commands;
pub use session::{Navigator, TerminalSession, TranscriptEntry};
pub use text_commands::register_text_commands;
