//! Command trait, registry, and dispatch logic.
//!
//! Lines are split on whitespace only: there is no quoting, piping or
//! variable expansion. Commands that take free text (`hash`, `cowsay`,
//! `l33t`) rejoin their trailing arguments themselves.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::StdRng;
use serde::Serialize;
use termfolio_types::config::TerminalConfig;
use termfolio_types::error::{Result, TermfolioError};
use termfolio_vfs::FileSystem;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the session to wipe its transcript.
    Clear,
    /// Signal to the session to leave the terminal, with a farewell message.
    NavigateHome(String),
}

impl CommandOutput {
    /// The printable part of the output; empty for pure signals.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) | Self::NavigateHome(s) => s,
            Self::None | Self::Clear => "",
        }
    }
}

/// Result envelope handed back to the session for every submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub output: CommandOutput,
    pub is_error: bool,
}

impl CommandResult {
    fn ok(output: CommandOutput) -> Self {
        Self {
            output,
            is_error: false,
        }
    }

    fn error(message: String) -> Self {
        Self {
            output: CommandOutput::Text(message),
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        self.output.as_text()
    }
}

/// Who the session is currently acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Privilege {
    #[default]
    Visitor,
    Root,
}

/// Mutable context passed to every command.
///
/// Commands write their intent into `cwd`, `fs` and `privilege`; the
/// session copies those back only when the command succeeds.
pub struct Environment<'a> {
    /// Current working directory (canonical path).
    pub cwd: String,
    /// Snapshot of the file system. Replacing it never touches earlier snapshots.
    pub fs: FileSystem,
    pub privilege: Privilege,
    pub config: &'a TerminalConfig,
    /// Source for flavor randomness (latencies, port picks).
    pub rng: &'a mut StdRng,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[-a\] \[-l\] \[path\]").
    fn usage(&self) -> &str;

    /// Hidden commands are left out of `help` and refuse `help <name>`.
    fn hidden(&self) -> bool {
        false
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
///
/// Built once at startup and never mutated afterwards.
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Parse and execute a command line.
    ///
    /// The first token, lower-cased, names the command. Errors are returned
    /// as-is; see [`CommandRegistry::dispatch`] for the recovering variant.
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(CommandOutput::None);
        };
        let name = first.to_lowercase();
        let args: Vec<&str> = tokens.collect();
        log::debug!("dispatch {name} ({} args)", args.len());

        // help needs the registry itself.
        if name == "help" {
            return self.execute_help(&args);
        }

        match self.commands.get(name.as_str()) {
            Some(cmd) => cmd.execute(&args, env),
            None => Err(TermfolioError::UnknownCommand(name)),
        }
    }

    /// Execute a line and fold every failure into a [`CommandResult`].
    ///
    /// Handler errors become their display text. A panicking handler is
    /// reported as [`TermfolioError::HandlerFault`]; nothing unwinds past
    /// this call.
    pub fn dispatch(&self, line: &str, env: &mut Environment<'_>) -> CommandResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.execute(line, env))) {
            Ok(Ok(output)) => CommandResult::ok(output),
            Ok(Err(e)) => CommandResult::error(e.to_string()),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::warn!("command panicked: {line:?}: {message}");
                CommandResult::error(TermfolioError::HandlerFault(message).to_string())
            },
        }
    }

    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(arg) = args.first() {
            let name = arg.to_lowercase();
            return match self.commands.get(name.as_str()) {
                Some(cmd) if !cmd.hidden() => Ok(CommandOutput::Text(format!(
                    "{} - {}\nUsage: {}",
                    cmd.name(),
                    cmd.description(),
                    cmd.usage()
                ))),
                _ => Err(TermfolioError::InvalidArgument(format!(
                    "Command not found: {name}"
                ))),
            };
        }

        let mut out = String::from("Available commands:\n");
        for (name, desc) in self.list_commands(false) {
            out.push_str(&format!("  {name:<10} {desc}\n"));
        }
        out.push_str("\nType 'help [command]' to get more information on a specific command.");
        Ok(CommandOutput::Text(out))
    }

    /// Sorted `(name, description)` pairs, hidden commands only on request.
    pub fn list_commands(&self, include_hidden: bool) -> Vec<(&str, &str)> {
        self.commands
            .values()
            .filter(|c| include_hidden || !c.hidden())
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Every registered name starting with `partial`, hidden ones included,
    /// in alphabetical order.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let lower = partial.to_lowercase();
        self.commands
            .keys()
            .filter(|name| name.starts_with(&lower))
            .cloned()
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

/// Strip one pair of matching surrounding quotes.
///
/// The tokenizer keeps quotes verbatim, so `find / -name "*.txt"` would
/// otherwise look for names that start with `"`.
pub(crate) fn unquote(arg: &str) -> &str {
    for q in ['"', '\''] {
        if arg.len() >= 2 && arg.starts_with(q) && arg.ends_with(q) {
            return &arg[1..arg.len() - 1];
        }
    }
    arg
}
