//! Per-visit terminal state.
//!
//! A [`TerminalSession`] owns everything that changes while a visitor types:
//! the current directory, the file system snapshot, the privilege level,
//! the recall history and the rendered transcript. Commands never touch
//! this state directly; they write into an [`Environment`] that the session
//! commits only when the command succeeds.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use termfolio_types::config::TerminalConfig;
use termfolio_types::error::Result;
use termfolio_types::input::{Key, KeyOutcome};
use termfolio_vfs::{FileSystem, initial_file_system, normalize};

use crate::commands::register_builtins;
use crate::completion;
use crate::interpreter::{
    Command, CommandOutput, CommandRegistry, CommandResult, Environment, Privilege,
};

const WELCOME_BANNER: &str = r"Debian GNU/Linux 12 (Bookworm)
tugdual-portfolio: SSH-2.0-OpenSSH_8.4p1 Debian-5+deb11u1

  ████████╗██╗   ██╗ ██████╗ ██████╗ ██╗   ██╗ █████╗ ██╗
  ╚══██╔══╝██║   ██║██╔════╝ ██╔══██╗██║   ██║██╔══██║██║
     ██║   ██║   ██║██║  ███╗██║  ██║██║   ██║███████║██║
     ██║   ╚██████╔╝╚██████╔╝██████╔╝╚██████╔╝██║  ██║███████╗
     ╚═╝    ╚═════╝  ╚═════╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚══════╝

System: Debian GNU/Linux 12 (Bookworm)
Kernel: Linux 5.10.0-20-amd64 x86_64

Welcome to my interactive portfolio terminal!
You have been granted limited visitor access.
To discover my skills and projects, you'll need to explore the system...

Explore this terminal with Linux commands
Find hidden secrets if you're curious
Or simply visit my classic website by typing 'exit'

Type 'help' to get the list of available commands.
Press Tab for autocompletion.";

/// Something that can take the visitor back to the main site.
pub trait Navigator {
    fn navigate_home(&mut self);
}

/// One rendered line pair in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// The submitted line; empty for the welcome banner.
    pub command: String,
    pub output: String,
    pub is_error: bool,
    /// Working directory at the time the command ran, for its prompt.
    pub path: String,
}

/// A single visitor's terminal.
pub struct TerminalSession {
    config: TerminalConfig,
    registry: CommandRegistry,
    fs: FileSystem,
    cwd: String,
    privilege: Privilege,
    /// Most recent first, bounded by `config.max_history`.
    history: VecDeque<String>,
    /// Recall cursor into `history`; `None` means editing a fresh line.
    history_index: Option<usize>,
    transcript: Vec<TranscriptEntry>,
    rng: StdRng,
    navigator: Option<Box<dyn Navigator>>,
}

impl TerminalSession {
    /// Start a session on the seed file system, in the configured home.
    pub fn new(mut config: TerminalConfig) -> Self {
        config.home = normalize(&config.home, "/");
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let fs = initial_file_system();
        let cwd = if fs.is_directory(&config.home) {
            config.home.clone()
        } else {
            log::warn!("home {} is not a directory, starting in /", config.home);
            "/".to_string()
        };
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            registry,
            fs,
            cwd,
            privilege: Privilege::Visitor,
            history: VecDeque::new(),
            history_index: None,
            transcript: Vec::new(),
            rng,
            navigator: None,
        }
    }

    /// Attach the collaborator invoked when a visitor exits.
    pub fn with_navigator(mut self, navigator: Box<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Add a command on top of the built-ins, replacing any of the same name.
    pub fn with_command(mut self, cmd: Box<dyn Command>) -> Self {
        self.registry.register(cmd);
        self
    }

    /// Append the welcome banner as a transcript entry with an empty command.
    pub fn welcome(&mut self) {
        self.transcript.push(TranscriptEntry {
            command: String::new(),
            output: WELCOME_BANNER.to_string(),
            is_error: false,
            path: self.cwd.clone(),
        });
    }

    /// Run one input line.
    ///
    /// Blank lines return `None` and leave history and transcript alone.
    /// State changes requested by the command are kept only on success.
    pub fn submit(&mut self, line: &str) -> Option<CommandResult> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        self.history.push_front(line.to_string());
        self.history.truncate(self.config.max_history);
        self.history_index = None;

        let path = self.cwd.clone();
        let mut env = Environment {
            cwd: self.cwd.clone(),
            fs: self.fs.clone(),
            privilege: self.privilege,
            config: &self.config,
            rng: &mut self.rng,
        };
        let result = self.registry.dispatch(line, &mut env);
        if !result.is_error {
            self.cwd = env.cwd;
            self.fs = env.fs;
            self.privilege = env.privilege;
        }

        match &result.output {
            CommandOutput::Clear => {
                self.transcript.clear();
                return Some(result);
            },
            CommandOutput::NavigateHome(_) => {
                log::info!("visitor left the terminal");
                if let Some(nav) = self.navigator.as_mut() {
                    nav.navigate_home();
                }
            },
            CommandOutput::Text(_) | CommandOutput::None => {},
        }
        self.transcript.push(TranscriptEntry {
            command: line.to_string(),
            output: result.text().to_string(),
            is_error: result.is_error,
            path,
        });
        Some(result)
    }

    /// Prompt for the current directory.
    pub fn prompt(&self) -> String {
        self.prompt_for(&self.cwd)
    }

    /// Prompt as it reads in `path`: `user@host:path$`.
    pub fn prompt_for(&self, path: &str) -> String {
        let user = match self.privilege {
            Privilege::Root => &self.config.root_user,
            Privilege::Visitor => &self.config.visitor_user,
        };
        format!("{user}@{}:{path}$", self.config.hostname)
    }

    /// Step back to an older history entry. Stops at the oldest one.
    pub fn recall_previous(&mut self) -> Option<String> {
        if self.history.is_empty() {
            return None;
        }
        let next = match self.history_index {
            None => 0,
            Some(i) => (i + 1).min(self.history.len() - 1),
        };
        self.history_index = Some(next);
        self.history.get(next).cloned()
    }

    /// Step towards newer entries. Past the newest the line is cleared;
    /// with no recall in progress nothing changes.
    pub fn recall_next(&mut self) -> Option<String> {
        match self.history_index? {
            0 => {
                self.history_index = None;
                Some(String::new())
            },
            i => {
                self.history_index = Some(i - 1);
                self.history.get(i - 1).cloned()
            },
        }
    }

    /// Best completion for a partially typed line.
    pub fn complete(&self, input: &str) -> Option<String> {
        completion::complete(input, &self.registry, &self.fs, &self.cwd)
    }

    /// Apply a special key to the front-end's current input line.
    pub fn handle_key(&mut self, key: Key, input: &str) -> KeyOutcome {
        let replacement = match key {
            Key::Enter => {
                self.submit(input);
                Some(String::new())
            },
            Key::Tab => self.complete(input),
            Key::Up => self.recall_previous(),
            Key::Down => self.recall_next(),
        };
        replacement.map_or(KeyOutcome::Keep, KeyOutcome::SetInput)
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    pub fn file_system(&self) -> &FileSystem {
        &self.fs
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// The transcript as pretty-printed JSON.
    pub fn transcript_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.transcript)?)
    }

    /// Submitted lines, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}
