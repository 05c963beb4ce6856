//! Shared fixture for handler unit tests.

use rand::SeedableRng;
use rand::rngs::StdRng;
use termfolio_types::config::TerminalConfig;
use termfolio_vfs::{FileSystem, initial_file_system};

use crate::commands::register_builtins;
use crate::interpreter::{CommandRegistry, CommandResult, Environment, Privilege};

/// A registry with every built-in, the seed tree, and a fixed RNG seed.
/// Mirrors the session's commit-on-success rule without the history layer.
pub(crate) struct Harness {
    pub config: TerminalConfig,
    pub registry: CommandRegistry,
    pub fs: FileSystem,
    pub cwd: String,
    pub privilege: Privilege,
    rng: StdRng,
}

impl Harness {
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let config = TerminalConfig::default();
        Self {
            cwd: config.home.clone(),
            config,
            registry,
            fs: initial_file_system(),
            privilege: Privilege::Visitor,
            rng: StdRng::seed_from_u64(42),
        }
    }

    pub fn run(&mut self, line: &str) -> CommandResult {
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
        result
    }

    /// Run a line that must succeed and return its text.
    pub fn ok(&mut self, line: &str) -> String {
        let r = self.run(line);
        assert!(!r.is_error, "{line:?} failed: {}", r.text());
        r.text().to_string()
    }

    /// Run a line that must fail and return its message.
    pub fn err(&mut self, line: &str) -> String {
        let r = self.run(line);
        assert!(r.is_error, "{line:?} unexpectedly succeeded: {}", r.text());
        r.text().to_string()
    }
}
