//! Terminal configuration.
//!
//! Every field has a default matching the live portfolio, so an empty TOML
//! document (or no file at all) yields the stock terminal.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermfolioError};

/// Runtime configuration for a terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Host name shown in the prompt.
    pub hostname: String,
    /// Home directory: initial cwd and the target of `cd` / `cd ~`.
    pub home: String,
    /// User name shown while the session is unprivileged.
    pub visitor_user: String,
    /// User name shown in the prompt once the backdoor grants root.
    pub root_user: String,
    /// Password accepted by the `backdoor` command.
    pub backdoor_password: String,
    /// Maximum number of recall entries kept by a session.
    pub max_history: usize,
    /// Fixed seed for the flavor RNG (`None` seeds from entropy).
    pub rng_seed: Option<u64>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            hostname: "tugdual-server".to_string(),
            home: "/home/visitor".to_string(),
            visitor_user: "visitor".to_string(),
            root_user: "root".to_string(),
            backdoor_password: "h4ck3r".to_string(),
            max_history: 100,
            rng_seed: None,
        }
    }
}

impl TerminalConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.home = canonical_home(&config.home)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loading terminal config from {}", path.display());
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.backdoor_password.is_empty() {
            return Err(TermfolioError::Config(
                "backdoor_password must not be empty".to_string(),
            ));
        }
        if self.max_history == 0 {
            return Err(TermfolioError::Config(
                "max_history must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip empty segments from an absolute home path so it matches the
/// file system's canonical keys. `.` and `..` are rejected outright.
fn canonical_home(home: &str) -> Result<String> {
    if !home.starts_with('/') {
        return Err(TermfolioError::Config(format!(
            "home must be an absolute path, got '{home}'"
        )));
    }
    let segments: Vec<&str> = home.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(TermfolioError::Config(format!(
            "home must not contain '.' or '..', got '{home}'"
        )));
    }
    Ok(format!("/{}", segments.join("/")))
}
