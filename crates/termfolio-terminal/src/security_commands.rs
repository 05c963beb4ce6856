//! The backdoor easter egg.
//!
//! `backdoor <password> [subcommand]` is the only way into root. The
//! password lives base64-encoded in a hidden file of the seed tree; hints
//! point visitors from `.secret_note.txt` and `/tmp/.backdoor` towards it.

use termfolio_types::error::{Result, TermfolioError, usage};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Privilege};
use crate::profile_commands::{EXPERIENCE, PROJECTS};

/// Register the backdoor command.
pub fn register_security_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(BackdoorCmd));
}

const SUBCOMMANDS: [(&str, &str); 5] = [
    ("root", "Elevate the session to root"),
    ("reveal", "List every hidden node on the system"),
    ("secret", "Read the owner's private note"),
    ("projects", "Show the confidential project files"),
    ("experience", "Show the full career timeline"),
];

const SECRET: &str = "You made it. Curiosity is the one skill no CV can list.\n\
If you enjoyed digging through this system, let's talk: type 'contact'.";

struct BackdoorCmd;

impl BackdoorCmd {
    fn menu() -> String {
        let mut out = String::from("Access granted. Available subcommands:");
        for (name, desc) in SUBCOMMANDS {
            out.push_str(&format!("\n  {name:<11} {desc}"));
        }
        out
    }

    fn reveal(env: &Environment<'_>) -> String {
        let hidden = env.fs.hidden_paths();
        let mut out = format!("{} hidden entries:", hidden.len());
        for path in hidden {
            out.push('\n');
            out.push_str(path);
        }
        out
    }

    fn projects() -> String {
        let mut out = String::from("Confidential project files:");
        for p in PROJECTS {
            out.push_str(&format!("\n\n{} ({})\n  {}", p.title, p.date, p.summary));
            out.push_str(&format!("\n  Stack: {}", p.technologies.join(", ")));
            if let Some(url) = p.github {
                out.push_str(&format!("\n  Source: {url}"));
            }
        }
        out
    }

    fn experience() -> String {
        let mut out = String::from("Career timeline:");
        for (date, title) in EXPERIENCE {
            out.push_str(&format!("\n  {date:<27} {title}"));
        }
        out
    }
}

impl Command for BackdoorCmd {
    fn name(&self) -> &str {
        "backdoor"
    }
    fn description(&self) -> &str {
        "???"
    }
    fn usage(&self) -> &str {
        "backdoor <password> [root|reveal|secret|projects|experience]"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some((password, rest)) = args.split_first() else {
            return Err(usage(self.usage()));
        };
        if *password != env.config.backdoor_password {
            log::warn!("backdoor: rejected password");
            return Err(TermfolioError::Unauthorized(
                "backdoor: access denied".to_string(),
            ));
        }

        let text = match rest.first().map(|s| s.to_lowercase()).as_deref() {
            None => Self::menu(),
            Some("root") => {
                if env.privilege != Privilege::Root {
                    log::info!("privilege visitor -> root");
                }
                env.privilege = Privilege::Root;
                format!(
                    "Privilege escalation successful. You are now {}.\n\
                     Type 'exit' to drop back to {} access.",
                    env.config.root_user, env.config.visitor_user
                )
            },
            Some("reveal") => Self::reveal(env),
            Some("secret") => SECRET.to_string(),
            Some("projects") => Self::projects(),
            Some("experience") => Self::experience(),
            Some(other) => {
                return Err(TermfolioError::InvalidArgument(format!(
                    "backdoor: unknown subcommand '{other}'"
                )));
            },
        };
        Ok(CommandOutput::Text(text))
    }
}
