//! Built-in commands for the termfolio terminal.

use regex::Regex;
use termfolio_types::error::{Result, TermfolioError, usage};
use termfolio_vfs::{FileNode, NodeKind, normalize, path::file_name};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Privilege, unquote};

/// Register every command the terminal ships with.
///
/// Covers the file system and session commands defined here plus the
/// text, network, profile, fun and security modules.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(WhoamiCmd));
    reg.register(Box::new(FindCmd));
    reg.register(Box::new(ExitCmd {
        name: "exit",
        hidden: false,
    }));
    reg.register(Box::new(ExitCmd {
        name: "quit",
        hidden: true,
    }));
    crate::register_text_commands(reg);
    crate::register_network_commands(reg);
    crate::register_profile_commands(reg);
    crate::register_fun_commands(reg);
    crate::register_security_commands(reg);
}

/// Resolve a user-supplied path, expanding a leading `~` to the home directory.
pub(crate) fn resolve(arg: &str, env: &Environment<'_>) -> String {
    match arg {
        "~" => env.config.home.clone(),
        _ => match arg.strip_prefix("~/") {
            Some(rest) => normalize(rest, &env.config.home),
            None => normalize(arg, &env.cwd),
        },
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Display help information"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        // The registry answers `help` itself; this entry only makes it listable.
        Ok(CommandOutput::Text(
            "Type 'help' to get the list of available commands.".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List the content of a directory"
    }
    fn usage(&self) -> &str {
        "ls [-a] [-l] [path]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut show_hidden = false;
        let mut long = false;
        let mut target = None;
        for arg in args {
            if let Some(flags) = arg.strip_prefix('-') {
                show_hidden |= flags.contains('a');
                long |= flags.contains('l');
            } else if target.is_none() {
                target = Some(*arg);
            }
        }

        let (label, path) = match target {
            Some(arg) => (arg.to_string(), resolve(arg, env)),
            None => (env.cwd.clone(), env.cwd.clone()),
        };
        if !env.fs.exists(&path) {
            return Err(TermfolioError::NotFound(format!("ls: {label}")));
        }
        if !env.fs.is_directory(&path) {
            return Err(TermfolioError::NotADirectory(format!("ls: {label}")));
        }

        let children = env.fs.list_children(&path, show_hidden);
        let entries: Vec<(&str, &FileNode)> = children
            .iter()
            .filter_map(|p| env.fs.get_node(p).map(|n| (file_name(p), n)))
            .collect();

        if long {
            let mut lines = vec![format!("total {}", entries.len())];
            lines.extend(entries.iter().map(|(name, node)| long_line(name, node)));
            return Ok(CommandOutput::Text(lines.join("\n")));
        }
        if entries.is_empty() {
            return Ok(CommandOutput::None);
        }
        let names: Vec<String> = entries
            .iter()
            .map(|(name, node)| {
                let suffix = match node.kind {
                    NodeKind::Directory => "/",
                    NodeKind::File if node.executable => "*",
                    _ => "",
                };
                format!("{name}{suffix}")
            })
            .collect();
        Ok(CommandOutput::Text(names.join("  ")))
    }
}

fn long_line(name: &str, node: &FileNode) -> String {
    let size = match node.size {
        Some(n) if n > 0 => n.to_string(),
        _ => "-".to_string(),
    };
    let suffix = match (node.kind, node.link_target.as_deref()) {
        (NodeKind::Directory, _) => "/".to_string(),
        (NodeKind::Symlink, Some(target)) => format!(" -> {target}"),
        _ => String::new(),
    };
    format!(
        "{} {:<8} {:<8} {:>5} {:<11} {name}{suffix}",
        node.permissions, node.owner, node.group, size, node.last_modified
    )
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change directory"
    }
    fn usage(&self) -> &str {
        "cd [directory]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = match args.first() {
            None => env.config.home.clone(),
            Some(arg) => resolve(arg, env),
        };
        if !env.fs.exists(&target) {
            return Err(TermfolioError::NotFound(format!("cd: {target}")));
        }
        if !env.fs.is_directory(&target) {
            return Err(TermfolioError::NotADirectory(format!("cd: {target}")));
        }
        log::info!("cwd {} -> {target}", env.cwd);
        env.cwd = target;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print the current working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(env.cwd.clone()))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Print the content of a file"
    }
    fn usage(&self) -> &str {
        "cat [file]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(arg) = args.first() else {
            return Err(usage(self.usage()));
        };
        let path = resolve(arg, env);
        if env.fs.is_directory(&path) {
            return Err(TermfolioError::IsADirectory(format!("cat: {arg}")));
        }
        match env.fs.get_node(&path) {
            Some(node) => Ok(CommandOutput::Text(node.text().to_string())),
            None => Err(TermfolioError::NotFound(format!("cat: {arg}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the terminal"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Print the current user"
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        // Stays on the visitor name even as root; only the prompt changes.
        Ok(CommandOutput::Text(env.config.visitor_user.clone()))
    }
}

// ---------------------------------------------------------------------------
// exit / quit
// ---------------------------------------------------------------------------

struct ExitCmd {
    name: &'static str,
    hidden: bool,
}
impl Command for ExitCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Exit the session"
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn hidden(&self) -> bool {
        self.hidden
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        match env.privilege {
            Privilege::Root => {
                log::info!("privilege root -> visitor");
                env.privilege = Privilege::Visitor;
                Ok(CommandOutput::Text(format!(
                    "logout\nRoot session closed. You are back to {} access.",
                    env.config.visitor_user
                )))
            },
            Privilege::Visitor => {
                log::info!("leaving terminal");
                Ok(CommandOutput::NavigateHome(
                    "You are leaving the terminal. Goodbye!".to_string(),
                ))
            },
        }
    }
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FindFilter {
    name: Option<Regex>,
    kind: Option<NodeKind>,
    size: Option<SizeTest>,
    max_depth: Option<usize>,
}

enum SizeTest {
    Above(u64),
    Below(u64),
    Exactly(u64),
}

impl SizeTest {
    fn parse(raw: &str) -> Result<Self> {
        let bad = || TermfolioError::InvalidArgument(format!("find: invalid argument `{raw}' to `-size'"));
        let (ctor, digits): (fn(u64) -> Self, &str) = match raw.as_bytes().first() {
            Some(b'+') => (Self::Above, &raw[1..]),
            Some(b'-') => (Self::Below, &raw[1..]),
            _ => (Self::Exactly, raw),
        };
        digits.parse().map(ctor).map_err(|_| bad())
    }

    fn matches(&self, size: u64) -> bool {
        match *self {
            Self::Above(n) => size > n,
            Self::Below(n) => size < n,
            Self::Exactly(n) => size == n,
        }
    }
}

/// Translate a `-name` glob into an anchored regex. Only `*` and `?` are special.
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut pattern = String::from("^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
        .map_err(|e| TermfolioError::InvalidArgument(format!("find: invalid pattern `{glob}': {e}")))
}

impl FindFilter {
    fn parse(options: &[&str]) -> Result<Self> {
        let mut filter = Self::default();
        let mut iter = options.iter();
        while let Some(opt) = iter.next() {
            let value = |v| option_value(opt, v);
            match *opt {
                "-name" => filter.name = Some(glob_to_regex(value(iter.next())?)?),
                "-type" => {
                    filter.kind = Some(match value(iter.next())? {
                        "f" => NodeKind::File,
                        "d" => NodeKind::Directory,
                        "l" => NodeKind::Symlink,
                        other => {
                            return Err(TermfolioError::InvalidArgument(format!(
                                "find: Unknown argument to -type: {other}"
                            )));
                        },
                    });
                },
                "-size" => filter.size = Some(SizeTest::parse(value(iter.next())?)?),
                "-maxdepth" => {
                    let raw = value(iter.next())?;
                    filter.max_depth = Some(raw.parse().map_err(|_| {
                        TermfolioError::InvalidArgument(format!(
                            "find: invalid argument `{raw}' to `-maxdepth'"
                        ))
                    })?);
                },
                other => {
                    return Err(TermfolioError::InvalidArgument(format!(
                        "find: unknown predicate `{other}'"
                    )));
                },
            }
        }
        Ok(filter)
    }

    fn matches(&self, path: &str, node: &FileNode, depth: usize) -> bool {
        if self.max_depth.is_some_and(|max| depth > max) {
            return false;
        }
        if self.kind.is_some_and(|k| k != node.kind) {
            return false;
        }
        if self.name.as_ref().is_some_and(|re| !re.is_match(file_name(path))) {
            return false;
        }
        self.size.as_ref().is_none_or(|test| test.matches(node.size.unwrap_or(0)))
    }
}

fn option_value<'a>(opt: &str, value: Option<&&'a str>) -> Result<&'a str> {
    value
        .map(|v| unquote(v))
        .ok_or_else(|| TermfolioError::InvalidArgument(format!("find: missing argument to `{opt}'")))
}

struct FindCmd;
impl Command for FindCmd {
    fn name(&self) -> &str {
        "find"
    }
    fn description(&self) -> &str {
        "Search for files in a directory hierarchy"
    }
    fn usage(&self) -> &str {
        "find [path] [-name pattern] [-type f|d] [-size [+|-]N] [-maxdepth N]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (start, options) = match args.split_first() {
            Some((first, rest)) if !first.starts_with('-') => (resolve(first, env), rest),
            _ => (env.cwd.clone(), args),
        };
        let filter = FindFilter::parse(options)?;

        let Some(start_node) = env.fs.get_node(&start) else {
            return Err(TermfolioError::NotFound(format!("find: '{start}'")));
        };
        if !start_node.is_dir() {
            return Err(TermfolioError::NotADirectory(format!("find: '{start}'")));
        }

        let base_depth = depth_of(&start);
        let mut found = Vec::new();
        if filter.matches(&start, start_node, 0) {
            found.push(start.clone());
        }
        for (path, node) in env.fs.descendants(&start) {
            if filter.matches(path, node, depth_of(path) - base_depth) {
                found.push(path.to_string());
            }
        }

        if found.is_empty() {
            return Ok(CommandOutput::Text("No results found.".to_string()));
        }
        Ok(CommandOutput::Text(found.join("\n")))
    }
}

fn depth_of(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}
