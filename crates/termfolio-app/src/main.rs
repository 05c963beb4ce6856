//! termfolio entry point.
//!
//! Runs a terminal session over stdin/stdout, or replays a script file.
//! Pass `--config <file>` (or set TERMFOLIO_CONFIG) to load a TOML config,
//! `--script <file>` to read commands from a file, and `--json` to dump the
//! final transcript as JSON instead of printing as it goes.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::panic::{self, PanicHookInfo};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use termfolio_terminal::{CommandOutput, Navigator, TerminalSession};
use termfolio_types::config::TerminalConfig;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                opts.config = Some(PathBuf::from(path));
            },
            "--script" => {
                let path = args.next().context("--script needs a path")?;
                opts.script = Some(PathBuf::from(path));
            },
            "--json" => opts.json = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(opts)
}

/// One-line description of a panic for the log.
fn panic_report(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    match info.location() {
        Some(loc) => format!("panic at {}:{}: {message}", loc.file(), loc.line()),
        None => format!("panic: {message}"),
    }
}

/// Send panic reports to the log instead of stderr. Handler panics are
/// already shown to the visitor as `Error during execution: ...`.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| log::debug!("{}", panic_report(info))));
}

/// Flags the loop to stop once the visitor leaves.
struct LeaveFlag(Rc<Cell<bool>>);

impl Navigator for LeaveFlag {
    fn navigate_home(&mut self) {
        self.0.set(true);
    }
}

/// Feed `input` line by line into `session` until EOF or the visitor exits.
///
/// With `echo` set each prompt is followed by the line itself, which keeps
/// scripted runs readable. With `quiet` set nothing is printed.
fn drive(
    session: &mut TerminalSession,
    left: &Cell<bool>,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
    echo: bool,
    quiet: bool,
) -> Result<()> {
    let mut lines = input.lines();
    while !left.get() {
        if !quiet {
            write!(out, "{} ", session.prompt())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if echo && !quiet {
            writeln!(out, "{line}")?;
        }
        let Some(result) = session.submit(&line) else {
            continue;
        };
        if quiet {
            continue;
        }
        match &result.output {
            CommandOutput::Clear => write!(out, "{CLEAR_SCREEN}")?,
            CommandOutput::None => {},
            _ if result.is_error => writeln!(err, "{}", result.text())?,
            _ => writeln!(out, "{}", result.text())?,
        }
    }
    if !quiet && !left.get() {
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    install_panic_hook();

    let opts = parse_args(std::env::args().skip(1))?;
    let config_path = opts
        .config
        .clone()
        .or_else(|| std::env::var_os("TERMFOLIO_CONFIG").map(PathBuf::from));
    let config = match &config_path {
        Some(path) => TerminalConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TerminalConfig::default(),
    };
    log::info!("Starting termfolio on {}", config.hostname);

    let left = Rc::new(Cell::new(false));
    let mut session =
        TerminalSession::new(config).with_navigator(Box::new(LeaveFlag(Rc::clone(&left))));
    session.welcome();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut err = io::stderr();
    if !opts.json {
        if let Some(banner) = session.transcript().first() {
            writeln!(out, "{}\n", banner.output)?;
        }
    }

    match &opts.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            drive(&mut session, &left, BufReader::new(file), &mut out, &mut err, true, opts.json)?;
        },
        None => {
            let stdin = io::stdin();
            drive(&mut session, &left, stdin.lock(), &mut out, &mut err, false, opts.json)?;
        },
    }

    if opts.json {
        writeln!(out, "{}", session.transcript_json()?)?;
    }
    log::info!("session ended after {} commands", session.history().count());
    Ok(())
}
