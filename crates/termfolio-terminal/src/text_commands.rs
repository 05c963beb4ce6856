//! Text processing commands: grep, hash, base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::{Regex, RegexBuilder};
use termfolio_types::error::{Result, TermfolioError, usage};
use termfolio_vfs::NodeKind;

use crate::commands::resolve;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, unquote};

/// Register text processing commands.
pub fn register_text_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(GrepCmd));
    reg.register(Box::new(HashCmd));
    reg.register(Box::new(Base64Cmd));
}

// ---------------------------------------------------------------------------
// grep
// ---------------------------------------------------------------------------

#[derive(Default)]
struct GrepOptions {
    ignore_case: bool,
    line_numbers: bool,
    invert: bool,
    recursive: bool,
}

/// Append every selected line of `text`, prefixed with `name` when given.
fn grep_text(
    re: &Regex,
    opts: &GrepOptions,
    name: Option<&str>,
    text: &str,
    out: &mut Vec<String>,
) {
    for (idx, line) in text.lines().enumerate() {
        if re.is_match(line) == opts.invert {
            continue;
        }
        let mut entry = String::new();
        if let Some(name) = name {
            entry.push_str(name);
            entry.push(':');
        }
        if opts.line_numbers {
            entry.push_str(&format!("{}:", idx + 1));
        }
        entry.push_str(line);
        out.push(entry);
    }
}

struct GrepCmd;
impl Command for GrepCmd {
    fn name(&self) -> &str {
        "grep"
    }
    fn description(&self) -> &str {
        "Search for patterns in files"
    }
    fn usage(&self) -> &str {
        "grep [-i] [-n] [-r|-R] [-v] pattern [file...]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = GrepOptions::default();
        let mut rest = args;
        while let Some((first, tail)) = rest.split_first() {
            let Some(flags) = first.strip_prefix('-') else {
                break;
            };
            opts.ignore_case |= flags.contains('i');
            opts.line_numbers |= flags.contains('n');
            opts.invert |= flags.contains('v');
            opts.recursive |= flags.contains('r') || flags.contains('R');
            rest = tail;
        }
        let Some((pattern, files)) = rest.split_first() else {
            return Err(usage(self.usage()));
        };
        let pattern = unquote(pattern);

        let cwd = env.cwd.clone();
        let targets: Vec<&str> = if !files.is_empty() {
            files.to_vec()
        } else if opts.recursive {
            vec![cwd.as_str()]
        } else {
            return Err(TermfolioError::InvalidArgument(
                "grep: no file specified".to_string(),
            ));
        };

        let re = RegexBuilder::new(pattern)
            .case_insensitive(opts.ignore_case)
            .build()
            .map_err(|_| {
                TermfolioError::InvalidArgument(format!(
                    "grep: invalid regular expression: {pattern}"
                ))
            })?;

        let show_names = targets.len() > 1 || opts.recursive;
        let mut out = Vec::new();
        for target in &targets {
            let path = resolve(target, env);
            let Some(node) = env.fs.get_node(&path) else {
                out.push(format!("grep: {target}: No such file or directory"));
                continue;
            };
            match node.kind {
                NodeKind::Directory if opts.recursive => {
                    let base = if path == "/" { 1 } else { path.len() + 1 };
                    for (child, node) in env.fs.descendants(&path) {
                        if node.is_file() {
                            grep_text(&re, &opts, Some(&child[base..]), node.text(), &mut out);
                        }
                    }
                },
                NodeKind::Directory => {
                    out.push(format!(
                        "grep: {target}: Is a directory (use -r for recursive search)"
                    ));
                },
                _ => {
                    let name = show_names.then_some(*target);
                    grep_text(&re, &opts, name, node.text(), &mut out);
                },
            }
        }

        if out.is_empty() {
            return Ok(CommandOutput::None);
        }
        Ok(CommandOutput::Text(out.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// hash
// ---------------------------------------------------------------------------

const HASH_ALGORITHMS: [(&str, usize); 4] =
    [("md5", 32), ("sha1", 40), ("sha256", 64), ("sha512", 128)];

/// 32-bit `h * 31 + c` over UTF-16 code units, wrapping on overflow.
fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |h, c| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(c))
    })
}

/// Stretch a rolling hash to `len` hex digits.
///
/// Not a cryptographic digest: the output only has to be stable for the
/// same algorithm and text.
fn simulated_digest(algorithm: &str, text: &str, len: usize) -> String {
    let h = rolling_hash(&format!("{algorithm}{text}"));
    let filler = format!("{:x}", i64::from(h ^ (h >> 16)).abs());
    let mut hex = format!("{:x}", i64::from(h).abs());
    while hex.len() < len {
        hex.insert(0, '0');
        if hex.len() < len {
            hex.push_str(&filler);
        }
    }
    hex.truncate(len);
    hex
}

struct HashCmd;
impl Command for HashCmd {
    fn name(&self) -> &str {
        "hash"
    }
    fn description(&self) -> &str {
        "Generate hash of a text"
    }
    fn usage(&self) -> &str {
        "hash <md5|sha1|sha256|sha512> <text>"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.len() < 2 {
            return Err(usage(self.usage()));
        }
        let algorithm = args[0].to_lowercase();
        let text = args[1..].join(" ");
        let Some(&(_, len)) = HASH_ALGORITHMS.iter().find(|(name, _)| *name == algorithm) else {
            return Err(TermfolioError::InvalidArgument(format!(
                "hash: unsupported algorithm: {algorithm}"
            )));
        };
        let digest = simulated_digest(&algorithm, &text, len);
        Ok(CommandOutput::Text(format!(
            "Text: {text}\nAlgorithm: {algorithm}\nHash: {digest}"
        )))
    }
}

// ---------------------------------------------------------------------------
// base64
// ---------------------------------------------------------------------------

struct Base64Cmd;
impl Command for Base64Cmd {
    fn name(&self) -> &str {
        "base64"
    }
    fn description(&self) -> &str {
        "Encode or decode base64 text"
    }
    fn usage(&self) -> &str {
        "base64 [-d] <text>"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (decode, words) = match args.split_first() {
            Some((&"-d", rest)) | Some((&"--decode", rest)) => (true, rest),
            _ => (false, args),
        };
        if words.is_empty() {
            return Err(usage(self.usage()));
        }
        let text = words.join(" ");
        if !decode {
            return Ok(CommandOutput::Text(STANDARD.encode(text.as_bytes())));
        }
        let invalid = || TermfolioError::InvalidArgument("base64: invalid input".to_string());
        let bytes = STANDARD.decode(text.trim()).map_err(|_| invalid())?;
        let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;
        Ok(CommandOutput::Text(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Harness;

    #[test]
    fn rolling_hash_matches_reference() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn hash_reference_vectors() {
        assert_eq!(
            simulated_digest("md5", "Hello World", 32),
            "0004504c5ba450480bd450480bd45048"
        );
        assert_eq!(
            simulated_digest("sha1", "Hello World", 40),
            "00003b18a3a13b1898b83b1898b83b1898b83b18"
        );
        assert_eq!(
            simulated_digest("sha256", "Hello World", 64),
            "000000029caaa0329ca83c829ca83c829ca83c829ca83c829ca83c829ca83c82"
        );
    }

    #[test]
    fn hash_lengths_per_algorithm() {
        let mut h = Harness::new();
        for (algo, len) in HASH_ALGORITHMS {
            let out = h.ok(&format!("hash {algo} some text"));
            let digest = out.lines().last().unwrap().strip_prefix("Hash: ").unwrap();
            assert_eq!(digest.len(), len, "{algo}");
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let mut h = Harness::new();
        let first = h.ok("hash md5 \"Hello World\"");
        let second = h.ok("hash md5 \"Hello World\"");
        assert_eq!(first, second);
        assert_eq!(
            first,
            "Text: \"Hello World\"\nAlgorithm: md5\nHash: 0005b5f4a825b5f11dd5b5f11dd5b5f1"
        );
    }

    #[test]
    fn hash_algorithm_is_case_insensitive() {
        let mut h = Harness::new();
        assert_eq!(h.ok("hash MD5 Hello World"), h.ok("hash md5 Hello World"));
    }

    #[test]
    fn hash_errors() {
        let mut h = Harness::new();
        assert!(h.err("hash md5").starts_with("Usage: hash"));
        assert_eq!(h.err("hash crc32 text"), "hash: unsupported algorithm: crc32");
    }

    #[test]
    fn grep_single_file_no_prefix() {
        let mut h = Harness::new();
        assert_eq!(
            h.ok("grep tugdual /etc/passwd"),
            "tugdual:x:1000:1000:Tugdual,,,:/home/tugdual:/bin/bash"
        );
    }

    #[test]
    fn grep_invert_excludes_matches() {
        let mut h = Harness::new();
        let out = h.ok("grep -v root /etc/passwd");
        assert_eq!(out.lines().count(), 10);
        assert!(out.lines().all(|l| !l.contains("root")));
    }

    #[test]
    fn grep_ignore_case_and_line_numbers() {
        let mut h = Harness::new();
        assert_eq!(h.ok("grep -in ACCEPTED /var/log/auth.log").split(':').next(), Some("3"));
        assert_eq!(h.ok("grep -i -n ACCEPTED /var/log/auth.log"), h.ok("grep -in ACCEPTED /var/log/auth.log"));
    }

    #[test]
    fn grep_multiple_files_prefix_names() {
        let mut h = Harness::new();
        let out = h.ok("grep visitor /etc/passwd README.txt");
        assert!(out.lines().any(|l| l.starts_with("/etc/passwd:visitor:x:1001")));
    }

    #[test]
    fn grep_recursive_uses_relative_paths() {
        let mut h = Harness::new();
        let out = h.ok("grep -r password /home/tugdual");
        assert!(out.lines().any(|l| l.starts_with(".secret_note.txt:")));
        let out = h.ok("grep -rn Admin /var");
        assert_eq!(out, "www/html/index.html:10:  <!-- Admin password: c3VwZXJwYXNzd29yZA== -->");
    }

    #[test]
    fn grep_recursive_defaults_to_cwd() {
        let mut h = Harness::new();
        h.ok("cd /etc");
        assert_eq!(h.ok("grep -r Bienvenue"), "motd:Bienvenue sur mon portfolio interactif!");
    }

    #[test]
    fn grep_inline_file_problems() {
        let mut h = Harness::new();
        let out = h.ok("grep x missing.txt /etc");
        assert_eq!(
            out,
            "grep: missing.txt: No such file or directory\n\
             grep: /etc: Is a directory (use -r for recursive search)"
        );
    }

    #[test]
    fn grep_no_match_is_empty_success() {
        let mut h = Harness::new();
        let r = h.run("grep zzzz /etc/passwd");
        assert!(!r.is_error);
        assert_eq!(r.output, CommandOutput::None);
    }

    #[test]
    fn grep_errors() {
        let mut h = Harness::new();
        assert!(h.err("grep").starts_with("Usage: grep"));
        assert_eq!(h.err("grep root"), "grep: no file specified");
        assert_eq!(h.err("grep ( /etc/passwd"), "grep: invalid regular expression: (");
    }

    #[test]
    fn base64_round_trip_of_vault() {
        let mut h = Harness::new();
        let encoded = h.ok("cat /.hidden-vault/password.b64");
        assert_eq!(h.ok(&format!("base64 -d {encoded}")), "h4ck3r");
        assert_eq!(h.ok("base64 h4ck3r"), encoded);
    }

    #[test]
    fn base64_errors() {
        let mut h = Harness::new();
        assert!(h.err("base64").starts_with("Usage:"));
        assert_eq!(h.err("base64 -d !!!"), "base64: invalid input");
    }
}
