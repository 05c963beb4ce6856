//! Hidden novelty commands: cowsay, l33t.

use termfolio_types::error::{Result, usage};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register the hidden fun commands.
pub fn register_fun_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(CowsayCmd));
    reg.register(Box::new(LeetCmd));
}

// ---------------------------------------------------------------------------
// cowsay
// ---------------------------------------------------------------------------

const BUBBLE_WIDTH: usize = 40;

const COW: &str = r"        \   ^__^
         \  (oo)\_______
            (__)\       )\/\
                ||----w |
                ||     ||";

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let piece: String = piece.iter().collect();
            let len = current.chars().count();
            if len == 0 {
                current = piece;
            } else if len + 1 + piece.chars().count() <= width {
                current.push(' ');
                current.push_str(&piece);
            } else {
                lines.push(std::mem::replace(&mut current, piece));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn bubble(lines: &[String]) -> String {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut out = vec![format!(" {}", "_".repeat(width + 2))];
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let (open, close) = match i {
            _ if lines.len() == 1 => ('<', '>'),
            0 => ('/', '\\'),
            _ if i == last => ('\\', '/'),
            _ => ('|', '|'),
        };
        out.push(format!("{open} {line:<width$} {close}"));
    }
    out.push(format!(" {}", "-".repeat(width + 2)));
    out.join("\n")
}

struct CowsayCmd;
impl Command for CowsayCmd {
    fn name(&self) -> &str {
        "cowsay"
    }
    fn description(&self) -> &str {
        "Make a cow say something"
    }
    fn usage(&self) -> &str {
        "cowsay <text>"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(usage(self.usage()));
        }
        let lines = wrap(&args.join(" "), BUBBLE_WIDTH);
        Ok(CommandOutput::Text(format!("{}\n{COW}", bubble(&lines))))
    }
}

// ---------------------------------------------------------------------------
// l33t
// ---------------------------------------------------------------------------

fn leet_char(c: char) -> char {
    match c.to_ascii_lowercase() {
        'a' => '4',
        'e' => '3',
        'i' | 'l' => '1',
        'o' => '0',
        's' => '5',
        't' => '7',
        'z' => '2',
        _ => c,
    }
}

struct LeetCmd;
impl Command for LeetCmd {
    fn name(&self) -> &str {
        "l33t"
    }
    fn description(&self) -> &str {
        "Translate text to l33t speak"
    }
    fn usage(&self) -> &str {
        "l33t <text>"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(usage(self.usage()));
        }
        let text = args.join(" ");
        let leet: String = text.chars().map(leet_char).collect();
        Ok(CommandOutput::Text(format!("Original: {text}\nL33t: {leet}")))
    }
}
