//! Tab completion: one best full-line suggestion, never a list.

use termfolio_vfs::path::file_name;
use termfolio_vfs::{FileSystem, normalize};

use crate::interpreter::CommandRegistry;

/// Suggest a completed input line for `input`, or `None` when nothing fits.
///
/// A lone word without a trailing space completes to the alphabetically
/// first command name it prefixes (hidden commands included). Otherwise the
/// last argument is treated as a path fragment: its directory part is
/// resolved against `cwd` and the alphabetically first child whose name
/// starts with the remainder replaces it. Directories gain a trailing `/`.
pub fn complete(
    input: &str,
    registry: &CommandRegistry,
    fs: &FileSystem,
    cwd: &str,
) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }
    let mut parts: Vec<String> = input.split_whitespace().map(str::to_string).collect();
    let trailing_space = input.ends_with(' ');

    if parts.len() == 1 && !trailing_space {
        return registry.completions(&parts[0]).into_iter().next();
    }

    let last_arg = if trailing_space {
        ""
    } else {
        parts.last().map(String::as_str).unwrap_or("")
    };
    let (dir_part, prefix) = match last_arg.rfind('/') {
        Some(idx) => (&last_arg[..=idx], &last_arg[idx + 1..]),
        None => ("", last_arg),
    };
    let parent = match dir_part {
        "" => cwd.to_string(),
        dir => normalize(dir, cwd),
    };
    if !fs.is_directory(&parent) {
        return None;
    }

    let mut candidates: Vec<String> = fs
        .list_children(&parent, true)
        .iter()
        .filter(|child| file_name(child).starts_with(prefix))
        .map(|child| {
            let name = file_name(child);
            if fs.is_directory(child) {
                format!("{name}/")
            } else {
                name.to_string()
            }
        })
        .collect();
    candidates.sort();
    let best = candidates.into_iter().next()?;

    let completed = format!("{dir_part}{best}");
    if trailing_space {
        parts.push(completed);
    } else if let Some(last) = parts.last_mut() {
        *last = completed;
    }
    Some(parts.join(" "))
}
