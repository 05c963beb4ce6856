//! Path semantics: normalisation, parent and file name extraction.
//!
//! Canonical paths start with `/`, contain no empty, `.` or `..` segments,
//! and carry no trailing slash unless they are the root itself.

/// Resolve `path` against `cwd` and return its canonical absolute form.
///
/// Absolute inputs ignore `cwd`. `.` segments are dropped and `..` pops the
/// last resolved segment; popping past the root is a no-op.
pub fn normalize(path: &str, cwd: &str) -> String {
    let raw = if path.starts_with('/') {
        path.to_string()
    } else if cwd.ends_with('/') {
        format!("{cwd}{path}")
    } else {
        format!("{cwd}/{path}")
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }

    let resolved = if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    };
    log::trace!("normalize({path:?}, {cwd:?}) -> {resolved}");
    resolved
}

/// Return the parent of a canonical path. The root is its own parent.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

/// Return the final segment of a canonical path (empty for the root).
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Prefix every child of `dir` starts with: `/` for the root, `dir/` otherwise.
pub(crate) fn child_prefix(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    format!("{trimmed}/")
}
