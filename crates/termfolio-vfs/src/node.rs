//! File system node metadata.

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
}

/// A single entry in the virtual file system.
///
/// Everything except `kind`, `content` and `hidden` is display-only: the
/// terminal never enforces permissions or ownership, and `size` is the
/// authored value rather than the content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub kind: NodeKind,
    /// Raw text payload (files only).
    pub content: Option<String>,
    /// `ls -l` style mode string, e.g. `-rw-r--r--`.
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub size: Option<u64>,
    /// Timestamp label, e.g. `Feb 26 2023`.
    pub last_modified: String,
    /// Authoritative hidden flag, independent of the node's name.
    pub hidden: bool,
    pub executable: bool,
    /// Target path (symlinks only).
    pub link_target: Option<String>,
}

impl FileNode {
    /// A directory node.
    pub fn directory(permissions: &str, owner: &str, group: &str, last_modified: &str) -> Self {
        Self {
            kind: NodeKind::Directory,
            content: None,
            permissions: permissions.to_string(),
            owner: owner.to_string(),
            group: group.to_string(),
            size: None,
            last_modified: last_modified.to_string(),
            hidden: false,
            executable: false,
            link_target: None,
        }
    }

    /// A regular file holding `content`.
    pub fn file(
        content: &str,
        permissions: &str,
        owner: &str,
        group: &str,
        last_modified: &str,
    ) -> Self {
        Self {
            kind: NodeKind::File,
            content: Some(content.to_string()),
            ..Self::directory(permissions, owner, group, last_modified)
        }
    }

    /// A symbolic link pointing at `target`.
    pub fn symlink(
        target: &str,
        permissions: &str,
        owner: &str,
        group: &str,
        last_modified: &str,
    ) -> Self {
        Self {
            kind: NodeKind::Symlink,
            link_target: Some(target.to_string()),
            ..Self::directory(permissions, owner, group, last_modified)
        }
    }

    /// Set the authored size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Mark the node hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the node executable.
    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// File content, or the empty string when none was set.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
