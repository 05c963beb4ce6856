//! Copy-on-write path map.
//!
//! Keys are canonical absolute paths kept in a `BTreeMap`, so every child
//! of a directory sits in one contiguous key range starting at `dir/`.
//! The map lives behind an `Arc`; `create` and `remove` clone it only when
//! another snapshot still shares it.

use std::collections::BTreeMap;
use std::sync::Arc;

use termfolio_types::error::{Result, TermfolioError};

use crate::node::{FileNode, NodeKind};
use crate::path::{child_prefix, file_name, parent};

/// An immutable snapshot of the virtual file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    nodes: Arc<BTreeMap<String, FileNode>>,
}

impl FileSystem {
    /// A file system holding only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "/".to_string(),
            FileNode::directory("drwxr-xr-x", "root", "root", "Jan 1 2023"),
        );
        Self {
            nodes: Arc::new(nodes),
        }
    }

    /// Build a file system from `(path, node)` pairs, skipping the parent
    /// checks `create` performs. Used for fixed snapshots.
    pub fn from_nodes<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, FileNode)>,
    {
        let mut fs = Self::new();
        let nodes = Arc::make_mut(&mut fs.nodes);
        nodes.extend(entries);
        fs
    }

    /// Whether `path` exists. The root always exists.
    pub fn exists(&self, path: &str) -> bool {
        path == "/" || self.nodes.contains_key(path)
    }

    /// Whether `path` exists and is a directory.
    pub fn is_directory(&self, path: &str) -> bool {
        if path == "/" {
            return true;
        }
        self.nodes.get(path).is_some_and(FileNode::is_dir)
    }

    pub fn get_node(&self, path: &str) -> Option<&FileNode> {
        self.nodes.get(path)
    }

    /// Number of stored nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every `(path, node)` pair in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Absolute paths of the direct children of `dir`, in path order.
    ///
    /// Unless `include_hidden` is set, children whose name starts with `.`
    /// are skipped. This filter looks at the name only; the node's `hidden`
    /// flag is not consulted. Returns nothing when `dir` is not a directory.
    pub fn list_children(&self, dir: &str, include_hidden: bool) -> Vec<String> {
        if !self.is_directory(dir) {
            return Vec::new();
        }
        let prefix = child_prefix(dir);
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key)
            .filter(|key| key.as_str() != dir)
            .filter(|key| {
                let rest = &key[prefix.len()..];
                !rest.is_empty() && !rest.contains('/')
            })
            .filter(|key| include_hidden || !file_name(key).starts_with('.'))
            .cloned()
            .collect()
    }

    /// Every stored path strictly below `dir`, at any depth, in path order.
    /// Hidden names are included.
    pub fn descendants(&self, dir: &str) -> impl Iterator<Item = (&str, &FileNode)> {
        let prefix = child_prefix(dir);
        let start = prefix.clone();
        self.nodes
            .range(start..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(|(k, v)| (k.as_str(), v))
            .filter(move |(k, _)| *k != dir)
    }

    /// Paths of every node whose `hidden` flag is set, in path order.
    pub fn hidden_paths(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.hidden)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Return a new snapshot with `node` stored at `path`.
    ///
    /// Fails with `AlreadyExists` if the path is taken and `InvalidParent`
    /// if the parent is missing or not a directory.
    pub fn create(&self, path: &str, node: FileNode) -> Result<Self> {
        if self.exists(path) {
            return Err(TermfolioError::AlreadyExists(path.to_string()));
        }
        let par = parent(path);
        if !self.is_directory(par) {
            return Err(TermfolioError::InvalidParent(path.to_string()));
        }
        let mut nodes = Arc::clone(&self.nodes);
        Arc::make_mut(&mut nodes).insert(path.to_string(), node);
        Ok(Self { nodes })
    }

    /// Return a new snapshot without `path`.
    ///
    /// Fails with `NotFound` if absent and `NotEmpty` for a directory with
    /// any child, hidden ones included. The root can never be removed.
    pub fn remove(&self, path: &str) -> Result<Self> {
        if path == "/" {
            return Err(TermfolioError::InvalidArgument(
                "cannot remove root directory".to_string(),
            ));
        }
        let Some(node) = self.nodes.get(path) else {
            return Err(TermfolioError::NotFound(path.to_string()));
        };
        if node.kind == NodeKind::Directory && !self.list_children(path, true).is_empty() {
            return Err(TermfolioError::NotEmpty(path.to_string()));
        }
        let mut nodes = Arc::clone(&self.nodes);
        Arc::make_mut(&mut nodes).remove(path);
        Ok(Self { nodes })
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir() -> FileNode {
        FileNode::directory("drwxr-xr-x", "root", "root", "Jan 1 2023")
    }

    fn file(text: &str) -> FileNode {
        FileNode::file(text, "-rw-r--r--", "root", "root", "Jan 1 2023")
    }

    fn sample() -> FileSystem {
        FileSystem::new()
            .create("/home", dir())
            .unwrap()
            .create("/home/visitor", dir())
            .unwrap()
            .create("/home/visitor/README.txt", file("hi"))
            .unwrap()
            .create("/home/visitor/.secret", file("psst"))
            .unwrap()
            .create("/home/visitor-old", dir())
            .unwrap()
    }

    #[test]
    fn root_exists() {
        let fs = FileSystem::new();
        assert!(fs.exists("/"));
        assert!(fs.is_directory("/"));
    }

    #[test]
    fn missing_path_is_not_directory() {
        let fs = FileSystem::new();
        assert!(!fs.exists("/nope"));
        assert!(!fs.is_directory("/nope"));
        assert!(fs.get_node("/nope").is_none());
    }

    #[test]
    fn file_is_not_directory() {
        let fs = sample();
        assert!(fs.exists("/home/visitor/README.txt"));
        assert!(!fs.is_directory("/home/visitor/README.txt"));
    }

    #[test]
    fn list_children_direct_only() {
        let fs = sample();
        let kids = fs.list_children("/home", true);
        assert_eq!(kids, vec!["/home/visitor", "/home/visitor-old"]);
    }

    #[test]
    fn list_children_of_root() {
        let fs = sample();
        assert_eq!(fs.list_children("/", false), vec!["/home"]);
    }

    #[test]
    fn list_children_hides_dot_names() {
        let fs = sample();
        let shown = fs.list_children("/home/visitor", false);
        assert_eq!(shown, vec!["/home/visitor/README.txt"]);
        let all = fs.list_children("/home/visitor", true);
        assert!(all.contains(&"/home/visitor/.secret".to_string()));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn list_children_filters_by_name_not_flag() {
        let fs = sample()
            .create("/home/visitor/flagged", file("x").hidden())
            .unwrap();
        let shown = fs.list_children("/home/visitor", false);
        assert!(shown.contains(&"/home/visitor/flagged".to_string()));
    }

    #[test]
    fn list_children_of_file_is_empty() {
        let fs = sample();
        assert!(fs.list_children("/home/visitor/README.txt", true).is_empty());
    }

    #[test]
    fn descendants_skip_sibling_prefixes() {
        let fs = sample();
        let paths: Vec<&str> = fs.descendants("/home/visitor").map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/home/visitor/.secret", "/home/visitor/README.txt"]);
    }

    #[test]
    fn descendants_of_root_exclude_root() {
        let fs = sample();
        assert!(fs.descendants("/").all(|(p, _)| p != "/"));
        assert_eq!(fs.descendants("/").count(), fs.len() - 1);
    }

    #[test]
    fn create_existing_fails() {
        let fs = sample();
        let err = fs.create("/home", dir()).unwrap_err();
        assert!(matches!(err, TermfolioError::AlreadyExists(_)));
        assert!(matches!(fs.create("/", dir()), Err(TermfolioError::AlreadyExists(_))));
    }

    #[test]
    fn create_without_parent_fails() {
        let fs = sample();
        let err = fs.create("/nope/file", file("x")).unwrap_err();
        assert!(matches!(err, TermfolioError::InvalidParent(_)));
    }

    #[test]
    fn create_under_file_fails() {
        let fs = sample();
        let err = fs.create("/home/visitor/README.txt/x", file("x")).unwrap_err();
        assert!(matches!(err, TermfolioError::InvalidParent(_)));
    }

    #[test]
    fn create_leaves_original_untouched() {
        let before = sample();
        let after = before.create("/tmp", dir()).unwrap();
        assert!(!before.exists("/tmp"));
        assert!(after.exists("/tmp"));
    }

    #[test]
    fn remove_missing_fails() {
        let err = sample().remove("/ghost").unwrap_err();
        assert!(matches!(err, TermfolioError::NotFound(_)));
    }

    #[test]
    fn remove_root_fails() {
        assert!(sample().remove("/").is_err());
        assert!(FileSystem::new().remove("/").is_err());
    }

    #[test]
    fn remove_dir_with_only_hidden_child_fails() {
        let fs = FileSystem::new()
            .create("/d", dir())
            .unwrap()
            .create("/d/.dot", file(""))
            .unwrap();
        let err = fs.remove("/d").unwrap_err();
        assert!(matches!(err, TermfolioError::NotEmpty(_)));
    }

    #[test]
    fn remove_file_and_empty_dir() {
        let fs = sample();
        let fs = fs.remove("/home/visitor-old").unwrap();
        assert!(!fs.exists("/home/visitor-old"));
        let fs = fs.remove("/home/visitor/.secret").unwrap();
        assert!(!fs.exists("/home/visitor/.secret"));
    }

    #[test]
    fn hidden_paths_use_flag() {
        let fs = sample()
            .create("/home/visitor/flagged", file("x").hidden())
            .unwrap();
        assert_eq!(fs.hidden_paths(), vec!["/home/visitor/flagged"]);
    }

    #[test]
    fn from_nodes_keeps_root() {
        let fs = FileSystem::from_nodes(vec![("/etc".to_string(), dir())]);
        assert!(fs.exists("/"));
        assert!(fs.is_directory("/etc"));
        assert_eq!(fs.len(), 2);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn create_then_remove_roundtrips(
                dir_idx in 0usize..3,
                name in "[a-z]{1,8}",
                is_dir in any::<bool>(),
            ) {
                let fs = sample();
                let parent = ["/", "/home", "/home/visitor"][dir_idx];
                let path = crate::path::normalize(&name, parent);
                prop_assume!(!fs.exists(&path));
                let node = if is_dir { dir() } else { file("data") };
                let grown = fs.create(&path, node).unwrap();
                prop_assert!(grown.exists(&path));
                let shrunk = grown.remove(&path).unwrap();
                prop_assert_eq!(shrunk, fs);
            }

            #[test]
            fn non_empty_dir_never_removed(name in "\\.?[a-z]{1,8}") {
                let fs = FileSystem::new()
                    .create("/d", dir())
                    .unwrap()
                    .create(&format!("/d/{name}"), file("x"))
                    .unwrap();
                prop_assert!(matches!(fs.remove("/d"), Err(TermfolioError::NotEmpty(_))));
            }
        }
    }
}
