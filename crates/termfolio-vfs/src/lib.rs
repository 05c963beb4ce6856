//! Virtual file system for the termfolio terminal.
//!
//! The tree is a flat map from canonical absolute path to [`FileNode`].
//! Containment is never stored: a directory's children are found by prefix
//! scan at query time. Mutations return a new [`FileSystem`] and leave the
//! receiver untouched, so earlier snapshots stay valid.

mod node;
pub mod path;
pub mod seed;
mod tree;

pub use node::{FileNode, NodeKind};
pub use path::normalize;
pub use seed::initial_file_system;
pub use tree::FileSystem;
