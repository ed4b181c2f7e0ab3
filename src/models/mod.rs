//! Data models.

pub mod file_tree;

pub use file_tree::{
    build_file_tree, is_hidden, list_dir, locate, FileTree, FileTreeError, FileTreeRow, LoadState,
    NodeId, NodeKind, RowKind, TreeNode, ERROR_LABEL, PLACEHOLDER_LABEL,
};
