//! 文件树数据模型
//!
//! Arena-backed tree over a root directory. Directories are populated lazily:
//! a directory starts `NotLoaded`, goes `Loading` while a listing is in
//! flight, and ends `Loaded` once its immediate children are attached. The
//! `Loaded` state is never left again; a new root means a new tree.

use slotmap::{new_key_type, SlotMap};
use std::{
    cmp::Ordering,
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use crate::kernel::services::ports::{entry_order, DirEntryInfo, FileProvider, FileResult};

new_key_type! { pub struct NodeId; }

pub const PLACEHOLDER_LABEL: &str = "Loading…";
pub const ERROR_LABEL: &str = "Error loading";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
    /// Synthetic child standing in for a failed listing.
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FileTreeError {
    ParentNotDirectory,
    NameExists,
    InvalidNodeId,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::NameExists => write!(f, "name already exists in parent"),
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: OsString,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    load_state: LoadState,
}

impl Node {
    fn new(kind: NodeKind, name: OsString, parent: Option<NodeId>) -> Self {
        let load_state = match kind {
            NodeKind::Dir => LoadState::NotLoaded,
            NodeKind::File | NodeKind::Error => LoadState::Loaded,
        };
        Self {
            kind,
            name,
            parent,
            children: Vec::new(),
            load_state,
        }
    }

    fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }
}

/// Owned snapshot of a subtree, as seen by callers outside the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    pub populated: bool,
}

impl TreeNode {
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: rustc_hash::FxHashSet<NodeId>,
    selected: Option<NodeId>,
    absolute_root: PathBuf,
}

impl FileTree {
    /// Empty tree whose root is not populated yet.
    pub fn new(absolute_root: PathBuf) -> Self {
        let root_name = absolute_root
            .file_name()
            .or_else(|| absolute_root.iter().next_back())
            .unwrap_or(absolute_root.as_os_str())
            .to_os_string();

        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new(NodeKind::Dir, root_name, None));

        let mut expanded = rustc_hash::FxHashSet::default();
        expanded.insert(root);

        Self {
            arena,
            root,
            expanded,
            selected: Some(root),
            absolute_root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.arena.get(id).map(|n| n.kind)
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(Node::is_dir)
    }

    pub fn get_name(&self, id: NodeId) -> Option<&OsString> {
        self.arena.get(id).map(|n| &n.name)
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.arena.get(id).map(|n| n.load_state)
    }

    pub fn is_populated(&self, id: NodeId) -> bool {
        self.load_state(id) == Some(LoadState::Loaded)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: OsString,
        kind: NodeKind,
    ) -> Result<NodeId, FileTreeError> {
        let position = {
            let parent_node = self.arena.get(parent).ok_or(FileTreeError::InvalidNodeId)?;
            if !parent_node.is_dir() {
                return Err(FileTreeError::ParentNotDirectory);
            }
            let name_str = name.to_string_lossy();
            let is_dir = kind == NodeKind::Dir;
            let mut position = parent_node.children.len();
            for (i, child_id) in parent_node.children.iter().enumerate() {
                let Some(child) = self.arena.get(*child_id) else {
                    continue;
                };
                if child.name == name {
                    return Err(FileTreeError::NameExists);
                }
                let order = entry_order(
                    is_dir,
                    &name_str,
                    child.is_dir(),
                    &child.name.to_string_lossy(),
                );
                if order == Ordering::Less && position == parent_node.children.len() {
                    position = i;
                }
            }
            position
        };

        let id = self.arena.insert(Node::new(kind, name, Some(parent)));
        self.arena
            .get_mut(parent)
            .ok_or(FileTreeError::InvalidNodeId)?
            .children
            .insert(position, id);
        Ok(id)
    }

    /// Marks a `NotLoaded` directory as `Loading` and returns the path to
    /// list. Any other state yields `None`, so a second expansion while a
    /// listing is in flight does not issue another one.
    pub fn begin_load(&mut self, id: NodeId) -> Option<PathBuf> {
        let node = self.arena.get_mut(id)?;
        if !node.is_dir() || node.load_state != LoadState::NotLoaded {
            return None;
        }
        node.load_state = LoadState::Loading;
        Some(self.full_path(id))
    }

    /// Attaches a finished listing. Ignored unless the node is `Loading`.
    pub fn apply_listing(&mut self, id: NodeId, entries: Vec<DirEntryInfo>) -> bool {
        if self.load_state(id) != Some(LoadState::Loading) {
            return false;
        }
        for entry in entries {
            if is_hidden(&entry.name) {
                continue;
            }
            let kind = if entry.is_dir {
                NodeKind::Dir
            } else {
                NodeKind::File
            };
            let _ = self.insert_child(id, entry.name.into(), kind);
        }
        self.set_loaded(id);
        true
    }

    /// Replaces the placeholder with a single error child. The directory
    /// counts as populated afterwards; it is not listed again.
    pub fn apply_listing_error(&mut self, id: NodeId, error: &str) -> bool {
        if self.load_state(id) != Some(LoadState::Loading) {
            return false;
        }
        let label = format!("{ERROR_LABEL}: {error}");
        let _ = self.insert_child(id, label.into(), NodeKind::Error);
        self.set_loaded(id);
        true
    }

    /// Populates `id` inline. Idempotent: populated or in-flight directories
    /// are left alone and `false` is returned.
    pub fn expand_now(&mut self, id: NodeId, provider: &dyn FileProvider) -> bool {
        let Some(path) = self.begin_load(id) else {
            return false;
        };
        match list_dir(provider, &path) {
            Ok(entries) => self.apply_listing(id, entries),
            Err(e) => self.apply_listing_error(id, &e.to_string()),
        }
    }

    fn set_loaded(&mut self, id: NodeId) {
        if let Some(node) = self.arena.get_mut(id) {
            node.load_state = LoadState::Loaded;
        }
    }

    pub fn full_path(&self, id: NodeId) -> PathBuf {
        let mut components = Vec::new();
        let mut current = id;
        while let Some(node) = self.arena.get(current) {
            let Some(parent) = node.parent else {
                break;
            };
            components.push(node.name.as_os_str());
            current = parent;
        }

        let mut path = self.absolute_root.clone();
        for comp in components.iter().rev() {
            path.push(comp);
        }
        path
    }

    pub fn find_node_by_path(&self, path: &Path) -> Option<NodeId> {
        let relative = path.strip_prefix(&self.absolute_root).ok()?;
        let mut current = self.root;
        for component in relative.components() {
            let name = component.as_os_str();
            current = self.children(current).iter().copied().find(|child| {
                self.arena
                    .get(*child)
                    .is_some_and(|n| n.name.as_os_str() == name)
            })?;
        }
        Some(current)
    }

    pub fn toggle_expand(&mut self, id: NodeId) {
        if self.is_dir(id) && !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn expand(&mut self, id: NodeId) {
        if self.is_dir(id) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn snapshot(&self, id: NodeId) -> Option<TreeNode> {
        let node = self.arena.get(id)?;
        Some(TreeNode {
            name: node.name.to_string_lossy().to_string(),
            kind: node.kind,
            children: node
                .children
                .iter()
                .filter_map(|child| self.snapshot(*child))
                .collect(),
            populated: node.load_state == LoadState::Loaded,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowKind {
    Dir { expanded: bool },
    File,
    Error,
    /// Stand-in for the children of an expanded, unpopulated directory.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    /// For placeholder rows this is the directory being loaded.
    pub id: NodeId,
    pub depth: u16,
    pub name: OsString,
    pub kind: RowKind,
}

impl FileTreeRow {
    pub fn is_selectable(&self) -> bool {
        self.kind != RowKind::Placeholder
    }
}

impl FileTree {
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let expanded = self.expanded.contains(&id);

            if id != self.root {
                let kind = match node.kind {
                    NodeKind::Dir => RowKind::Dir { expanded },
                    NodeKind::File => RowKind::File,
                    NodeKind::Error => RowKind::Error,
                };
                result.push(FileTreeRow {
                    id,
                    depth,
                    name: node.name.clone(),
                    kind,
                });
            }

            if !node.is_dir() || !expanded {
                continue;
            }

            if node.load_state != LoadState::Loaded {
                result.push(FileTreeRow {
                    id,
                    depth: depth + 1,
                    name: PLACEHOLDER_LABEL.into(),
                    kind: RowKind::Placeholder,
                });
                continue;
            }

            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        result
    }
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Immediate, visible children of `path` in tree order.
pub fn list_dir(provider: &dyn FileProvider, path: &Path) -> FileResult<Vec<DirEntryInfo>> {
    let mut entries: Vec<DirEntryInfo> = provider
        .read_dir(path)?
        .into_iter()
        .filter(|entry| !is_hidden(&entry.name))
        .map(|entry| DirEntryInfo {
            name: entry.name,
            is_dir: entry.is_dir,
        })
        .collect();
    entries.sort_by(|a, b| entry_order(a.is_dir, &a.name, b.is_dir, &b.name));
    Ok(entries)
}

/// Builds a tree over `root_path` with the root level populated inline.
pub fn build_file_tree(provider: &dyn FileProvider, root_path: &Path) -> FileResult<FileTree> {
    let absolute_root = provider
        .canonicalize(root_path)
        .unwrap_or_else(|_| root_path.to_path_buf());

    let entries = list_dir(provider, &absolute_root)?;
    let mut tree = FileTree::new(absolute_root);
    let root = tree.root();
    tree.begin_load(root);
    tree.apply_listing(root, entries);
    Ok(tree)
}

/// Finds the first file named `file_name` by walking storage under `root`.
///
/// This looks at storage, not at the tree: it may descend into directories
/// the tree has not populated yet, and populates nothing itself.
pub fn locate(
    provider: &dyn FileProvider,
    root: &Path,
    file_name: &str,
) -> FileResult<Option<PathBuf>> {
    provider.find_file(root, file_name)
}
