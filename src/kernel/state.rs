use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::kernel::orchestrator::{ActionOutcome, ActionTicket, Orchestrator};
use crate::kernel::services::ports::{
    ActionKind, DirEntryInfo, FileProvider, LintIssue, PreviewDocument,
};
use crate::kernel::workspace::WorkspaceState;
use crate::kernel::Effect;
use crate::models::{FileTree, FileTreeRow, LoadState, NodeId, NodeKind};

pub const READY_STATUS: &str = "Ready - Open a file or folder to start editing";
pub const NO_ISSUES_MESSAGE: &str = "✓ No issues found";

/// Contents of the lint output panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LintOutput {
    #[default]
    Empty,
    /// A successful lint that returned zero issues.
    NoIssues,
    Issues(Vec<LintIssue>),
    Message(String),
}

impl LintOutput {
    pub fn from_issues(issues: Vec<LintIssue>) -> Self {
        if issues.is_empty() {
            Self::NoIssues
        } else {
            Self::Issues(issues)
        }
    }

    pub fn render(&self) -> String {
        match self {
            LintOutput::Empty => String::new(),
            LintOutput::NoIssues => NO_ISSUES_MESSAGE.to_string(),
            LintOutput::Issues(issues) => {
                let mut out = String::new();
                for issue in issues {
                    out.push_str(&format!("Line {}: {}\n", issue.line, issue.message));
                }
                out
            }
            LintOutput::Message(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledAction {
    pub ticket: ActionTicket,
    pub kind: ActionKind,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub status: String,
    pub lint: LintOutput,
    pub preview: Option<PreviewDocument>,
    /// Bumped on every applied preview, including identical markup.
    pub preview_version: u64,
    pub auto_detect_resources: bool,
    pub last_settled: Option<SettledAction>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: READY_STATUS.to_string(),
            lint: LintOutput::Empty,
            preview: None,
            preview_version: 0,
            auto_detect_resources: true,
            last_settled: None,
        }
    }
}

pub struct AppState {
    pub ui: UiState,
    pub explorer: ExplorerState,
    pub workspace: WorkspaceState,
    pub actions: Orchestrator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ui", &self.ui)
            .field("explorer", &self.explorer)
            .field("root", &self.workspace.root())
            .field("in_flight", &self.actions.in_flight())
            .finish()
    }
}

impl AppState {
    pub fn new(provider: Arc<dyn FileProvider>, auto_detect_resources: bool) -> Self {
        Self {
            ui: UiState {
                auto_detect_resources,
                ..UiState::default()
            },
            explorer: ExplorerState::default(),
            workspace: WorkspaceState::new(provider),
            actions: Orchestrator::new(),
        }
    }
}

/// What activating the selected row asks the caller to do.
#[derive(Debug)]
pub enum Activation {
    Nothing,
    Dir { changed: bool, effects: Vec<Effect> },
    File(PathBuf),
}

#[derive(Default)]
pub struct ExplorerState {
    tree: Option<FileTree>,
    pub rows: Vec<FileTreeRow>,
    index_by_id: FxHashMap<NodeId, usize>,
}

impl std::fmt::Debug for ExplorerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerState")
            .field("root", &self.tree.as_ref().map(|t| t.absolute_root()))
            .field("rows_len", &self.rows.len())
            .field("selected", &self.selected())
            .finish()
    }
}

impl ExplorerState {
    pub fn tree(&self) -> Option<&FileTree> {
        self.tree.as_ref()
    }

    /// Replaces the whole tree. Starts loading the root if it is unpopulated.
    pub fn open(&mut self, mut tree: FileTree) -> Vec<Effect> {
        let root = tree.root();
        let effects = match tree.begin_load(root) {
            Some(path) => vec![Effect::LoadDir(path)],
            None => Vec::new(),
        };
        tree.expand(root);
        self.tree = Some(tree);
        self.refresh_rows();
        effects
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.tree.as_ref().and_then(|t| t.selected())
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected()
            .and_then(|id| self.index_by_id.get(&id).copied())
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        if delta == 0 {
            return false;
        }
        let selectable: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_selectable())
            .map(|(i, _)| i)
            .collect();
        if selectable.is_empty() {
            return false;
        }

        let current = self
            .selected_row()
            .and_then(|row| selectable.iter().position(|i| *i == row));
        let next = match current {
            None if delta < 0 => selectable.len() - 1,
            None => 0,
            Some(pos) if delta < 0 => pos.saturating_sub(delta.unsigned_abs()),
            Some(pos) => (pos + delta as usize).min(selectable.len() - 1),
        };
        if Some(next) == current {
            return false;
        }
        self.select_row(selectable[next])
    }

    pub fn select_row(&mut self, row: usize) -> bool {
        let Some(target) = self.rows.get(row).filter(|r| r.is_selectable()) else {
            return false;
        };
        let id = target.id;
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let prev = tree.selected();
        tree.set_selected(Some(id));
        prev != Some(id)
    }

    /// Selects the node at `path` if the tree has already loaded it.
    pub fn select_path(&mut self, path: &Path) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(id) = tree.find_node_by_path(path) else {
            return false;
        };
        let prev = tree.selected();
        tree.set_selected(Some(id));
        prev != Some(id)
    }

    pub fn activate_selected(&mut self) -> Activation {
        let Some(tree) = self.tree.as_ref() else {
            return Activation::Nothing;
        };
        let Some(id) = tree.selected().filter(|id| *id != tree.root()) else {
            return Activation::Nothing;
        };
        match tree.kind(id) {
            Some(NodeKind::Dir) => {
                let (changed, effects) = self.toggle_dir(id);
                Activation::Dir { changed, effects }
            }
            Some(NodeKind::File) => Activation::File(tree.full_path(id)),
            Some(NodeKind::Error) | None => Activation::Nothing,
        }
    }

    pub fn collapse_selected(&mut self) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(id) = tree.selected().filter(|id| *id != tree.root()) else {
            return false;
        };
        if tree.is_dir(id) && tree.is_expanded(id) {
            tree.collapse(id);
            self.refresh_rows();
            return true;
        }
        false
    }

    pub fn apply_dir_loaded(&mut self, path: PathBuf, entries: Vec<DirEntryInfo>) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(node_id) = tree.find_node_by_path(&path) else {
            return false;
        };
        if !tree.apply_listing(node_id, entries) {
            return false;
        }
        self.refresh_rows();
        true
    }

    pub fn apply_dir_load_error(&mut self, path: PathBuf, error: &str) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let Some(node_id) = tree.find_node_by_path(&path) else {
            return false;
        };
        if !tree.apply_listing_error(node_id, error) {
            return false;
        }
        self.refresh_rows();
        true
    }

    fn toggle_dir(&mut self, id: NodeId) -> (bool, Vec<Effect>) {
        let Some(tree) = self.tree.as_mut() else {
            return (false, Vec::new());
        };
        if tree.is_expanded(id) {
            tree.collapse(id);
            self.refresh_rows();
            return (true, Vec::new());
        }

        let effects = match tree.load_state(id) {
            Some(LoadState::NotLoaded) => tree
                .begin_load(id)
                .map(|path| vec![Effect::LoadDir(path)])
                .unwrap_or_default(),
            Some(LoadState::Loading) | Some(LoadState::Loaded) | None => Vec::new(),
        };
        tree.expand(id);
        self.refresh_rows();
        (true, effects)
    }

    fn refresh_rows(&mut self) {
        self.rows = self
            .tree
            .as_ref()
            .map(|t| t.flatten_for_view())
            .unwrap_or_default();

        self.index_by_id.clear();
        self.index_by_id.reserve(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if row.is_selectable() {
                self.index_by_id.insert(row.id, i);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
