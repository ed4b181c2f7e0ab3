use std::path::PathBuf;

use crate::kernel::state::Activation;
use crate::kernel::{Action, Effect};
use crate::models::FileTree;

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::OpenFolder(path) => {
                let root = self
                    .state
                    .workspace
                    .provider()
                    .canonicalize(&path)
                    .unwrap_or(path);
                let effects = self.rebuild_tree(root.clone());
                let name = root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                self.set_status(format!("Opened folder: {name}"));
                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::ExplorerMoveSelection { delta } => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.explorer.move_selection(delta),
            },
            Action::ExplorerSelectRow { row } => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.explorer.select_row(row),
            },
            Action::ExplorerActivate => match self.state.explorer.activate_selected() {
                Activation::Nothing => super::DispatchResult::unchanged(),
                Activation::Dir { changed, effects } => super::DispatchResult {
                    effects,
                    state_changed: changed,
                },
                Activation::File(path) => {
                    self.open_file(&path);
                    super::DispatchResult::changed()
                }
            },
            Action::ExplorerCollapse => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.explorer.collapse_selected(),
            },
            Action::DirLoaded { path, entries } => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.explorer.apply_dir_loaded(path, entries),
            },
            Action::DirLoadError { path, error } => {
                tracing::warn!(path = %path.display(), error = %error, "directory listing failed");
                let is_root = self.state.workspace.root() == Some(path.as_path());
                let mut state_changed = self.state.explorer.apply_dir_load_error(path, &error);
                if is_root {
                    state_changed |= self.set_status(format!("Error reading directory: {error}"));
                }
                super::DispatchResult {
                    effects: Vec::new(),
                    state_changed,
                }
            }
            Action::LocateFile { name } => {
                let Some(root) = self.state.workspace.root().map(|p| p.to_path_buf()) else {
                    return super::DispatchResult {
                        effects: Vec::new(),
                        state_changed: self.set_status("No folder open"),
                    };
                };
                super::DispatchResult {
                    effects: vec![Effect::LocateFile { root, name }],
                    state_changed: false,
                }
            }
            Action::FileLocated { name, result } => {
                match result {
                    Ok(Some(path)) => {
                        self.state.explorer.select_path(&path);
                        self.open_file(&path);
                    }
                    Ok(None) => {
                        self.set_status(format!("File not found: {name}"));
                    }
                    Err(error) => {
                        self.set_status(format!("Error searching for {name}: {error}"));
                    }
                }
                super::DispatchResult::changed()
            }
            _ => super::DispatchResult::unchanged(),
        }
    }

    /// Drops the current tree and starts a fresh one over `root`.
    pub(super) fn rebuild_tree(&mut self, root: PathBuf) -> Vec<Effect> {
        self.state.workspace.set_root(root.clone());
        self.state.explorer.open(FileTree::new(root))
    }
}
