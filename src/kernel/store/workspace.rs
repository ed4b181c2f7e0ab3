use std::path::Path;

use crate::kernel::Action;

impl super::Store {
    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::OpenPath(path) => {
                if !self.open_file(&path) {
                    return super::DispatchResult::changed();
                }
                let parent = self
                    .state
                    .workspace
                    .file()
                    .and_then(|f| f.path.as_ref())
                    .and_then(|p| p.parent())
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf);
                let effects = match parent {
                    Some(parent) => self.rebuild_tree(parent),
                    None => Vec::new(),
                };
                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::SetContent(text) => {
                self.state.workspace.set_content(text);
                super::DispatchResult::changed()
            }
            Action::SetContentKind(kind) => {
                let prev = self.state.workspace.content_kind();
                self.state.workspace.set_content_kind(kind);
                super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: prev != kind,
                }
            }
            Action::Save => {
                self.save(None);
                super::DispatchResult::changed()
            }
            Action::SaveAs(path) => {
                if !self.save(Some(&path)) {
                    return super::DispatchResult::changed();
                }
                let effects = match self.state.workspace.root().map(Path::to_path_buf) {
                    Some(root) => self.rebuild_tree(root),
                    None => Vec::new(),
                };
                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            _ => super::DispatchResult::unchanged(),
        }
    }

    /// Opens `path` into the workspace and reports the outcome in the status
    /// line. Returns whether the file is now open.
    pub(super) fn open_file(&mut self, path: &Path) -> bool {
        match self.state.workspace.open_file(path) {
            Ok(()) => {
                let name = self
                    .state
                    .workspace
                    .file()
                    .and_then(|f| f.file_name())
                    .unwrap_or_default();
                self.set_status(format!("Loaded: {name}"));
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                self.set_status(format!("Error loading file: {e}"));
                false
            }
        }
    }

    fn save(&mut self, path: Option<&Path>) -> bool {
        match self.state.workspace.save(path) {
            Ok(saved) => {
                let name = saved
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.set_status(format!("Saved: {name}"));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.set_status(format!("Error saving file: {e}"));
                false
            }
        }
    }
}
