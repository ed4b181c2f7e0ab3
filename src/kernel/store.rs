use super::{Action, AppState, Effect};

mod explorer;
mod remote;
mod workspace;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: true,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenFolder(_)
            | Action::ExplorerMoveSelection { .. }
            | Action::ExplorerSelectRow { .. }
            | Action::ExplorerActivate
            | Action::ExplorerCollapse
            | Action::DirLoaded { .. }
            | Action::DirLoadError { .. }
            | Action::LocateFile { .. }
            | Action::FileLocated { .. } => self.reduce_explorer_action(action),
            Action::OpenPath(_)
            | Action::SetContent(_)
            | Action::SetContentKind(_)
            | Action::Save
            | Action::SaveAs(_) => self.reduce_workspace_action(action),
            Action::SetAutoDetectResources(_)
            | Action::RunRemote(_)
            | Action::RemoteSettled { .. } => self.reduce_remote_action(action),
        }
    }

    fn set_status(&mut self, status: impl Into<String>) -> bool {
        let status = status.into();
        if self.state.ui.status == status {
            return false;
        }
        self.state.ui.status = status;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
