use crate::kernel::orchestrator::ActionTicket;
use crate::kernel::services::ports::{ActionKind, ActionResult, DirEntryInfo, RemoteError};
use crate::kernel::Action;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppMessage {
    DirLoaded {
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    DirLoadError {
        path: PathBuf,
        error: String,
    },
    FileLocated {
        name: String,
        result: Result<Option<PathBuf>, String>,
    },
    ActionSettled {
        ticket: ActionTicket,
        kind: ActionKind,
        result: Result<ActionResult, RemoteError>,
    },
}

impl From<AppMessage> for Action {
    fn from(msg: AppMessage) -> Self {
        match msg {
            AppMessage::DirLoaded { path, entries } => Action::DirLoaded { path, entries },
            AppMessage::DirLoadError { path, error } => Action::DirLoadError { path, error },
            AppMessage::FileLocated { name, result } => Action::FileLocated { name, result },
            AppMessage::ActionSettled {
                ticket,
                kind,
                result,
            } => Action::RemoteSettled {
                ticket,
                kind,
                result,
            },
        }
    }
}
