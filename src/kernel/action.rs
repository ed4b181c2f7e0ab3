use std::path::PathBuf;

use crate::kernel::content_kind::ContentKind;
use crate::kernel::orchestrator::ActionTicket;
use crate::kernel::services::ports::{ActionKind, ActionResult, DirEntryInfo, RemoteError};

#[derive(Debug, Clone)]
pub enum Action {
    /// Replaces the tree with a fresh one over `path`.
    OpenFolder(PathBuf),
    /// Opens a file picked outside the tree; its parent becomes the root.
    OpenPath(PathBuf),
    ExplorerMoveSelection {
        delta: isize,
    },
    ExplorerSelectRow {
        row: usize,
    },
    ExplorerActivate,
    ExplorerCollapse,
    DirLoaded {
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    DirLoadError {
        path: PathBuf,
        error: String,
    },
    LocateFile {
        name: String,
    },
    FileLocated {
        name: String,
        result: Result<Option<PathBuf>, String>,
    },
    SetContent(String),
    SetContentKind(ContentKind),
    SetAutoDetectResources(bool),
    Save,
    SaveAs(PathBuf),
    RunRemote(ActionKind),
    RemoteSettled {
        ticket: ActionTicket,
        kind: ActionKind,
        result: Result<ActionResult, RemoteError>,
    },
}
