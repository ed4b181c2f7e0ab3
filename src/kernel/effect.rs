use std::path::PathBuf;

use crate::kernel::orchestrator::ActionTicket;
use crate::kernel::services::ports::ActionRequest;

#[derive(Debug, Clone)]
pub enum Effect {
    LoadDir(PathBuf),
    LocateFile {
        root: PathBuf,
        name: String,
    },
    DispatchRemote {
        ticket: ActionTicket,
        request: ActionRequest,
    },
}
