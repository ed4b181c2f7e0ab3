//! Headless application core (state/action/effect).

pub mod action;
pub mod content_kind;
pub mod effect;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod store;
pub mod workspace;

pub use action::Action;
pub use content_kind::ContentKind;
pub use effect::Effect;
pub use orchestrator::{ActionOutcome, ActionPhase, ActionTicket, Orchestrator};
pub use state::{AppState, ExplorerState, LintOutput, SettledAction, UiState};
pub use store::{DispatchResult, Store};
pub use workspace::{WorkspaceError, WorkspaceFile, WorkspaceState};
