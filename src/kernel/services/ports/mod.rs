//! Service ports: traits + data contracts.

pub mod file;
pub mod remote;
pub mod render;
pub mod settings;

pub use file::{
    entry_order, DirEntry, DirEntryInfo, FileError, FileProvider, Result as FileResult,
};
pub use remote::{
    ActionClient, ActionContext, ActionFuture, ActionKind, ActionPayload, ActionRequest,
    ActionResponse, ActionResult, LintIssue, PreviewResult, RemoteError,
};
pub use render::{escape_angle_brackets, PreviewDocument, RenderSink, RenderedKind};
pub use settings::{BackendSettings, PreviewSettings, Settings};
