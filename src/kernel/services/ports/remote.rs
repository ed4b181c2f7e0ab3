//! Remote tool endpoint contract: request/response types and the client trait.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::kernel::content_kind::ContentKind;

use super::render::RenderedKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Format,
    Lint,
    Preview,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Format, ActionKind::Lint, ActionKind::Preview];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "format" => Some(Self::Format),
            "lint" => Some(Self::Lint),
            "preview" => Some(Self::Preview),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Lint => "lint",
            Self::Preview => "preview",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Format => "Format",
            Self::Lint => "Lint",
            Self::Preview => "Preview",
        }
    }

    pub fn progress_message(self) -> &'static str {
        match self {
            Self::Format => "Formatting code...",
            Self::Lint => "Linting code...",
            Self::Preview => "Generating preview...",
        }
    }

    pub fn skipped_message(self) -> &'static str {
        match self {
            Self::Format => "No content to format",
            Self::Lint => "No content to lint",
            Self::Preview => "No content to preview",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read hint for resource detection; never grants access to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub directory_path: PathBuf,
    pub current_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: ActionKind,
    pub content: String,
    pub content_kind: ContentKind,
    /// Only meaningful for preview; `None` for format and lint.
    pub auto_detect_resources: Option<bool>,
    pub context: Option<ActionContext>,
}

impl ActionRequest {
    pub fn payload(&self) -> ActionPayload {
        ActionPayload {
            action: self.action,
            content: self.content.clone(),
            file_type: self.content_kind.file_type().to_string(),
            auto_detect_resources: self.auto_detect_resources,
            directory_path: self
                .context
                .as_ref()
                .map(|c| c.directory_path.to_string_lossy().to_string()),
            current_file: self.context.as_ref().map(|c| c.current_file_name.clone()),
        }
    }
}

/// JSON body sent to the tool endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPayload {
    pub action: ActionKind,
    pub content: String,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detect_resources: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
    #[serde(default)]
    pub line: i64,
    pub message: String,
}

/// Raw response body. Which fields are present depends on the action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<LintIssue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_resources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Narrows the response to the result shape of `kind`.
    pub fn into_result(self, kind: ActionKind) -> Result<ActionResult, RemoteError> {
        if !self.success {
            let message = self
                .message
                .or(self.error)
                .unwrap_or_else(|| format!("{} failed", kind.label()));
            return Err(RemoteError::Rejected(message));
        }

        match kind {
            ActionKind::Format => {
                let content = self
                    .content
                    .ok_or_else(|| RemoteError::Decode("response missing `content`".into()))?;
                Ok(ActionResult::Formatted { content })
            }
            ActionKind::Lint => {
                let issues = self
                    .issues
                    .ok_or_else(|| RemoteError::Decode("response missing `issues`".into()))?;
                Ok(ActionResult::Linted { issues })
            }
            ActionKind::Preview => {
                let body = self
                    .preview
                    .ok_or_else(|| RemoteError::Decode("response missing `preview`".into()))?;
                let rendered_kind = match self.kind.as_deref() {
                    Some("html") => RenderedKind::Html,
                    _ => RenderedKind::Text,
                };
                Ok(ActionResult::Previewed(PreviewResult {
                    rendered_kind,
                    body,
                    detected_resources: self.detected_resources,
                }))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResult {
    pub rendered_kind: RenderedKind,
    pub body: String,
    pub detected_resources: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Formatted { content: String },
    /// An empty list means "no issues", which is a success.
    Linted { issues: Vec<LintIssue> },
    Previewed(PreviewResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Endpoint unreachable or non-2xx status.
    Transport(String),
    /// Body was not the structured data we expected.
    Decode(String),
    /// Well-formed response with `success: false`.
    Rejected(String),
}

impl RemoteError {
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Transport(m) | RemoteError::Decode(m) | RemoteError::Rejected(m) => m,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RemoteError {}

pub type ActionFuture =
    Pin<Box<dyn Future<Output = Result<ActionResponse, RemoteError>> + Send + 'static>>;

/// One request/response exchange with a named tool endpoint.
///
/// Implementations keep no per-request state: concurrent calls are
/// independent and may complete in any order.
pub trait ActionClient: Send + Sync {
    fn execute(&self, endpoint: &str, payload: ActionPayload) -> ActionFuture;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/remote.rs"]
mod tests;
