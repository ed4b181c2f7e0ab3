//! Per-invocation state machines for remote format/lint/preview.
//!
//! Every trigger gets its own [`ActionInvocation`] keyed by a fresh
//! [`ActionTicket`]. There is no shared in-flight slot: two previews started
//! back to back are both dispatched and both applied, in completion order.

use rustc_hash::FxHashMap;

use crate::kernel::services::ports::{
    ActionContext, ActionKind, ActionRequest, ActionResult, RemoteError,
};
use crate::kernel::workspace::WorkspaceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionTicket(u64);

impl ActionTicket {
    pub fn get(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_test(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Dispatching,
    Applied,
    Failed,
    Skipped,
}

impl ActionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Applied | Self::Failed | Self::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Skipped,
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInvocation {
    pub ticket: ActionTicket,
    pub kind: ActionKind,
    phase: ActionPhase,
}

impl ActionInvocation {
    fn new(ticket: ActionTicket, kind: ActionKind) -> Self {
        Self {
            ticket,
            kind,
            phase: ActionPhase::Idle,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    /// `Idle -> Dispatching` when `content` has non-whitespace text,
    /// `Idle -> Skipped` otherwise. Returns whether dispatch should happen.
    fn start(&mut self, content: &str) -> bool {
        if self.phase != ActionPhase::Idle {
            return false;
        }
        if content.trim().is_empty() {
            self.phase = ActionPhase::Skipped;
            return false;
        }
        self.phase = ActionPhase::Dispatching;
        true
    }

    fn settle(&mut self, ok: bool) -> bool {
        if self.phase != ActionPhase::Dispatching {
            return false;
        }
        self.phase = if ok {
            ActionPhase::Applied
        } else {
            ActionPhase::Failed
        };
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Begin {
    Skipped(ActionTicket),
    Dispatch {
        ticket: ActionTicket,
        request: ActionRequest,
    },
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    next_ticket: u64,
    in_flight: FxHashMap<ActionTicket, ActionInvocation>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn get(&self, ticket: ActionTicket) -> Option<&ActionInvocation> {
        self.in_flight.get(&ticket)
    }

    /// Starts a fresh invocation of `kind` over the workspace's current
    /// content. Skipped invocations are terminal immediately and never
    /// tracked.
    pub fn begin(
        &mut self,
        kind: ActionKind,
        workspace: &WorkspaceState,
        auto_detect_resources: bool,
    ) -> Begin {
        self.next_ticket += 1;
        let ticket = ActionTicket(self.next_ticket);
        let mut invocation = ActionInvocation::new(ticket, kind);

        if !invocation.start(workspace.content()) {
            tracing::debug!(action = %kind, ticket = ticket.get(), "skipped: empty content");
            return Begin::Skipped(ticket);
        }

        let request = build_request(kind, workspace, auto_detect_resources);
        self.in_flight.insert(ticket, invocation);
        tracing::debug!(action = %kind, ticket = ticket.get(), "dispatching");
        Begin::Dispatch { ticket, request }
    }

    /// Moves a dispatching invocation to its terminal phase and forgets it.
    /// Unknown or already settled tickets yield `None`.
    pub fn settle(&mut self, ticket: ActionTicket, ok: bool) -> Option<ActionInvocation> {
        let mut invocation = self.in_flight.remove(&ticket)?;
        invocation.settle(ok);
        Some(invocation)
    }
}

pub fn build_request(
    kind: ActionKind,
    workspace: &WorkspaceState,
    auto_detect_resources: bool,
) -> ActionRequest {
    let is_preview = kind == ActionKind::Preview;
    let context = match workspace.root() {
        Some(root) if is_preview && auto_detect_resources => Some(ActionContext {
            directory_path: root.to_path_buf(),
            current_file_name: workspace
                .file()
                .and_then(|f| f.file_name())
                .unwrap_or_default(),
        }),
        _ => None,
    };

    ActionRequest {
        action: kind,
        content: workspace.content().to_string(),
        content_kind: workspace.content_kind(),
        auto_detect_resources: is_preview.then_some(auto_detect_resources),
        context,
    }
}

pub fn applied_status(result: &ActionResult) -> String {
    match result {
        ActionResult::Formatted { .. } => "Code formatted successfully".to_string(),
        ActionResult::Linted { .. } => "Linting completed".to_string(),
        ActionResult::Previewed(preview) => match preview.detected_resources.as_deref() {
            Some(resources) if !resources.is_empty() => {
                format!("Preview updated with {} detected resources", resources.len())
            }
            _ => "Preview updated".to_string(),
        },
    }
}

/// `success: false` carries the server's own wording; transport and decode
/// failures are prefixed with the action label.
pub fn failure_message(kind: ActionKind, error: &RemoteError) -> String {
    match error {
        RemoteError::Rejected(message) => message.clone(),
        RemoteError::Transport(message) | RemoteError::Decode(message) => {
            format!("{} error: {}", kind.label(), message)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/orchestrator.rs"]
mod tests;
