use crate::kernel::orchestrator::{applied_status, failure_message, ActionOutcome, Begin};
use crate::kernel::services::ports::{ActionKind, ActionResult, PreviewDocument};
use crate::kernel::state::{LintOutput, SettledAction};
use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_remote_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::SetAutoDetectResources(enabled) => {
                let prev = self.state.ui.auto_detect_resources;
                self.state.ui.auto_detect_resources = enabled;
                super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: prev != enabled,
                }
            }
            Action::RunRemote(kind) => {
                let begin = self.state.actions.begin(
                    kind,
                    &self.state.workspace,
                    self.state.ui.auto_detect_resources,
                );
                match begin {
                    Begin::Skipped(ticket) => {
                        self.set_status(kind.skipped_message());
                        if kind == ActionKind::Lint {
                            self.state.ui.lint = LintOutput::Message(kind.skipped_message().into());
                        }
                        self.state.ui.last_settled = Some(SettledAction {
                            ticket,
                            kind,
                            outcome: ActionOutcome::Skipped,
                        });
                        super::DispatchResult::changed()
                    }
                    Begin::Dispatch { ticket, request } => {
                        self.set_status(kind.progress_message());
                        super::DispatchResult {
                            effects: vec![Effect::DispatchRemote { ticket, request }],
                            state_changed: true,
                        }
                    }
                }
            }
            Action::RemoteSettled {
                ticket,
                kind,
                result,
            } => {
                if self.state.actions.settle(ticket, result.is_ok()).is_none() {
                    tracing::debug!(ticket = ticket.get(), "settle for unknown ticket ignored");
                    return super::DispatchResult::unchanged();
                }

                let outcome = match result {
                    Ok(result) => {
                        let status = applied_status(&result);
                        self.apply_result(result);
                        self.set_status(status);
                        ActionOutcome::Applied
                    }
                    Err(error) => {
                        let message = failure_message(kind, &error);
                        tracing::warn!(
                            action = %kind,
                            ticket = ticket.get(),
                            error = %error,
                            "remote action failed"
                        );
                        if kind == ActionKind::Lint {
                            self.state.ui.lint = LintOutput::Message(message.clone());
                        }
                        self.set_status(message.clone());
                        ActionOutcome::Failed(message)
                    }
                };
                self.state.ui.last_settled = Some(SettledAction {
                    ticket,
                    kind,
                    outcome,
                });
                super::DispatchResult::changed()
            }
            _ => super::DispatchResult::unchanged(),
        }
    }

    fn apply_result(&mut self, result: ActionResult) {
        match result {
            ActionResult::Formatted { content } => {
                self.state.workspace.apply_remote_content(content);
            }
            ActionResult::Linted { issues } => {
                self.state.ui.lint = LintOutput::from_issues(issues);
            }
            ActionResult::Previewed(preview) => {
                self.state.ui.preview = Some(PreviewDocument::from_body(
                    preview.rendered_kind,
                    &preview.body,
                ));
                self.state.ui.preview_version += 1;
            }
        }
    }
}
