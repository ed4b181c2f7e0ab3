use super::message::AppMessage;
use crate::kernel::orchestrator::ActionTicket;
use crate::kernel::services::ports::{ActionClient, ActionRequest, FileProvider};
use crate::models::{list_dir, locate};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Worker pool for the suspension points: directory listing, file search,
/// and remote calls. Tasks never touch UI state; each one sends exactly one
/// [`AppMessage`] back.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    files: Arc<dyn FileProvider>,
    client: Arc<dyn ActionClient>,
    action_path: String,
}

impl AsyncRuntime {
    pub fn new(
        tx: Sender<AppMessage>,
        files: Arc<dyn FileProvider>,
        client: Arc<dyn ActionClient>,
        action_path: impl Into<String>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            files,
            client,
            action_path: action_path.into(),
        })
    }

    /// Runs `future` to completion on this runtime, driving its IO and
    /// timers even on the current-thread fallback.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn load_dir(&self, path: PathBuf) {
        let tx = self.tx.clone();
        let files = self.files.clone();
        self.runtime.spawn(async move {
            let listed = {
                let path = path.clone();
                tokio::task::spawn_blocking(move || list_dir(files.as_ref(), &path)).await
            };
            let msg = match listed {
                Ok(Ok(entries)) => AppMessage::DirLoaded { path, entries },
                Ok(Err(e)) => AppMessage::DirLoadError {
                    path,
                    error: e.to_string(),
                },
                Err(e) => AppMessage::DirLoadError {
                    path,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    pub fn locate_file(&self, root: PathBuf, name: String) {
        let tx = self.tx.clone();
        let files = self.files.clone();
        self.runtime.spawn(async move {
            let found = {
                let name = name.clone();
                tokio::task::spawn_blocking(move || locate(files.as_ref(), &root, &name)).await
            };
            let result = match found {
                Ok(Ok(path)) => Ok(path),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(AppMessage::FileLocated { name, result });
        });
    }

    pub fn dispatch_action(&self, ticket: ActionTicket, request: ActionRequest) {
        let tx = self.tx.clone();
        let kind = request.action;
        let future = self.client.execute(&self.action_path, request.payload());
        self.runtime.spawn(async move {
            let result = future.await.and_then(|response| response.into_result(kind));
            if let Err(e) = &result {
                tracing::debug!(
                    action = %kind,
                    ticket = ticket.get(),
                    error = %e,
                    "remote call failed"
                );
            }
            let _ = tx.send(AppMessage::ActionSettled {
                ticket,
                kind,
                result,
            });
        });
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("action_path", &self.action_path)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
