//! Workbench: owns the store and the runtime, and routes effects and
//! messages between them.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{ActionClient, FileProvider, RenderSink, Settings};
use crate::kernel::{Action, AppState, Effect, Store};

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 256;

pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    sink: Box<dyn RenderSink>,
    /// Effects handed to the runtime whose message has not come back yet.
    pending: usize,
    rendered_preview_version: u64,
}

impl Workbench {
    pub fn new(
        files: Arc<dyn FileProvider>,
        client: Arc<dyn ActionClient>,
        sink: Box<dyn RenderSink>,
        settings: &Settings,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(
            tx,
            files.clone(),
            client,
            settings.backend.action_path.clone(),
        )?;
        let store = Store::new(AppState::new(
            files,
            settings.preview.auto_detect_resources,
        ));

        Ok(Self {
            store,
            runtime,
            rx,
            sink,
            pending: 0,
            rendered_preview_version: 0,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        self.sync_preview();
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        self.pending += 1;
        match effect {
            Effect::LoadDir(path) => self.runtime.load_dir(path),
            Effect::LocateFile { root, name } => self.runtime.locate_file(root, name),
            Effect::DispatchRemote { ticket, request } => {
                self.runtime.dispatch_action(ticket, request)
            }
        }
    }

    /// Pushes the current preview to the sink once per applied preview.
    fn sync_preview(&mut self) {
        let ui = &self.store.state().ui;
        if ui.preview_version == self.rendered_preview_version {
            return;
        }
        self.rendered_preview_version = ui.preview_version;
        if let Some(preview) = ui.preview.as_ref() {
            self.sink.load_content(preview.markup());
        }
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.dispatch(Action::from(msg))
    }

    /// Drains whatever the runtime has sent so far without blocking.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_MESSAGE_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(msg) => changed |= self.handle_message(msg),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::warn!("runtime channel disconnected");
                    break;
                }
            }
        }
        changed
    }

    /// Blocks until every dispatched effect has reported back, or `timeout`
    /// elapses. Returns whether the workbench went idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(pending = self.pending, "timed out waiting for runtime");
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.handle_message(msg);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    tracing::warn!(pending = self.pending, "timed out waiting for runtime");
                    return false;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    tracing::warn!("runtime channel disconnected");
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
