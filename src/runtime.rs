//! Session runtime - owns the model and executes commands
//!
//! The reducer never performs I/O. Commands it returns are executed here on
//! worker threads, and their results come back as messages over a channel.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::messages::{Msg, PersistMsg};
use crate::model::{Container, DashboardModel};
use crate::persistence::{LayoutGateway, PersistError};
use crate::update::update;

/// Serializes gateway writes and remembers the newest revision written.
///
/// Every save, worker or flush, holds the lock for the whole write, and a
/// revision older than the last one written is never written.
#[derive(Debug, Clone, Default)]
struct SaveGuard {
    last_written: Arc<Mutex<u64>>,
}

impl SaveGuard {
    fn lock(&self) -> MutexGuard<'_, u64> {
        match self.last_written.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write `layout` as `revision` unless something newer is already stored.
    ///
    /// Returns `Ok(false)` when the save was superseded.
    fn save(
        &self,
        gateway: &dyn LayoutGateway,
        revision: u64,
        layout: &Container,
    ) -> Result<bool, PersistError> {
        let mut last_written = self.lock();
        if revision <= *last_written {
            tracing::debug!(
                "Save of revision {} superseded by revision {}",
                revision,
                *last_written
            );
            return Ok(false);
        }
        gateway.save(layout)?;
        *last_written = revision;
        Ok(true)
    }
}

/// Single debounce timer: each request restarts the quiet period, and only the
/// newest revision is reported once it elapses
fn spawn_save_timer(msg_tx: Sender<Msg>) -> Sender<(u64, Duration)> {
    let (timer_tx, timer_rx) = mpsc::channel::<(u64, Duration)>();
    std::thread::spawn(move || {
        while let Ok((mut revision, delay)) = timer_rx.recv() {
            let mut deadline = Instant::now() + delay;
            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                match timer_rx.recv_timeout(deadline - now) {
                    Ok((newer, delay)) => {
                        revision = newer;
                        deadline = Instant::now() + delay;
                    }
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            if msg_tx
                .send(Msg::Persist(PersistMsg::SaveReady { revision }))
                .is_err()
            {
                return;
            }
        }
    });
    timer_tx
}

/// One dashboard session: the authoritative tree plus its persistence gateway
pub struct Session {
    model: DashboardModel,
    gateway: Arc<dyn LayoutGateway>,
    saves: SaveGuard,
    timer_tx: Sender<(u64, Duration)>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl Session {
    pub fn new(model: DashboardModel, gateway: Arc<dyn LayoutGateway>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let timer_tx = spawn_save_timer(msg_tx.clone());
        Self {
            model,
            gateway,
            saves: SaveGuard::default(),
            timer_tx,
            msg_tx,
            msg_rx,
        }
    }

    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    /// Kick off the initial load on a worker thread
    pub fn start(&self) {
        self.process_cmd(Cmd::LoadLayout);
    }

    /// Load the stored tree on the calling thread
    pub fn load_blocking(&mut self) -> bool {
        let result = self.gateway.load().map_err(|e| e.to_string());
        self.dispatch(Msg::Persist(PersistMsg::Loaded(result)))
    }

    /// Run one message through the reducer and execute the resulting command.
    ///
    /// Returns whether the bindings need re-rendering.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    fn process_cmd(&self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::DebouncedSave { revision, delay_ms } => {
                if self
                    .timer_tx
                    .send((revision, Duration::from_millis(delay_ms)))
                    .is_err()
                {
                    tracing::warn!("Save timer stopped; revision {} not scheduled", revision);
                }
            }
            Cmd::SaveLayout { revision, layout } => {
                let tx = self.msg_tx.clone();
                let gateway = Arc::clone(&self.gateway);
                let saves = self.saves.clone();
                std::thread::spawn(move || {
                    let result = match saves.save(gateway.as_ref(), revision, &layout) {
                        Ok(true) => Ok(()),
                        Ok(false) => return,
                        Err(e) => Err(e.to_string()),
                    };
                    let _ = tx.send(Msg::Persist(PersistMsg::SaveCompleted { revision, result }));
                });
            }
            Cmd::LoadLayout => {
                let tx = self.msg_tx.clone();
                let gateway = Arc::clone(&self.gateway);
                std::thread::spawn(move || {
                    let result = gateway.load().map_err(|e| e.to_string());
                    let _ = tx.send(Msg::Persist(PersistMsg::Loaded(result)));
                });
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Drain messages sent back by workers without blocking
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            needs_redraw |= self.dispatch(msg);
        }
        needs_redraw
    }

    /// Wait up to `timeout` for a worker message, then drain the rest.
    ///
    /// Returns false if nothing arrived in time.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                self.process_async_messages();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Write the current tree immediately if it has unsaved changes.
    ///
    /// Waits for a worker save still in progress. Skipped until the initial
    /// load has completed. Returns whether a save was performed.
    pub fn flush(&mut self) -> Result<bool, PersistError> {
        if !self.model.persistence.loaded || !self.model.is_dirty() {
            return Ok(false);
        }
        let revision = self.model.revision;
        match self
            .saves
            .save(self.gateway.as_ref(), revision, &self.model.layout)
        {
            Ok(written) => {
                self.dispatch(Msg::Persist(PersistMsg::SaveCompleted {
                    revision,
                    result: Ok(()),
                }));
                Ok(written)
            }
            Err(e) => {
                self.dispatch(Msg::Persist(PersistMsg::SaveCompleted {
                    revision,
                    result: Err(e.to_string()),
                }));
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("revision", &self.model.revision)
            .field("persistence", &self.model.persistence)
            .finish_non_exhaustive()
    }
}
