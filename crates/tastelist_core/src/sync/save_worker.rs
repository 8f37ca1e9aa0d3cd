//! Serialized background save queue.
//!
//! # Responsibility
//! - Run document saves on one worker thread per session.
//! - Keep a depth-one pending slot where the newest snapshot wins.
//! - Track the outcome of the latest save as `SyncStatus`.
//!
//! # Invariants
//! - Saves never overlap, so completion order equals submission order.
//! - A snapshot replaced before it was picked up is never sent.
//! - Shutdown drains the pending slot before the thread exits.
//! - A save that has started always runs to completion.

use crate::model::collection::RestaurantCollection;
use crate::model::user::UserId;
use crate::repo::document_store::DocumentStore;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "tastelist-sync";

/// Background persistence failure. Never blocks editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    pub backend: &'static str,
    pub message: String,
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to save to {} store: {}", self.backend, self.message)
    }
}

impl Error for SaveError {}

/// Observable state of the save queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing has been submitted yet.
    #[default]
    Idle,
    /// A snapshot is waiting for the worker.
    Pending,
    /// A save is in flight.
    Saving,
    /// The latest save succeeded and nothing is queued.
    Saved,
    /// The latest save failed; the next change retries with a full save.
    Failed(SaveError),
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&SaveError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Save counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub completed: u64,
    pub failed: u64,
    /// Snapshots replaced in the pending slot before being sent.
    pub superseded: u64,
}

#[derive(Default)]
struct QueueState {
    pending: Option<RestaurantCollection>,
    in_flight: bool,
    shutdown: bool,
    status: SyncStatus,
    stats: SyncStats,
}

#[derive(Default)]
struct Shared {
    state: Mutex<QueueState>,
    changed: Condvar,
}

impl Shared {
    // The lock is never held across a store call, so poisoning can only
    // come from a panic inside this module; the state stays consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, QueueState>) -> MutexGuard<'a, QueueState> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// One-thread save queue bound to a user and store.
pub struct SyncWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl SyncWorker {
    /// Starts the worker thread.
    ///
    /// # Errors
    /// - Returns the OS error when the thread cannot be spawned.
    pub fn spawn(store: Arc<dyn DocumentStore>, user_id: UserId) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&worker_shared, store.as_ref(), &user_id))?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queues a full snapshot, replacing any snapshot not yet picked up.
    pub fn submit(&self, snapshot: RestaurantCollection) {
        let mut state = self.shared.lock();
        if state.pending.replace(snapshot).is_some() {
            state.stats.superseded += 1;
            debug!("event=sync_submit module=sync status=superseded");
        }
        if !state.in_flight && !matches!(state.status, SyncStatus::Failed(_)) {
            state.status = SyncStatus::Pending;
        }
        self.shared.changed.notify_all();
    }

    pub fn status(&self) -> SyncStatus {
        self.shared.lock().status.clone()
    }

    pub fn stats(&self) -> SyncStats {
        self.shared.lock().stats
    }

    /// Blocks until nothing is queued or in flight.
    pub fn flush(&self) {
        let mut state = self.shared.lock();
        while state.pending.is_some() || state.in_flight {
            state = self.shared.wait(state);
        }
    }

    /// Drains queued work and stops the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            self.shared.changed.notify_all();
        }

        if handle.join().is_err() {
            error!("event=sync_shutdown module=sync status=error error_code=worker_panicked");
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(shared: &Shared, store: &dyn DocumentStore, user_id: &UserId) {
    info!(
        "event=sync_worker module=sync status=start backend={}",
        store.backend()
    );

    while let Some(snapshot) = next_snapshot(shared) {
        let started_at = Instant::now();
        let count = snapshot.len();
        let outcome = catch_unwind(AssertUnwindSafe(|| store.save(user_id, snapshot.as_slice())))
            .map_err(|_| "save panicked".to_string())
            .and_then(|result| result.map_err(|err| err.to_string()));

        let mut state = shared.lock();
        state.in_flight = false;
        match outcome {
            Ok(()) => {
                state.stats.completed += 1;
                state.status = if state.pending.is_some() {
                    SyncStatus::Pending
                } else {
                    SyncStatus::Saved
                };
                info!(
                    "event=collection_save module=sync status=ok backend={} count={count} duration_ms={}",
                    store.backend(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(message) => {
                state.stats.failed += 1;
                error!(
                    "event=collection_save module=sync status=error backend={} count={count} duration_ms={} error={message}",
                    store.backend(),
                    started_at.elapsed().as_millis()
                );
                state.status = SyncStatus::Failed(SaveError {
                    backend: store.backend(),
                    message,
                });
            }
        }
        shared.changed.notify_all();
    }

    info!("event=sync_worker module=sync status=stop");
}

/// Waits for the next snapshot; `None` once shut down with an empty slot.
fn next_snapshot(shared: &Shared) -> Option<RestaurantCollection> {
    let mut state = shared.lock();
    loop {
        if let Some(snapshot) = state.pending.take() {
            state.in_flight = true;
            state.status = SyncStatus::Saving;
            return Some(snapshot);
        }
        if state.shutdown {
            return None;
        }
        state = shared.wait(state);
    }
}
