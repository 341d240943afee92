//! Delayed reset of terminal install statuses.
//!
//! At most one pending reset exists per client name. Scheduling or
//! cancelling for a name aborts whatever was pending for it, and a reset
//! that does fire only clears the status it was scheduled for.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::registry::Registry;
use crate::types::InstallStatus;

struct PendingReset {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Pending {
    next_generation: u64,
    by_name: HashMap<String, PendingReset>,
}

pub struct ResetScheduler {
    registry: Registry,
    window: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl ResetScheduler {
    pub fn new(registry: Registry, window: Duration) -> Self {
        Self {
            registry,
            window,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Clear `status` for `name` once the window elapses.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, name: &str, status: InstallStatus) {
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.by_name.remove(name) {
            previous.handle.abort();
        }

        pending.next_generation += 1;
        let generation = pending.next_generation;

        let registry = self.registry.clone();
        let shared = Arc::clone(&self.pending);
        let window = self.window;
        let key = name.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if registry.clear_status_if(&key, status) {
                debug!(client = %key, %status, "install status reset");
            }
            let mut pending = lock(&shared);
            if pending
                .by_name
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                pending.by_name.remove(&key);
            }
        });

        pending
            .by_name
            .insert(name.to_string(), PendingReset { generation, handle });
    }

    /// Abort the pending reset for `name`, if any.
    pub fn cancel(&self, name: &str) -> bool {
        match lock(&self.pending).by_name.remove(name) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        lock(&self.pending).by_name.contains_key(name)
    }
}

impl Drop for ResetScheduler {
    fn drop(&mut self) {
        for (_, entry) in lock(&self.pending).by_name.drain() {
            entry.handle.abort();
        }
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    // The map stays consistent even if a holder panicked.
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
