//! Client registry model
//!
//! The single owner of session state: the Available and Installed client
//! sets, the per-name install status map and the mod search state. Every
//! mutation is one atomic publish on a `watch` channel, so readers always
//! see a whole snapshot and never a half-applied update.
//!
//! Scan and search responses carry a [`RequestTicket`]; a response older
//! than the last one applied for its namespace is discarded.

mod snapshot;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::types::{ClientRecord, InstallStatus, SearchHit};

pub use snapshot::{RegistrySnapshot, SearchResults, SearchState};

/// Monotonic sequence number attached to a scan or search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Whether a completed response was applied to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Yes,
    /// A newer response for the same namespace was already applied.
    Stale,
}

/// Shared handle to the registry model.
#[derive(Debug, Clone)]
pub struct Registry {
    state: Arc<watch::Sender<RegistrySnapshot>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (state, _) = watch::channel(RegistrySnapshot::default());
        Self {
            state: Arc::new(state),
        }
    }

    // ── Readers ─────────────────────────────────────────

    /// Copy of the current state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<RegistrySnapshot> {
        self.state.subscribe()
    }

    pub fn available_clients(&self) -> Vec<ClientRecord> {
        self.state.borrow().available.clone()
    }

    pub fn installed_clients(&self) -> Vec<ClientRecord> {
        self.state.borrow().installed.clone()
    }

    pub fn install_status(&self, name: &str) -> Option<InstallStatus> {
        self.state.borrow().status_of(name)
    }

    // ── Mutators ────────────────────────────────────────

    /// Replace the Available set wholesale.
    ///
    /// Available records never carry `installed_at`; it is stripped if present.
    pub fn replace_available(&self, clients: Vec<ClientRecord>) {
        let clients = strip_installed_at(clients);
        self.state.send_modify(|state| state.available = clients);
    }

    /// Replace the Installed set wholesale.
    pub fn replace_installed(&self, clients: Vec<ClientRecord>) {
        self.state.send_modify(|state| state.installed = clients);
    }

    /// Set or clear (`None`) the install status of a client.
    pub fn set_status(&self, name: &str, status: Option<InstallStatus>) {
        self.state.send_modify(|state| match status {
            Some(status) => {
                state.install_status.insert(name.to_string(), status);
            }
            None => {
                state.install_status.remove(name);
            }
        });
    }

    /// Mark `name` as installing unless it already is.
    ///
    /// Returns `false` (and publishes nothing) when an install is in flight.
    pub fn try_begin_install(&self, name: &str) -> bool {
        self.state.send_if_modified(|state| {
            if state.status_of(name) == Some(InstallStatus::Installing) {
                return false;
            }
            state
                .install_status
                .insert(name.to_string(), InstallStatus::Installing);
            true
        })
    }

    /// Clear the status of `name` only if it still equals `expected`.
    pub fn clear_status_if(&self, name: &str, expected: InstallStatus) -> bool {
        self.state.send_if_modified(|state| {
            if state.status_of(name) != Some(expected) {
                return false;
            }
            state.install_status.remove(name);
            true
        })
    }

    // ── Scan ────────────────────────────────────────────

    /// Record a scan request going out.
    pub fn begin_scan(&self) -> RequestTicket {
        let mut ticket = RequestTicket(0);
        self.state.send_modify(|state| {
            state.scan_tickets.issued += 1;
            state.scans_in_flight += 1;
            ticket = RequestTicket(state.scan_tickets.issued);
        });
        ticket
    }

    /// Complete a scan. `None` means the scan failed and the Available set
    /// is left as it was.
    pub fn finish_scan(&self, ticket: RequestTicket, clients: Option<Vec<ClientRecord>>) -> Applied {
        let clients = clients.map(strip_installed_at);
        let mut applied = Applied::Yes;
        self.state.send_modify(|state| {
            state.scans_in_flight = state.scans_in_flight.saturating_sub(1);
            let Some(clients) = clients else {
                return;
            };
            if ticket.0 <= state.scan_tickets.applied {
                applied = Applied::Stale;
                return;
            }
            state.scan_tickets.applied = ticket.0;
            state.available = clients;
        });
        if applied == Applied::Stale {
            warn!(ticket = ticket.0, "discarding stale scan response");
        }
        applied
    }

    // ── Search ──────────────────────────────────────────

    /// Record a search request going out.
    pub fn begin_search(&self, query: &str) -> RequestTicket {
        let mut ticket = RequestTicket(0);
        self.state.send_modify(|state| {
            state.search_tickets.issued += 1;
            state.search.in_flight += 1;
            state.search.last_query = Some(query.to_string());
            ticket = RequestTicket(state.search_tickets.issued);
        });
        debug!(ticket = ticket.0, query, "search started");
        ticket
    }

    /// Complete a search with its hits or a failure reason.
    pub fn finish_search(
        &self,
        ticket: RequestTicket,
        outcome: Result<Vec<SearchHit>, String>,
    ) -> Applied {
        let mut applied = Applied::Yes;
        self.state.send_modify(|state| {
            state.search.in_flight = state.search.in_flight.saturating_sub(1);
            if ticket.0 <= state.search_tickets.applied {
                applied = Applied::Stale;
                return;
            }
            state.search_tickets.applied = ticket.0;
            state.search.results = match outcome {
                Ok(hits) => SearchResults::Hits(hits),
                Err(reason) => SearchResults::Failed { reason },
            };
        });
        if applied == Applied::Stale {
            warn!(ticket = ticket.0, "discarding stale search response");
        }
        applied
    }
}

fn strip_installed_at(mut clients: Vec<ClientRecord>) -> Vec<ClientRecord> {
    for client in clients.iter_mut().filter(|c| c.installed_at.is_some()) {
        warn!(client = %client.name, "available client carried installed_at; dropping it");
        client.installed_at = None;
    }
    clients
}
