use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{ClientRecord, InstallStatus, SearchHit};

/// Immutable view of the registry at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub available: Vec<ClientRecord>,
    pub installed: Vec<ClientRecord>,
    pub install_status: BTreeMap<String, InstallStatus>,
    pub scans_in_flight: usize,
    pub search: SearchState,
    #[serde(skip)]
    pub(crate) scan_tickets: TicketCounter,
    #[serde(skip)]
    pub(crate) search_tickets: TicketCounter,
}

impl RegistrySnapshot {
    pub fn status_of(&self, name: &str) -> Option<InstallStatus> {
        self.install_status.get(name).copied()
    }

    pub fn is_scanning(&self) -> bool {
        self.scans_in_flight > 0
    }

    pub fn find_available(&self, name: &str) -> Option<&ClientRecord> {
        self.available.iter().find(|c| c.name == name)
    }

    pub fn find_installed(&self, name: &str) -> Option<&ClientRecord> {
        self.installed.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TicketCounter {
    pub(crate) issued: u64,
    pub(crate) applied: u64,
}

/// Mod search state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Most recently issued query.
    pub last_query: Option<String>,
    pub results: SearchResults,
    pub in_flight: usize,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Outcome of the most recent applied search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SearchResults {
    #[default]
    NeverSearched,
    Hits(Vec<SearchHit>),
    Failed { reason: String },
}

impl SearchResults {
    /// Result list; empty unless the last search succeeded.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchResults::Hits(hits) => hits,
            SearchResults::NeverSearched | SearchResults::Failed { .. } => &[],
        }
    }
}
