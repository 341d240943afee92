//! Client discovery: scanning for installable files and listing installs.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::registry::{Applied, Registry};
use crate::transport::LocalClientService;

/// Result of refreshing one client namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The set was replaced with `count` records.
    Applied { count: usize },
    /// A newer response was already applied; this one was dropped.
    Stale,
    /// The service call failed; the previous set is unchanged.
    Failed { reason: String },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

/// Outcomes of the start-up load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialLoad {
    pub available: RefreshOutcome,
    pub installed: RefreshOutcome,
}

#[derive(Clone)]
pub struct DiscoveryOrchestrator {
    service: Arc<dyn LocalClientService>,
    registry: Registry,
}

impl DiscoveryOrchestrator {
    pub fn new(service: Arc<dyn LocalClientService>, registry: Registry) -> Self {
        Self { service, registry }
    }

    /// Scan for installable clients and replace the Available set.
    pub async fn scan(&self) -> RefreshOutcome {
        let ticket = self.registry.begin_scan();
        match self.service.scan().await {
            Ok(clients) => {
                let count = clients.len();
                match self.registry.finish_scan(ticket, Some(clients)) {
                    Applied::Yes => {
                        info!(count, "scan complete");
                        RefreshOutcome::Applied { count }
                    }
                    Applied::Stale => RefreshOutcome::Stale,
                }
            }
            Err(err) => {
                self.registry.finish_scan(ticket, None);
                error!(error = %err, "client scan failed");
                RefreshOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Re-list installed clients and replace the Installed set.
    pub async fn refresh_installed(&self) -> RefreshOutcome {
        match self.service.list_installed().await {
            Ok(clients) => {
                let count = clients.len();
                self.registry.replace_installed(clients);
                info!(count, "installed clients refreshed");
                RefreshOutcome::Applied { count }
            }
            Err(err) => {
                warn!(error = %err, "failed to list installed clients");
                RefreshOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Scan and list installed clients concurrently.
    pub async fn load_initial(&self) -> InitialLoad {
        let (available, installed) = tokio::join!(self.scan(), self.refresh_installed());
        InitialLoad {
            available,
            installed,
        }
    }

    /// Whether the local client service answers its health probe.
    pub async fn health(&self) -> bool {
        match self.service.health().await {
            Ok(status) => status.is_healthy(),
            Err(err) => {
                warn!(error = %err, "local client service health probe failed");
                false
            }
        }
    }
}
