//! Client installation with per-name status tracking.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use super::discovery::DiscoveryOrchestrator;
use super::reset::ResetScheduler;
use crate::registry::Registry;
use crate::transport::LocalClientService;
use crate::types::{ClientRecord, InstallRequest, InstallStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The service installed the client.
    Installed { message: String },
    /// An install for this name was already running; nothing was sent.
    AlreadyInstalling,
    /// The install request failed; status is `error` for the reset window.
    Failed { reason: String },
}

pub struct InstallOrchestrator {
    service: Arc<dyn LocalClientService>,
    registry: Registry,
    discovery: DiscoveryOrchestrator,
    resets: ResetScheduler,
}

impl InstallOrchestrator {
    pub fn new(
        service: Arc<dyn LocalClientService>,
        registry: Registry,
        status_reset_window: Duration,
    ) -> Self {
        Self {
            discovery: DiscoveryOrchestrator::new(Arc::clone(&service), registry.clone()),
            resets: ResetScheduler::new(registry.clone(), status_reset_window),
            service,
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Install `client`.
    ///
    /// Status moves `installing → success|error` and back to none after the
    /// reset window. A call for a name that is already installing is a no-op.
    pub async fn install(&self, client: &ClientRecord) -> InstallOutcome {
        let name = client.name.as_str();
        if !self.registry.try_begin_install(name) {
            debug!(client = %name, "install already in progress; ignoring");
            return InstallOutcome::AlreadyInstalling;
        }
        self.resets.cancel(name);

        let request = InstallRequest::from(client);
        info!(client = %name, kind = %request.kind, version = %request.version, "installing client");

        match self.service.install(&request).await {
            Ok(ack) => {
                self.finish(name, InstallStatus::Success);
                info!(client = %name, "client installed");
                // A failed re-list keeps the previous Installed set; the install
                // itself still succeeded.
                self.discovery.refresh_installed().await;
                InstallOutcome::Installed {
                    message: ack.message,
                }
            }
            Err(err) => {
                self.finish(name, InstallStatus::Error);
                error!(client = %name, error = %err, "client install failed");
                InstallOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn finish(&self, name: &str, status: InstallStatus) {
        self.registry.set_status(name, Some(status));
        self.resets.schedule(name, status);
    }
}
