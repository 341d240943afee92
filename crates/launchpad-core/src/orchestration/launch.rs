//! Launching installed clients through the local client service.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::JavaLaunchOptions;
use crate::transport::LocalClientService;
use crate::types::{ClientRecord, LaunchRequest, ProcessHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched(ProcessHandle),
    Failed { reason: String },
}

impl LaunchOutcome {
    pub fn pid(&self) -> Option<u32> {
        match self {
            LaunchOutcome::Launched(handle) => Some(handle.pid),
            LaunchOutcome::Failed { .. } => None,
        }
    }
}

/// Fire-and-forget launcher: the spawned process is reported once and not
/// tracked afterwards.
pub struct LaunchOrchestrator {
    service: Arc<dyn LocalClientService>,
    java: JavaLaunchOptions,
}

impl LaunchOrchestrator {
    pub fn new(service: Arc<dyn LocalClientService>, java: JavaLaunchOptions) -> Self {
        Self { service, java }
    }

    pub fn java_options(&self) -> &JavaLaunchOptions {
        &self.java
    }

    pub async fn launch(&self, client: &ClientRecord) -> LaunchOutcome {
        self.launch_named(&client.name).await
    }

    pub async fn launch_named(&self, name: &str) -> LaunchOutcome {
        let request = LaunchRequest {
            name: name.to_string(),
            java_args: self.java.java_args(),
        };

        match self.service.launch(&request).await {
            Ok(handle) => {
                info!(client = %name, pid = handle.pid, "client launched");
                LaunchOutcome::Launched(handle)
            }
            Err(err) => {
                error!(client = %name, error = %err, "client launch failed");
                LaunchOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
