//! Application context for unified dependency injection.

use std::sync::Arc;

use crate::config::LauncherConfig;
use crate::orchestration::{
    DiscoveryOrchestrator, InstallOrchestrator, LaunchOrchestrator, SearchOrchestrator,
};
use crate::registry::Registry;
use crate::transport::{HttpTransport, LocalClientService, ModRegistryService};

/// Shared services and orchestrators over one [`Registry`].
///
/// Frontends (CLI/TUI) create this once and issue intents through it.
pub struct AppContext {
    config: LauncherConfig,
    registry: Registry,
    discovery: DiscoveryOrchestrator,
    installer: InstallOrchestrator,
    launcher: LaunchOrchestrator,
    search: SearchOrchestrator,
}

impl AppContext {
    /// Build a context talking HTTP to the configured service and registry.
    pub fn from_config(config: LauncherConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(HttpTransport::from_config(&config)?);
        Ok(Self::with_services(config, transport.clone(), transport))
    }

    /// Build a context over explicit service implementations (for testing).
    pub fn with_services(
        config: LauncherConfig,
        clients: Arc<dyn LocalClientService>,
        mods: Arc<dyn ModRegistryService>,
    ) -> Self {
        let registry = Registry::new();
        Self {
            discovery: DiscoveryOrchestrator::new(Arc::clone(&clients), registry.clone()),
            installer: InstallOrchestrator::new(
                Arc::clone(&clients),
                registry.clone(),
                config.install.status_reset_window(),
            ),
            launcher: LaunchOrchestrator::new(clients, config.launch.clone()),
            search: SearchOrchestrator::new(mods, registry.clone(), config.registry.search_limit),
            registry,
            config,
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn discovery(&self) -> &DiscoveryOrchestrator {
        &self.discovery
    }

    pub fn installer(&self) -> &InstallOrchestrator {
        &self.installer
    }

    pub fn launcher(&self) -> &LaunchOrchestrator {
        &self.launcher
    }

    pub fn search(&self) -> &SearchOrchestrator {
        &self.search
    }
}
