//! Launchpad Core Library
//!
//! Owns the client lifecycle: discovering installable game clients,
//! installing them through the local client service, launching installed
//! clients and searching the mod registry. Frontends (CLI/TUI) issue intents
//! to the orchestrators and render snapshots of the [`registry::Registry`].

pub mod config;
pub mod context;
pub mod error;
pub mod orchestration;
pub mod registry;
pub mod transport;
pub mod types;
pub mod view;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, JavaLaunchOptions, LauncherConfig};

    // Context
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{TransportError, TransportResult};

    // Model
    pub use crate::registry::{Registry, RegistrySnapshot, SearchResults};
    pub use crate::types::{
        ClientKind, ClientRecord, InstallStatus, ModProject, ProcessHandle, SearchHit,
    };

    // Orchestration
    pub use crate::orchestration::{
        DiscoveryOrchestrator, InstallOrchestrator, InstallOutcome, LaunchOrchestrator,
        LaunchOutcome, ProjectOutcome, RefreshOutcome, SearchOrchestrator, SearchOutcome,
        SearchRequest,
    };

    // Transport
    pub use crate::transport::{HttpTransport, LocalClientService, ModRegistryService};

    // View
    pub use crate::view::{SearchView, Tab, TabView};
}
