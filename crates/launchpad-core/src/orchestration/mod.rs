//! Orchestrators sequencing service calls and registry updates.
//!
//! Each orchestrator catches transport failures at its boundary and turns
//! them into an outcome value plus registry state; none of them returns an
//! error to its caller.

pub mod discovery;
pub mod install;
pub mod launch;
pub mod reset;
pub mod search;

pub use discovery::{DiscoveryOrchestrator, InitialLoad, RefreshOutcome};
pub use install::{InstallOrchestrator, InstallOutcome};
pub use launch::{LaunchOrchestrator, LaunchOutcome};
pub use reset::ResetScheduler;
pub use search::{ProjectOutcome, SearchOrchestrator, SearchOutcome, SearchRequest};
