//! Boundary to the two external services.
//!
//! The orchestrators only see these traits, so tests swap in in-memory
//! fakes and frontends use [`HttpTransport`].

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportResult;
use crate::types::{
    ClientRecord, HealthStatus, InstallAck, InstallRequest, LaunchRequest, ModProject,
    ProcessHandle, SearchResponse,
};

pub use http::HttpTransport;

/// Local service that scans for, installs and launches clients.
#[async_trait]
pub trait LocalClientService: Send + Sync {
    async fn health(&self) -> TransportResult<HealthStatus>;

    /// Installable client files currently on disk.
    async fn scan(&self) -> TransportResult<Vec<ClientRecord>>;

    /// Clients the service has recorded as installed.
    async fn list_installed(&self) -> TransportResult<Vec<ClientRecord>>;

    async fn install(&self, request: &InstallRequest) -> TransportResult<InstallAck>;

    async fn launch(&self, request: &LaunchRequest) -> TransportResult<ProcessHandle>;
}

/// External mod/shader/modpack search index.
#[async_trait]
pub trait ModRegistryService: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse>;

    /// Details of one project, by id or slug.
    async fn project(&self, id: &str) -> TransportResult<ModProject>;
}

/// Query parameters sent to the registry search endpoint.
///
/// The service turns `categories` and `version` into registry facets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub limit: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, limit: u8) -> Self {
        Self {
            query: query.into(),
            limit,
            categories: None,
            version: None,
        }
    }

    /// Attach category and game-version filters; blank values are dropped.
    pub fn with_filters(mut self, category: Option<&str>, game_version: Option<&str>) -> Self {
        self.categories = non_blank(category);
        self.version = non_blank(game_version);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let query = SearchQuery::new("shader", 20).with_filters(None, Some("  "));
        assert!(query.categories.is_none());
        assert!(query.version.is_none());
    }

    #[test]
    fn filters_are_trimmed() {
        let query = SearchQuery::new("sodium", 20).with_filters(Some(" optimization"), Some("1.20.1 "));
        assert_eq!(query.categories.as_deref(), Some("optimization"));
        assert_eq!(query.version.as_deref(), Some("1.20.1"));
    }
}
