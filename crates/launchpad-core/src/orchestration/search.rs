//! Mod registry search.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::registry::{Applied, Registry};
use crate::transport::{ModRegistryService, SearchQuery};
use crate::types::ModProject;

/// A search intent with optional filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub category: Option<String>,
    pub game_version: Option<String>,
    pub limit: Option<u8>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_game_version(mut self, version: impl Into<String>) -> Self {
        self.game_version = Some(version.into());
        self
    }

    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent and state is untouched.
    EmptyQuery,
    Completed { hits: usize },
    /// A newer search completed first; this response was dropped.
    Stale,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    /// Blank id; nothing was sent.
    EmptyId,
    Found(ModProject),
    Failed { reason: String },
}

pub struct SearchOrchestrator {
    service: Arc<dyn ModRegistryService>,
    registry: Registry,
    default_limit: u8,
}

impl SearchOrchestrator {
    pub fn new(service: Arc<dyn ModRegistryService>, registry: Registry, default_limit: u8) -> Self {
        Self {
            service,
            registry,
            default_limit,
        }
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        self.search_with(SearchRequest::new(query)).await
    }

    pub async fn search_with(&self, request: SearchRequest) -> SearchOutcome {
        let text = request.query.trim();
        if text.is_empty() {
            debug!("ignoring blank search query");
            return SearchOutcome::EmptyQuery;
        }

        let query = SearchQuery::new(text, request.limit.unwrap_or(self.default_limit))
            .with_filters(request.category.as_deref(), request.game_version.as_deref());

        let ticket = self.registry.begin_search(text);
        let (outcome, applied) = match self.service.search(&query).await {
            Ok(response) => {
                let hits = response.hits.len();
                let applied = self.registry.finish_search(ticket, Ok(response.hits));
                (SearchOutcome::Completed { hits }, applied)
            }
            Err(err) => {
                error!(query = %text, error = %err, "mod search failed");
                let reason = err.to_string();
                let applied = self.registry.finish_search(ticket, Err(reason.clone()));
                (SearchOutcome::Failed { reason }, applied)
            }
        };

        match applied {
            Applied::Stale => SearchOutcome::Stale,
            Applied::Yes => {
                if let SearchOutcome::Completed { hits } = outcome {
                    info!(query = %text, hits, "mod search complete");
                }
                outcome
            }
        }
    }

    /// Look up one project by id or slug. Search state is untouched.
    pub async fn project(&self, id: &str) -> ProjectOutcome {
        let id = id.trim();
        if id.is_empty() {
            debug!("ignoring blank project id");
            return ProjectOutcome::EmptyId;
        }

        match self.service.project(id).await {
            Ok(project) => {
                info!(project = %project.slug, "fetched project details");
                ProjectOutcome::Found(project)
            }
            Err(err) => {
                error!(project = %id, error = %err, "project lookup failed");
                ProjectOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
