#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use launchpad_core::error::{TransportError, TransportResult};
use launchpad_core::transport::{LocalClientService, ModRegistryService, SearchQuery};
use launchpad_core::types::{
    ClientKind, ClientRecord, HealthStatus, InstallAck, InstallRequest, LaunchRequest,
    ModProject, ProcessHandle, SearchHit, SearchResponse, Timestamp,
};

pub const FAKE_PID: u32 = 4321;

/// A scripted service response, optionally delayed.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub delay: Duration,
    pub result: Result<T, String>,
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(value),
        }
    }

    pub fn fail(reason: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(reason.to_string()),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn resolve(self) -> TransportResult<T> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.map_err(TransportError::Other)
    }
}

#[derive(Default)]
struct ClientServiceState {
    scans: VecDeque<Reply<Vec<ClientRecord>>>,
    installed: Vec<ClientRecord>,
    install_reply: Option<Reply<InstallAck>>,
    launch_reply: Option<Reply<ProcessHandle>>,
    list_installed_fails: bool,
    healthy: bool,
    scan_calls: usize,
    installed_calls: usize,
    install_requests: Vec<InstallRequest>,
    launch_requests: Vec<LaunchRequest>,
}

/// In-memory local client service that records every call.
pub struct FakeClientService {
    state: Mutex<ClientServiceState>,
}

impl FakeClientService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ClientServiceState {
                healthy: true,
                ..ClientServiceState::default()
            }),
        })
    }

    pub fn push_scan(&self, reply: Reply<Vec<ClientRecord>>) {
        self.state.lock().unwrap().scans.push_back(reply);
    }

    pub fn set_installed(&self, clients: Vec<ClientRecord>) {
        self.state.lock().unwrap().installed = clients;
    }

    pub fn set_install_reply(&self, reply: Reply<InstallAck>) {
        self.state.lock().unwrap().install_reply = Some(reply);
    }

    pub fn set_launch_reply(&self, reply: Reply<ProcessHandle>) {
        self.state.lock().unwrap().launch_reply = Some(reply);
    }

    pub fn fail_list_installed(&self, fail: bool) {
        self.state.lock().unwrap().list_installed_fails = fail;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unwrap().healthy = healthy;
    }

    pub fn scan_calls(&self) -> usize {
        self.state.lock().unwrap().scan_calls
    }

    pub fn installed_calls(&self) -> usize {
        self.state.lock().unwrap().installed_calls
    }

    pub fn install_requests(&self) -> Vec<InstallRequest> {
        self.state.lock().unwrap().install_requests.clone()
    }

    pub fn launch_requests(&self) -> Vec<LaunchRequest> {
        self.state.lock().unwrap().launch_requests.clone()
    }
}

#[async_trait]
impl LocalClientService for FakeClientService {
    async fn health(&self) -> TransportResult<HealthStatus> {
        let healthy = self.state.lock().unwrap().healthy;
        Ok(HealthStatus {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            message: String::new(),
        })
    }

    async fn scan(&self) -> TransportResult<Vec<ClientRecord>> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.scan_calls += 1;
            state
                .scans
                .pop_front()
                .unwrap_or_else(|| Reply::ok(Vec::new()))
        };
        reply.resolve().await
    }

    async fn list_installed(&self) -> TransportResult<Vec<ClientRecord>> {
        let mut state = self.state.lock().unwrap();
        state.installed_calls += 1;
        if state.list_installed_fails {
            return Err(TransportError::Other("installed list unavailable".to_string()));
        }
        Ok(state.installed.clone())
    }

    async fn install(&self, request: &InstallRequest) -> TransportResult<InstallAck> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.install_requests.push(request.clone());
            state.install_reply.clone().unwrap_or_else(|| {
                Reply::ok(InstallAck {
                    message: format!("Client {} installed successfully", request.name),
                    path: Some(format!("/clients/{}/{}.jar", request.name, request.name)),
                })
            })
        };
        let ack = reply.resolve().await?;

        let mut installed = ClientRecord::new(request.name.clone(), request.kind)
            .with_version(request.version.clone())
            .with_installed_at(Timestamp::new("2024-06-01T12:00:00"));
        if let Some(path) = &ack.path {
            installed = installed.with_path(path.clone());
        }
        let mut state = self.state.lock().unwrap();
        state.installed.retain(|c| c.name != request.name);
        state.installed.push(installed);
        Ok(ack)
    }

    async fn launch(&self, request: &LaunchRequest) -> TransportResult<ProcessHandle> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.launch_requests.push(request.clone());
            state
                .launch_reply
                .clone()
                .unwrap_or_else(|| Reply::ok(ProcessHandle { pid: FAKE_PID }))
        };
        reply.resolve().await
    }
}

#[derive(Default)]
struct ModRegistryState {
    replies: VecDeque<Reply<SearchResponse>>,
    queries: Vec<SearchQuery>,
    projects: HashMap<String, ModProject>,
    project_requests: Vec<String>,
}

/// In-memory mod registry that records every query.
pub struct FakeModRegistry {
    state: Mutex<ModRegistryState>,
}

impl FakeModRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ModRegistryState::default()),
        })
    }

    pub fn push_reply(&self, reply: Reply<SearchResponse>) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn add_project(&self, project: ModProject) {
        self.state
            .lock()
            .unwrap()
            .projects
            .insert(project.id.clone(), project);
    }

    pub fn project_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().project_requests.clone()
    }
}

#[async_trait]
impl ModRegistryService for FakeModRegistry {
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.queries.push(query.clone());
            state
                .replies
                .pop_front()
                .unwrap_or_else(|| Reply::ok(SearchResponse::default()))
        };
        reply.resolve().await
    }

    async fn project(&self, id: &str) -> TransportResult<ModProject> {
        let mut state = self.state.lock().unwrap();
        state.project_requests.push(id.to_string());
        state
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                endpoint: format!("api/modrinth/project/{id}"),
                status: 404,
            })
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn vanilla_client() -> ClientRecord {
    ClientRecord::new("VanillaClient", ClientKind::Jar)
        .with_filename("vanilla.jar")
        .with_path("/app/clients/vanilla.jar")
        .with_version("1.20.1")
        .with_size(10_485_760)
}

pub fn feather_client() -> ClientRecord {
    ClientRecord::new("Feather", ClientKind::Mod)
        .with_filename("feather.jar")
        .with_path("/app/clients/feather.jar")
}

pub fn hits(titles: &[&str]) -> SearchResponse {
    SearchResponse {
        hits: titles
            .iter()
            .map(|title| SearchHit {
                title: title.to_string(),
                description: String::new(),
                downloads: 100,
                date_modified: Some(Timestamp::new("2024-01-01")),
                icon_url: None,
                project_id: None,
                slug: None,
                author: None,
            })
            .collect(),
        total_hits: Some(titles.len() as u64),
    }
}

pub fn sodium_project() -> ModProject {
    ModProject {
        id: "AANobbMI".to_string(),
        slug: "sodium".to_string(),
        title: "Sodium".to_string(),
        description: "Rendering engine".to_string(),
        body: String::new(),
        project_type: Some("mod".to_string()),
        downloads: 5000,
        followers: 40,
        categories: vec!["optimization".to_string()],
        game_versions: vec!["1.20.1".to_string()],
        loaders: vec!["fabric".to_string()],
        updated: Some(Timestamp::new("2024-05-01")),
        icon_url: None,
    }
}
