//! reqwest-backed implementation of both service traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{LocalClientService, ModRegistryService, SearchQuery};
use crate::config::LauncherConfig;
use crate::error::{TransportError, TransportResult};
use crate::types::{
    ClientListing, ClientRecord, HealthStatus, InstallAck, InstallRequest, LaunchRequest,
    LaunchResponse, ModProject, ProcessHandle, SearchResponse,
};

const USER_AGENT: &str = concat!("launchpad/", env!("CARGO_PKG_VERSION"));

const HEALTH_PATH: &str = "api/health";
const SCAN_PATH: &str = "api/clients/scan";
const INSTALLED_PATH: &str = "api/clients/installed";
const INSTALL_PATH: &str = "api/clients/install";
const LAUNCH_PATH: &str = "api/clients/launch";
const SEARCH_PATH: &str = "api/modrinth/search";
const PROJECT_PATH: &str = "api/modrinth/project/";

/// HTTP client for the local client service and the mod registry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    service_base: Url,
    registry_base: Url,
}

impl HttpTransport {
    pub fn new(service_base: Url, registry_base: Url, timeout: Duration) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                endpoint: service_base.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            service_base: as_directory(service_base),
            registry_base: as_directory(registry_base),
        })
    }

    pub fn from_config(config: &LauncherConfig) -> anyhow::Result<Self> {
        let transport = Self::new(
            config.service_url()?,
            config.registry_url()?,
            config.request_timeout(),
        )?;
        Ok(transport)
    }

    pub fn service_base(&self) -> &Url {
        &self.service_base
    }

    pub fn registry_base(&self) -> &Url {
        &self.registry_base
    }

    fn endpoint(base: &Url, path: &str) -> TransportResult<Url> {
        base.join(path)
            .map_err(|e| TransportError::InvalidUrl(format!("{base}{path}: {e}")))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> TransportResult<T> {
        debug!(endpoint, "sending request");
        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get_service<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let url = Self::endpoint(&self.service_base, path)?;
        self.send_json(self.client.get(url), path).await
    }

    async fn post_service<B, T>(&self, path: &str, body: &B) -> TransportResult<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = Self::endpoint(&self.service_base, path)?;
        self.send_json(self.client.post(url).json(body), path).await
    }
}

/// Make relative joins append to the base path instead of replacing its
/// last segment.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl LocalClientService for HttpTransport {
    async fn health(&self) -> TransportResult<HealthStatus> {
        self.get_service(HEALTH_PATH).await
    }

    async fn scan(&self) -> TransportResult<Vec<ClientRecord>> {
        let listing: ClientListing = self.get_service(SCAN_PATH).await?;
        Ok(listing.clients)
    }

    async fn list_installed(&self) -> TransportResult<Vec<ClientRecord>> {
        let listing: ClientListing = self.get_service(INSTALLED_PATH).await?;
        Ok(listing.clients)
    }

    async fn install(&self, request: &InstallRequest) -> TransportResult<InstallAck> {
        self.post_service(INSTALL_PATH, request).await
    }

    async fn launch(&self, request: &LaunchRequest) -> TransportResult<ProcessHandle> {
        let response: LaunchResponse = self.post_service(LAUNCH_PATH, request).await?;
        Ok(ProcessHandle { pid: response.pid })
    }
}

#[async_trait]
impl ModRegistryService for HttpTransport {
    async fn search(&self, query: &SearchQuery) -> TransportResult<SearchResponse> {
        let url = Self::endpoint(&self.registry_base, SEARCH_PATH)?;
        self.send_json(self.client.get(url).query(query), SEARCH_PATH)
            .await
    }

    async fn project(&self, id: &str) -> TransportResult<ModProject> {
        let mut url = Self::endpoint(&self.registry_base, PROJECT_PATH)?;
        // One segment, so the id is percent-encoded.
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl(self.registry_base.to_string()))?
            .pop_if_empty()
            .push(id);
        let endpoint = format!("{PROJECT_PATH}{id}");
        self.send_json(self.client.get(url), &endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_append_to_base_path() {
        let base = as_directory(Url::parse("http://localhost:8001/launcher").unwrap());
        let url = HttpTransport::endpoint(&base, SCAN_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/launcher/api/clients/scan");
    }

    #[test]
    fn endpoints_on_root_base() {
        let base = as_directory(Url::parse("http://localhost:8001").unwrap());
        let url = HttpTransport::endpoint(&base, LAUNCH_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/api/clients/launch");
    }

    #[test]
    fn project_ids_are_a_single_segment() {
        let base = as_directory(Url::parse("http://localhost:8001").unwrap());
        let mut url = HttpTransport::endpoint(&base, PROJECT_PATH).unwrap();
        url.path_segments_mut().unwrap().pop_if_empty().push("a/b");
        assert_eq!(
            url.as_str(),
            "http://localhost:8001/api/modrinth/project/a%2Fb"
        );
    }

    #[test]
    fn from_config_uses_service_url_for_registry_by_default() {
        let transport = HttpTransport::from_config(&LauncherConfig::default()).unwrap();
        assert_eq!(transport.service_base(), transport.registry_base());
    }
}
