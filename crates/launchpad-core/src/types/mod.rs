//! Shared data model for client records, install status and search hits.
//!
//! Field names follow the local client service wire format, so these types
//! are decoded straight from service responses.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version reported when a client does not carry one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Icon reference used when a search hit has no icon.
pub const PLACEHOLDER_ICON: &str = "placeholder-mod.png";

/// Kind of installable package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// A plain runnable client jar.
    Jar,
    /// A mod that loads into an existing game install.
    Mod,
    /// An installer jar.
    #[default]
    Installer,
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::Jar => write!(f, "jar"),
            ClientKind::Mod => write!(f, "mod"),
            ClientKind::Installer => write!(f, "installer"),
        }
    }
}

/// Timestamp as reported by a remote service.
///
/// Services disagree on format (RFC 3339, naive ISO datetimes, bare dates),
/// so the raw text is kept and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into UTC. Naive values are taken as UTC; bare dates as midnight.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Calendar date for display, falling back to the raw text.
    pub fn date_label(&self) -> String {
        self.to_utc()
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.to_rfc3339())
    }
}

/// A client package, either discovered by a scan or recorded as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, alias = "installed_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ClientKind,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<Timestamp>,
}

fn default_version() -> String {
    UNKNOWN_VERSION.to_string()
}

impl ClientRecord {
    pub fn new(name: impl Into<String>, kind: ClientKind) -> Self {
        Self {
            name: name.into(),
            filename: String::new(),
            path: String::new(),
            original_path: None,
            kind,
            version: default_version(),
            size: 0,
            warning: None,
            min_version: None,
            modified: None,
            installed_at: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>, min_version: Option<String>) -> Self {
        self.warning = Some(warning.into());
        self.min_version = min_version;
        self
    }

    pub fn with_installed_at(mut self, installed_at: Timestamp) -> Self {
        self.installed_at = Some(installed_at);
        self
    }

    pub fn is_installed(&self) -> bool {
        self.installed_at.is_some()
    }

    /// Size in MiB, as shown on client cards.
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }

    /// Version to send with an install request; blank versions become `unknown`.
    pub fn version_or_unknown(&self) -> &str {
        if self.version.trim().is_empty() {
            UNKNOWN_VERSION
        } else {
            &self.version
        }
    }
}

/// Per-client install status. Absence from the status map means "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    Installing,
    Success,
    Error,
}

impl InstallStatus {
    /// `Success` and `Error` revert to none after the reset window.
    pub fn is_terminal(self) -> bool {
        matches!(self, InstallStatus::Success | InstallStatus::Error)
    }
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallStatus::Installing => write!(f, "installing"),
            InstallStatus::Success => write!(f, "success"),
            InstallStatus::Error => write!(f, "error"),
        }
    }
}

/// A single project returned by the mod registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl SearchHit {
    pub fn icon_or_placeholder(&self) -> &str {
        self.icon_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_ICON)
    }
}

/// Full details of a mod registry project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModProject {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Long-form description, usually markdown.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Identifier of a process started by the local client service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessHandle {
    pub pid: u32,
}

// =============================================================================
// Wire payloads
// =============================================================================

/// Body of an install request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRequest {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ClientKind,
    pub version: String,
}

impl From<&ClientRecord> for InstallRequest {
    fn from(client: &ClientRecord) -> Self {
        Self {
            name: client.name.clone(),
            path: client.path.clone(),
            kind: client.kind,
            version: client.version_or_unknown().to_string(),
        }
    }
}

/// Acknowledgement returned by a successful install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Body of a launch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub name: String,
    pub java_args: Vec<String>,
}

/// Response of a successful launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub pid: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope of the scan and list-installed endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListing {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Envelope of the mod registry search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub total_hits: Option<u64>,
}

/// Health probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_record_defaults_missing_fields() {
        let json = r#"{"name": "VanillaClient", "type": "jar", "size": 10485760}"#;
        let record: ClientRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "VanillaClient");
        assert_eq!(record.kind, ClientKind::Jar);
        assert_eq!(record.version, "unknown");
        assert_eq!(record.size, 10_485_760);
        assert!(record.installed_at.is_none());
        assert!((record.size_mib() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn installed_record_accepts_installed_path() {
        let json = r#"{
            "name": "Feather",
            "installed_path": "/home/u/.minecraft_launcher/clients/Feather/feather.jar",
            "original_path": "/app/feather.jar",
            "installed_at": "2024-03-02T10:15:30.123456",
            "type": "mod",
            "version": "1.20.1"
        }"#;
        let record: ClientRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.path,
            "/home/u/.minecraft_launcher/clients/Feather/feather.jar"
        );
        assert_eq!(record.original_path.as_deref(), Some("/app/feather.jar"));
        assert!(record.is_installed());
        assert_eq!(
            record.installed_at.as_ref().unwrap().date_label(),
            "2024-03-02"
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"name": "x", "type": "plugin"}"#;
        assert!(serde_json::from_str::<ClientRecord>(json).is_err());
    }

    #[test]
    fn install_request_uses_unknown_for_blank_version() {
        let client = ClientRecord::new("Lunar", ClientKind::Installer)
            .with_path("/app/lunar.jar")
            .with_version("  ");
        let request = InstallRequest::from(&client);

        assert_eq!(request.version, "unknown");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["type"], "installer");
        assert_eq!(body["path"], "/app/lunar.jar");
    }

    #[test]
    fn timestamp_parses_common_formats() {
        assert!(Timestamp::new("2024-01-01").to_utc().is_some());
        assert!(Timestamp::new("2024-01-01T08:30:00Z").to_utc().is_some());
        assert!(Timestamp::new("2024-01-01T08:30:00.250").to_utc().is_some());
        assert!(Timestamp::new("yesterday").to_utc().is_none());
        assert_eq!(Timestamp::new("yesterday").date_label(), "yesterday");
    }

    #[test]
    fn search_hit_falls_back_to_placeholder_icon() {
        let json = r#"{"title": "CoolShader", "downloads": 100, "date_modified": "2024-01-01"}"#;
        let hit: SearchHit = serde_json::from_str(json).unwrap();

        assert_eq!(hit.downloads, 100);
        assert_eq!(hit.icon_or_placeholder(), PLACEHOLDER_ICON);
    }

    #[test]
    fn mod_project_decodes_registry_payload() {
        let json = r#"{
            "id": "AANobbMI",
            "slug": "sodium",
            "title": "Sodium",
            "description": "Rendering engine",
            "project_type": "mod",
            "downloads": 5000,
            "categories": ["optimization"],
            "game_versions": ["1.20.1"],
            "loaders": ["fabric"],
            "updated": "2024-05-01T12:00:00.000000Z",
            "icon_url": null
        }"#;
        let project: ModProject = serde_json::from_str(json).unwrap();

        assert_eq!(project.slug, "sodium");
        assert_eq!(project.followers, 0);
        assert!(project.body.is_empty());
        assert_eq!(project.updated.unwrap().date_label(), "2024-05-01");
        assert_eq!(project.icon_url, None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!InstallStatus::Installing.is_terminal());
        assert!(InstallStatus::Success.is_terminal());
        assert!(InstallStatus::Error.is_terminal());
    }
}
