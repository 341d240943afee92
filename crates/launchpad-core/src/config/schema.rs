//! Configuration schema for launchpad.toml

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{REGISTRY_URL_ENV, SERVICE_URL_ENV};

const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEARCH_LIMIT: u8 = 20;
const MAX_SEARCH_LIMIT: u8 = 100;
const DEFAULT_HEAP_MIN: &str = "1G";
const DEFAULT_HEAP_MAX: &str = "4G";
const DEFAULT_STATUS_RESET_MS: u64 = 3_000;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub service: ServiceSettings,
    pub registry: RegistrySettings,
    pub launch: JavaLaunchOptions,
    pub install: InstallSettings,
}

/// Local client service endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Mod registry endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Defaults to the service URL, which proxies the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub search_limit: u8,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            url: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// JVM options sent with every launch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaLaunchOptions {
    pub heap_min: String,
    pub heap_max: String,
    pub extra_args: Vec<String>,
}

impl Default for JavaLaunchOptions {
    fn default() -> Self {
        Self {
            heap_min: DEFAULT_HEAP_MIN.to_string(),
            heap_max: DEFAULT_HEAP_MAX.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl JavaLaunchOptions {
    /// Arguments in launch order: `-Xmx`, `-Xms`, then extras.
    pub fn java_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2 + self.extra_args.len());
        args.push(format!("-Xmx{}", self.heap_max.trim()));
        args.push(format!("-Xms{}", self.heap_min.trim()));
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [("heap_min", &self.heap_min), ("heap_max", &self.heap_max)] {
            if !is_heap_size(value) {
                anyhow::bail!(
                    "[launch] {} must be a number with optional K/M/G suffix, got '{}'",
                    key,
                    value
                );
            }
        }
        Ok(())
    }
}

fn is_heap_size(value: &str) -> bool {
    let value = value.trim();
    let digits = value
        .strip_suffix(['K', 'M', 'G', 'k', 'm', 'g'])
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Install status presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    /// How long `success`/`error` stay visible before reverting to none.
    pub status_reset_ms: u64,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            status_reset_ms: DEFAULT_STATUS_RESET_MS,
        }
    }
}

impl InstallSettings {
    pub fn status_reset_window(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms)
    }
}

impl LauncherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed local client service URL.
    pub fn service_url(&self) -> anyhow::Result<Url> {
        parse_http_url("service", &self.service.url)
    }

    /// Parsed mod registry URL, falling back to the service URL.
    pub fn registry_url(&self) -> anyhow::Result<Url> {
        match &self.registry.url {
            Some(url) => parse_http_url("registry", url),
            None => self.service_url(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Apply `LAUNCHPAD_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (used by tests).
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SERVICE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.service.url = url;
        }
        if let Some(url) = lookup(REGISTRY_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.registry.url = Some(url);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        self.service_url()?;
        self.registry_url()?;
        if self.service.timeout_secs == 0 {
            anyhow::bail!("[service] timeout_secs must be greater than zero");
        }
        if self.registry.search_limit == 0 || self.registry.search_limit > MAX_SEARCH_LIMIT {
            anyhow::bail!(
                "[registry] search_limit must be between 1 and {}, got {}",
                MAX_SEARCH_LIMIT,
                self.registry.search_limit
            );
        }
        self.launch.validate()?;
        Ok(())
    }
}

fn parse_http_url(section: &str, raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("[{}] url '{}' is invalid: {}", section, raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!(
            "[{}] url must use http or https, got '{}'",
            section,
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_java_args_match_launcher_defaults() {
        let args = JavaLaunchOptions::default().java_args();
        assert_eq!(args, vec!["-Xmx4G".to_string(), "-Xms1G".to_string()]);
    }

    #[test]
    fn java_args_append_extras() {
        let options = JavaLaunchOptions {
            heap_min: "512M".to_string(),
            heap_max: "6G".to_string(),
            extra_args: vec!["-XX:+UseG1GC".to_string()],
        };
        assert_eq!(options.java_args(), vec!["-Xmx6G", "-Xms512M", "-XX:+UseG1GC"]);
    }

    #[test]
    fn heap_size_validation() {
        assert!(is_heap_size("4G"));
        assert!(is_heap_size("2048m"));
        assert!(is_heap_size("1024"));
        assert!(!is_heap_size("G"));
        assert!(!is_heap_size("4GB"));
        assert!(!is_heap_size(""));
    }

    #[test]
    fn registry_url_falls_back_to_service() {
        let config = LauncherConfig::default();
        assert_eq!(
            config.registry_url().unwrap(),
            config.service_url().unwrap()
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = LauncherConfig::default();
        config.service.url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = LauncherConfig::default();
        config.registry.search_limit = 0;
        assert!(config.validate().is_err());

        let mut config = LauncherConfig::default();
        config.launch.heap_max = "lots".to_string();
        assert!(config.validate().is_err());

        assert!(LauncherConfig::default().validate().is_ok());
    }

    #[test]
    fn overrides_replace_urls() {
        let mut config = LauncherConfig::default();
        config.apply_overrides_from(|key| match key {
            SERVICE_URL_ENV => Some("http://10.0.0.2:9000".to_string()),
            REGISTRY_URL_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.service.url, "http://10.0.0.2:9000");
        assert!(config.registry.url.is_none());
    }
}
