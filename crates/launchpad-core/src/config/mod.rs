//! Launcher configuration
//!
//! Settings live in `launchpad.toml` under the user config directory:
//! - `[service]`: local client service endpoint and request timeout
//! - `[registry]`: mod registry endpoint and search page size
//! - `[launch]`: JVM heap sizes and extra arguments passed on launch
//! - `[install]`: how long terminal install statuses stay visible
//!
//! Environment variables override the file, command-line flags override both.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_launchpad_toml, parse_launchpad_toml_str, to_toml};
pub use schema::{
    InstallSettings, JavaLaunchOptions, LauncherConfig, RegistrySettings, ServiceSettings,
};
pub use store::ConfigStore;

/// Environment variable overriding `[service] url`.
pub const SERVICE_URL_ENV: &str = "LAUNCHPAD_SERVICE_URL";

/// Environment variable overriding `[registry] url`.
pub const REGISTRY_URL_ENV: &str = "LAUNCHPAD_REGISTRY_URL";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "launchpad.toml";
