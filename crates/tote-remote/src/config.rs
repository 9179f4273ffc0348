//! # Remote Configuration
//!
//! Where the catalog lives and which backend project to talk to.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TOTE_CATALOG_URL=https://catalog.example.com                       │
//! │     TOTE_API_KEY / TOTE_PROJECT_ID / TOTE_APP_ID                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tote/remote.toml (Linux)                                 │
//! │     ~/Library/Application Support/dev.tote.tote/remote.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Public catalog URL; backend credentials baked in at build time     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # remote.toml
//! [catalog]
//! base_url = "https://fakestoreapi.com"
//! timeout_secs = 15
//!
//! [backend]
//! api_key = "..."
//! project_id = "tote-dev"
//! application_id = "1:1234:android:abcd"
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{RemoteError, RemoteResult};

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Base URL of the REST catalog; `/products` is appended.
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            base_url: default_catalog_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl CatalogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Backend Settings
// =============================================================================

/// Credentials for the hosted identity / storage / document backend.
///
/// Release builds inject these through `TOTE_BUILD_API_KEY`,
/// `TOTE_BUILD_PROJECT_ID` and `TOTE_BUILD_APP_ID` at compile time.
#[derive(Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_project_id")]
    pub project_id: String,

    #[serde(default = "default_application_id")]
    pub application_id: String,
}

fn default_api_key() -> String {
    option_env!("TOTE_BUILD_API_KEY").unwrap_or_default().to_string()
}

fn default_project_id() -> String {
    option_env!("TOTE_BUILD_PROJECT_ID").unwrap_or_default().to_string()
}

fn default_application_id() -> String {
    option_env!("TOTE_BUILD_APP_ID").unwrap_or_default().to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            api_key: default_api_key(),
            project_id: default_project_id(),
            application_id: default_application_id(),
        }
    }
}

impl BackendSettings {
    /// True when every credential is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty() && !self.application_id.is_empty()
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("BackendSettings")
            .field("api_key", &api_key)
            .field("project_id", &self.project_id)
            .field("application_id", &self.application_id)
            .finish()
    }
}

// =============================================================================
// Remote Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub backend: BackendSettings,
}

impl RemoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (remote.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RemoteResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading remote config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> RemoteResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> RemoteResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        let url = Url::parse(&self.catalog.base_url)
            .map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", self.catalog.base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RemoteError::InvalidUrl(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                self.catalog.base_url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(RemoteError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TOTE_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.base_url = url;
        }

        if let Ok(key) = std::env::var("TOTE_API_KEY") {
            debug!("Overriding backend API key from environment");
            self.backend.api_key = key;
        }

        if let Ok(id) = std::env::var("TOTE_PROJECT_ID") {
            self.backend.project_id = id;
        }

        if let Ok(id) = std::env::var("TOTE_APP_ID") {
            self.backend.application_id = id;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "tote", "tote")
            .map(|dirs| dirs.config_dir().join("remote.toml"))
    }
}
