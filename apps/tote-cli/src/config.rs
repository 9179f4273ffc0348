//! # App Configuration
//!
//! Everything the binary needs before it can open the store.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AppConfig::load()                                    │
//! │                                                                         │
//! │  database_path   TOTE_DB_PATH, else <data dir>/tote.db                 │
//! │                    macOS:   ~/Library/Application Support/dev.tote.tote │
//! │                    Linux:   ~/.local/share/tote                         │
//! │                    Windows: %APPDATA%\tote\tote\data                    │
//! │                                                                         │
//! │  locale          --locale flag, else TOTE_LOCALE, else "en"            │
//! │                                                                         │
//! │  remote          RemoteConfig::load(--config path)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

use tote_core::Locale;
use tote_remote::RemoteConfig;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub locale: Locale,
    pub remote: RemoteConfig,
}

impl AppConfig {
    /// Resolves the configuration.
    ///
    /// `locale` comes from the command line and wins over `TOTE_LOCALE`.
    pub fn load(config_path: Option<PathBuf>, locale: Option<&str>) -> AppResult<Self> {
        let remote = RemoteConfig::load(config_path)?;
        let database_path = database_path()?;

        let env_locale = std::env::var("TOTE_LOCALE").ok();
        let locale = match locale.or(env_locale.as_deref()) {
            Some(tag) => tag.parse::<Locale>()?,
            None => Locale::default(),
        };

        debug!(?database_path, ?locale, "App configuration resolved");
        Ok(AppConfig {
            database_path,
            locale,
            remote,
        })
    }
}

/// Platform data directory path of the SQLite file.
///
/// Set `TOTE_DB_PATH` to use a custom path.
fn database_path() -> AppResult<PathBuf> {
    if let Ok(path) = std::env::var("TOTE_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("dev", "tote", "tote").ok_or(AppError::NoDataDir)?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("tote.db"))
}
