//! # Tote Command-Line Front End
//!
//! Start-up wiring, screen state holders and the `tote` commands.
//!
//! ## Start-up Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    tote <command>                                       │
//! │                                                                         │
//! │  1. init_tracing()           RUST_LOG or "info,tote=debug,sqlx=warn"   │
//! │  2. AppConfig::load()        data dir, locale, remote.toml + env       │
//! │  3. Database::new()          SQLite pool + embedded migrations         │
//! │  4. CatalogSource::new()     reqwest client with timeout               │
//! │  5. repositories             ShoppingRepository, AccountRepository     │
//! │  6. dispatch                 commands::<group>::run(...)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//! ```text
//! tote-cli/src/
//! ├── main.rs        ◄─── Binary entry point
//! ├── lib.rs         ◄─── You are here (start-up + dispatch)
//! ├── cli.rs         ◄─── clap definitions
//! ├── config.rs      ◄─── AppConfig
//! ├── error.rs       ◄─── AppError
//! ├── state/         ◄─── Catalog, cart, favorites, account holders
//! └── commands/      ◄─── One handler per subcommand group
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use tote_db::{Database, DbConfig};
use tote_remote::{CatalogSource, InMemoryBackend};
use tote_repo::{AccountRepository, ShoppingRepository};

use cli::{Cli, Command};
use config::AppConfig;
use error::AppResult;

/// Installs the `tracing` subscriber.
///
/// `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tote=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command to completion.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config, cli.locale.as_deref())?;
    let locale = config.locale;

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let catalog = CatalogSource::new(&config.remote.catalog)?;
    let shopping = ShoppingRepository::new(catalog, &db);

    debug!(
        credentials_set = config.remote.backend.is_configured(),
        "Account commands use the in-memory backend"
    );
    let account = AccountRepository::in_memory(InMemoryBackend::new());

    let result = match cli.command {
        Command::Catalog { action } => commands::catalog::run(shopping, locale, action).await,
        Command::Cart { action } => commands::cart::run(shopping, locale, action).await,
        Command::Favorites { action } => commands::favorites::run(shopping, locale, action).await,
        Command::Account { action } => commands::account::run(account, locale, action).await,
    };

    db.close().await;
    result
}
