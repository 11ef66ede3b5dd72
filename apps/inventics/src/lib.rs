//! # InvenTICS Application Library
//!
//! Orchestration layer of the InvenTICS inventory backend: loads the
//! configuration, opens the database, builds the assistant and exposes the
//! commands the front end calls.
//!
//! ## Module Organization
//! ```text
//! inventics/
//! ├── lib.rs          ◄─── You are here (startup)
//! ├── main.rs         ◄─── Command line front end
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState and exports
//! │   ├── config.rs   ◄─── ConfigState (defaults → TOML → env)
//! │   ├── db.rs       ◄─── Database wrapper
//! │   ├── events.rs   ◄─── Change broadcast
//! │   └── assistant.rs◄─── Chat / analysis / images
//! ├── commands/       ◄─── product, movement, dashboard, assistant
//! └── error.rs        ◄─── ApiError and Outcome
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use inventics_ai::AiError;
use inventics_db::{Database, DbConfig, DbError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, AssistantState, ConfigError, ConfigState, DbState, EventHub};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Assistant(#[from] AiError),
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=inventics_db=trace` - Trace one crate only
/// - Default: `info`, with sqlx quieted to `warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventics=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds the application state.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Resolve database path ── config / INVENTICS_DB_PATH / data dir     │
/// │  2. Connect ──────────────── SQLite WAL, run pending migrations        │
/// │  3. Build assistant ──────── Gemini client if an API key is set        │
/// │  4. Create EventHub                                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap(config: ConfigState) -> Result<AppState, StartupError> {
    let db_path = config.database_path()?;
    info!(db_path = %db_path.display(), "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    build_state(db, config)
}

/// Same as [`bootstrap`] over an in-memory database.
pub async fn bootstrap_in_memory(config: ConfigState) -> Result<AppState, StartupError> {
    let db = Database::new(DbConfig::in_memory()).await?;
    build_state(db, config)
}

fn build_state(db: Database, config: ConfigState) -> Result<AppState, StartupError> {
    let assistant = AssistantState::from_settings(&config.ai_settings())?;
    if config.ai.api_key.is_none() {
        info!("No AI API key configured; assistant answers with fallbacks");
    }

    Ok(AppState {
        db: DbState::new(db),
        config,
        events: EventHub::new(),
        assistant,
    })
}

/// Loads the configuration from `path` (or the default location).
pub fn load_config(path: Option<PathBuf>) -> Result<ConfigState, StartupError> {
    Ok(ConfigState::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_in_memory() {
        let state = bootstrap_in_memory(ConfigState::default()).await.unwrap();

        assert!(state.db.inner().health_check().await);
        let products = commands::product::list_products(&state.db).await.unwrap();
        assert!(products.is_empty());
    }
}
