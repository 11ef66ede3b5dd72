//! # State Module
//!
//! Separate state types instead of one big struct: each command takes
//! exactly the pieces it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌────────────────┐ │
//! │  │   DbState    │ │ ConfigState  │ │   EventHub   │ │ AssistantState │ │
//! │  │              │ │              │ │              │ │                │ │
//! │  │  Database    │ │  threshold   │ │  broadcast   │ │  ChatSession   │ │
//! │  │  (SQLite     │ │  user        │ │  Sender      │ │  (Mutex)       │ │
//! │  │   pool)      │ │  ai settings │ │              │ │  Analyst       │ │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └────────────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: pool is thread-safe                                        │
//! │  • ConfigState: read-only after startup                                │
//! │  • EventHub: broadcast::Sender is Clone + Sync                         │
//! │  • AssistantState: chat history behind an async Mutex                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod assistant;
mod config;
mod db;
mod events;

pub use assistant::AssistantState;
pub use config::{AiConfig, ConfigError, ConfigResult, ConfigState, DatabaseSettings, InventorySettings};
pub use db::DbState;
pub use events::{EventHub, InventoryEvent};

/// Everything the application built at startup.
#[derive(Debug)]
pub struct AppState {
    pub db: DbState,
    pub config: ConfigState,
    pub events: EventHub,
    pub assistant: AssistantState,
}
