//! # Commands Module
//!
//! Everything the front end (or the CLI) can ask the backend to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Catalog listing, add / edit / delete
//! ├── movement.rs   ◄─── Ledger listing, movement registration
//! ├── dashboard.rs  ◄─── Dashboard figures, report data, AI suggestions
//! └── assistant.rs  ◄─── NutriBot chat, image generation
//! ```
//!
//! ## Conventions
//! - Reads return `ApiResult<T>`.
//! - Writes return `Outcome<T>` (`{ success, message, data }`) with the
//!   operator message already chosen, and publish an `InventoryEvent`.
//! - Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the database
//! product::list_products(&state.db).await?;
//!
//! // Writes also need events and config (threshold, default user)
//! product::add_product(&state.db, &state.events, &state.config, &input, None).await;
//! ```

pub mod assistant;
pub mod dashboard;
pub mod movement;
pub mod product;
