//! # inventics-db
//!
//! SQLite storage for the catalog and the movement ledger.
//!
//! Reads go through [`ProductRepository`] and [`MovementRepository`]. Anything
//! that changes stock goes through [`InventoryLedger`], which writes the
//! product row and its movement in the same transaction, so the stored
//! quantity of a product always equals the net of its movements.
//!
//! ```text
//! products ──1:N── movements (append-only; UPDATE/DELETE abort)
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database, pool settings
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Product and movement reads, ledger transactions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventics_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("inventics.db")).await?;
//!
//! let products = db.products().list_active().await?;
//! let receipt = db.ledger().register_movement(&request, "ana").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::inventory::{InventoryLedger, MovementReceipt, ProductChange};
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
