//! # inventics-core: Pure Business Logic for InvenTICS
//!
//! This crate holds the inventory rules as pure functions with zero I/O
//! dependencies. The database layer calls into it inside its transactions,
//! so every stock rule is testable without a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        InvenTICS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              apps/inventics (commands, CLI, events)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ inventics-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   stock   │  │   code    │  │  summary  │  │   │
//! │  │   │  Product  │  │  deltas   │  │  001,002  │  │ dashboard │  │   │
//! │  │   │  Movement │  │  checks   │  │  ...      │  │  report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       inventics-db (SQLite transactions, repositories)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Movement, Unit, MovementType)
//! - [`money`] - Money type with integer arithmetic
//! - [`stock`] - Stock adjustment and movement arithmetic
//! - [`code`] - Sequential product code assignment
//! - [`summary`] - Dashboard and report figures, pagination
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inventics_core::stock::adjustment_for;
//! use inventics_core::MovementType;
//!
//! // Quantity edited from 10 down to 4: one outbound movement of 6
//! let change = adjustment_for(10, 4).unwrap();
//! assert_eq!(change.movement_type, MovementType::Outbound);
//! assert_eq!(change.quantity, 6);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod code;
pub mod error;
pub mod money;
pub mod stock;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Reason recorded on the movement generated when an edit changes stock.
pub const ADJUSTMENT_REASON: &str = "Ajuste de stock (edición manual)";

/// Reason recorded on the movement generated for a new product's opening stock.
pub const INITIAL_STOCK_REASON: &str = "Stock inicial de nuevo producto";

/// Products below this quantity are flagged as low stock unless configured otherwise.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 50;

/// Minimum number of digits in a generated product code ("001").
pub const CODE_WIDTH: usize = 3;

/// Number of movements shown on the dashboard.
pub const DASHBOARD_RECENT_MOVEMENTS: usize = 5;

/// Number of movements included in the inventory report.
pub const REPORT_RECENT_MOVEMENTS: usize = 30;
