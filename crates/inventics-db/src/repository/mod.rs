//! # Repository Module
//!
//! Database repository implementations for InvenTICS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command                                                               │
//! │       │                                                                 │
//! │       │  db.ledger().register_movement(&request, user)                 │
//! │       ▼                                                                 │
//! │  InventoryLedger            ProductRepository     MovementRepository   │
//! │  ├── create_product         ├── list_active       ├── list_recent      │
//! │  ├── edit_product           ├── get_by_id         ├── list_for_product │
//! │  └── register_movement      ├── low_stock         └── ledger_balance   │
//! │       │                     └── soft_delete                             │
//! │       │  one transaction                                                │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads, soft delete
//! - [`MovementRepository`](movement::MovementRepository) - Ledger reads
//! - [`InventoryLedger`](inventory::InventoryLedger) - Stock-changing transactions

pub mod inventory;
pub mod movement;
pub mod product;
