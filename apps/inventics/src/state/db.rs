//! # Database State
//!
//! Wraps the `Database` handle for the commands. The inner `SqlitePool`
//! is thread-safe, so commands query concurrently without extra locking.
//!
//! ```rust,ignore
//! let products = db.inner().products().list_active().await?;
//! ```

use inventics_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
