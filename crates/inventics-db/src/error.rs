//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)         Stock rule (CoreError)             │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/inventics) ← Spanish message for the operator          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use inventics_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Unknown id, or a soft-deleted product.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. two products racing for the same code).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (negative stock, non-positive movement).
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// A stock rule rejected the write before anything was persisted.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for NotFound and for the core "product not found" rule.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. } | DbError::Domain(CoreError::ProductNotFound(_))
        )
    }
}

/// Maps sqlx failures onto the categories the app layer reports on.
///
/// Constraint failures are classified with [`sqlx::error::ErrorKind`]; the
/// schema triggers raise plain aborts and are matched by message.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    // "UNIQUE constraint failed: products.code"
                    ErrorKind::UniqueViolation => {
                        let field = message
                            .rsplit(": ")
                            .next()
                            .unwrap_or("unknown")
                            .to_string();
                        DbError::duplicate(field, "unknown")
                    }
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        DbError::ConstraintViolation { message }
                    }
                    _ if message.contains("append-only") || message.contains("must be an integer") => {
                        DbError::ConstraintViolation { message }
                    }
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<inventics_core::ValidationError> for DbError {
    fn from(err: inventics_core::ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_covers_domain_variant() {
        assert!(DbError::not_found("Product", "x").is_not_found());
        assert!(DbError::Domain(CoreError::ProductNotFound("x".into())).is_not_found());
        assert!(!DbError::PoolExhausted.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_unique_violation() {
        let db = crate::Database::new(crate::DbConfig::in_memory()).await.unwrap();
        let insert = "INSERT INTO products (id, code, name, category, supplier, quantity, unit, \
                      cost_cents, price_cents, entry_date, expiry_date, image_url, is_active, \
                      created_at, updated_at) \
                      VALUES (?1, '001', 'Arroz', 'Granos', 'Molinos', 0, 'unidades', 1, 1, \
                      '2025-01-01', '2025-06-01', '', 1, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')";

        sqlx::query(insert).bind("a").execute(db.pool()).await.unwrap();
        let err: DbError = sqlx::query(insert)
            .bind("b")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();

        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "products.code"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }
}
