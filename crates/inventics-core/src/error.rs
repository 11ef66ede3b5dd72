//! # Error Types
//!
//! Domain-specific error types for inventics-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventics-core errors (this file)                                     │
//! │  ├── CoreError        - Stock rule violations                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inventics-db errors (separate crate)                                  │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  apps/inventics errors                                                 │
//! │  └── ApiError         - What callers see (Spanish message + code)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Outcome      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation messages are written in Spanish because they are shown to
//! the store operators unchanged.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (unknown id or soft-deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// An outbound movement asks for more than the product has.
    ///
    /// ## User Workflow
    /// ```text
    /// Register movement (salida, qty: 50)
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Arroz", available: 10, requested: 50 }
    ///      │
    ///      ▼
    /// UI shows: "No hay stock suficiente para Arroz. Stock actual: 10."
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// An inbound movement would push stock past [`MAX_QUANTITY`](crate::validation::MAX_QUANTITY).
    #[error("Stock limit exceeded for {product}: current {current}, incoming {incoming}")]
    StockLimitExceeded {
        product: String,
        current: i64,
        incoming: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any write is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("el campo {field} es obligatorio")]
    Required { field: String },

    /// Field value is too long.
    #[error("el campo {field} admite como máximo {max} caracteres")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("el campo {field} debe ser mayor que cero")]
    MustBePositive { field: String },

    /// Value above the allowed maximum.
    #[error("el campo {field} no puede superar {max}")]
    TooLarge { field: String, max: i64 },

    /// Value must be zero or more.
    #[error("el campo {field} no puede ser negativo")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("el campo {field} tiene un formato inválido: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Arroz 1kg".to_string(),
            available: 10,
            requested: 50,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Arroz 1kg: available 10, requested 50"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        assert_eq!(err.to_string(), "el campo nombre es obligatorio");

        let err = ValidationError::Negative {
            field: "cantidad".to_string(),
        };
        assert_eq!(err.to_string(), "el campo cantidad no puede ser negativo");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
