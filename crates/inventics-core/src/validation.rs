//! # Validation Module
//!
//! Input validation for product and movement writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  └── Required fields, number inputs                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command (Rust)                                               │
//! │  ├── Type validation (deserialization, Unit / MovementType parsing)   │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0), CHECK (quantity > 0) on movements          │
//! │  ├── UNIQUE (code)                                                     │
//! │  └── Foreign key movements.product_id → products.id                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventics_core::validation::{validate_product_name, validate_movement_quantity};
//!
//! assert!(validate_product_name("Arroz Diana 1kg").is_ok());
//! assert!(validate_movement_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{MovementRequest, ProductInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 100;
const MAX_REASON_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("nombre", name, MAX_NAME_LEN)
}

/// Validates a movement reason. Empty is allowed.
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    if reason.trim().chars().count() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "motivo".to_string(),
            max: MAX_REASON_LEN,
        });
    }
    Ok(())
}

/// Validates the acting username attached to movements.
pub fn validate_user(user: &str) -> ValidationResult<()> {
    required("usuario", user, MAX_TEXT_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Upper bound for a stock level and for a single movement.
///
/// Keeps stock and every partial sum of the ledger far from `i64` overflow,
/// which SQLite would otherwise turn into a REAL.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

fn within_max(qty: i64) -> ValidationResult<()> {
    if qty > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "cantidad".to_string(),
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Zero is allowed (out of stock)
/// - Negative is rejected
/// - At most [`MAX_QUANTITY`]
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "cantidad".to_string(),
        });
    }
    within_max(qty)
}

/// Validates the quantity of a single movement.
///
/// ## User Workflow
/// ```text
/// Register movement dialog: quantity 5
///       │
///       ▼
/// validate_movement_quantity(5) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → "el campo cantidad debe ser mayor que cero"
///       │
///       └── OK → stock check in the ledger transaction
/// ```
pub fn validate_movement_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }
    within_max(qty)
}

/// Validates a cost or price in cents. Zero is allowed.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a product create/edit.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    required("categoría", &input.category, MAX_TEXT_LEN)?;
    required("proveedor", &input.supplier, MAX_TEXT_LEN)?;
    validate_stock_quantity(input.quantity)?;
    validate_amount_cents("costo", input.cost_cents)?;
    validate_amount_cents("precio", input.price_cents)?;

    if let Some(presentation) = &input.presentation {
        if presentation.trim().chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "presentación".to_string(),
                max: MAX_TEXT_LEN,
            });
        }
    }

    Ok(())
}

/// Validates a movement request before it reaches the ledger.
pub fn validate_movement_request(request: &MovementRequest) -> ValidationResult<()> {
    validate_uuid(&request.product_id)?;
    validate_movement_quantity(request.quantity)?;
    validate_reason(&request.reason)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ```rust
/// use inventics_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "debe ser un UUID válido".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
