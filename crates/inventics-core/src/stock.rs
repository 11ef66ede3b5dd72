//! # Stock Arithmetic
//!
//! The two rules that keep stock and the movement ledger in agreement.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EDIT (adjustment_for)              REGISTER (apply_movement)           │
//! │                                                                         │
//! │  old = 10, new = 4                  current = 10, salida 50             │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  delta = -6                         50 > 10 → InsufficientStock         │
//! │       │                                   (nothing written)             │
//! │       ▼                                                                 │
//! │  salida 6, "Ajuste de stock"        current = 10, entrada 5 → 15        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! For every product whose stock only changes through these rules:
//! `Σ signed movement quantities == product.quantity`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Movement, MovementType};
use crate::validation::{validate_movement_quantity, MAX_QUANTITY};

/// A stock change expressed as a ledger entry (direction + positive amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockChange {
    pub movement_type: MovementType,
    pub quantity: i64,
}

/// Computes the compensating movement for an edit from `old` to `new`.
///
/// Returns `None` when the quantity did not change.
///
/// ```rust
/// use inventics_core::stock::adjustment_for;
/// use inventics_core::MovementType;
///
/// let change = adjustment_for(3, 8).unwrap();
/// assert_eq!(change.movement_type, MovementType::Inbound);
/// assert_eq!(change.quantity, 5);
/// assert!(adjustment_for(8, 8).is_none());
/// ```
pub fn adjustment_for(old_quantity: i64, new_quantity: i64) -> Option<StockChange> {
    let delta = new_quantity - old_quantity;
    if delta == 0 {
        return None;
    }

    let movement_type = if delta > 0 {
        MovementType::Inbound
    } else {
        MovementType::Outbound
    };

    Some(StockChange {
        movement_type,
        quantity: delta.abs(),
    })
}

/// Applies a movement to the current stock and returns the new level.
///
/// Rejects non-positive quantities, outbound movements larger than the
/// current stock and inbound movements that would take stock past
/// [`MAX_QUANTITY`]. `product_name` only feeds the error.
pub fn apply_movement(
    product_name: &str,
    current: i64,
    movement_type: MovementType,
    quantity: i64,
) -> CoreResult<i64> {
    validate_movement_quantity(quantity)?;

    match movement_type {
        MovementType::Inbound => current
            .checked_add(quantity)
            .filter(|total| *total <= MAX_QUANTITY)
            .ok_or_else(|| CoreError::StockLimitExceeded {
                product: product_name.to_string(),
                current,
                incoming: quantity,
            }),
        MovementType::Outbound => {
            if quantity > current {
                return Err(CoreError::InsufficientStock {
                    product: product_name.to_string(),
                    available: current,
                    requested: quantity,
                });
            }
            Ok(current - quantity)
        }
    }
}

/// Sums signed movement quantities (+ inbound, - outbound).
pub fn ledger_balance<'a, I>(movements: I) -> i64
where
    I: IntoIterator<Item = &'a Movement>,
{
    movements.into_iter().map(Movement::signed_quantity).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
