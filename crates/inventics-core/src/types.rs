//! # Domain Types
//!
//! Core domain types used throughout InvenTICS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐            ┌─────────────────┐                    │
//! │  │    Product      │ 1       N  │    Movement     │                    │
//! │  │  ─────────────  │◄───────────│  ─────────────  │                    │
//! │  │  id (UUID)      │            │  id (UUID)      │                    │
//! │  │  code ("007")   │            │  product_id     │                    │
//! │  │  name           │            │  product_name   │ (denormalized)     │
//! │  │  quantity ≥ 0   │            │  movement_type  │ entrada / salida   │
//! │  │  unit           │            │  quantity > 0   │                    │
//! │  │  cost / price   │            │  date, time     │                    │
//! │  └─────────────────┘            │  user, reason   │                    │
//! │                                 └─────────────────┘                    │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Unit       │   │  MovementType   │                             │
//! │  │  unidades, kg,  │   │  Inbound        │                             │
//! │  │  g, L, mL, oz   │   │  Outbound       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, used for relations
//! - `code`: sequential business reference shown to operators ("001", "002")
//!
//! Movements are append-only. Nothing in the workspace updates or deletes one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit a product's quantity is counted in.
///
/// Stored and serialized with the exact labels the operators use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Unit {
    #[serde(rename = "unidades")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "unidades"))]
    Units,
    #[serde(rename = "kg")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "kg"))]
    Kilogram,
    #[serde(rename = "g")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "g"))]
    Gram,
    #[serde(rename = "L")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "L"))]
    Liter,
    #[serde(rename = "mL")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "mL"))]
    Milliliter,
    #[serde(rename = "oz")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "oz"))]
    Ounce,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::Units,
        Unit::Kilogram,
        Unit::Gram,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Ounce,
    ];

    /// The stored label ("unidades", "kg", ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Units => "unidades",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Liter => "L",
            Unit::Milliliter => "mL",
            Unit::Ounce => "oz",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Units
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "unidad".to_string(),
                reason: format!("'{}' no es una unidad conocida", s.trim()),
            })
    }
}

// =============================================================================
// Movement Type
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum MovementType {
    /// Stock received ("entrada").
    #[serde(rename = "entrada")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "entrada"))]
    Inbound,
    /// Stock withdrawn ("salida").
    #[serde(rename = "salida")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "salida"))]
    Outbound,
}

impl MovementType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inbound => "entrada",
            MovementType::Outbound => "salida",
        }
    }

    /// +1 for inbound, -1 for outbound.
    #[inline]
    pub const fn sign(&self) -> i64 {
        match self {
            MovementType::Inbound => 1,
            MovementType::Outbound => -1,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entrada" => Ok(MovementType::Inbound),
            "salida" => Ok(MovementType::Outbound),
            other => Err(ValidationError::InvalidFormat {
                field: "tipo".to_string(),
                reason: format!("'{}' debe ser 'entrada' o 'salida'", other),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its current stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Sequential business code ("001").
    pub code: String,

    /// Commercial name shown everywhere.
    pub name: String,

    pub category: String,

    pub supplier: String,

    /// Current stock, counted in `unit`. Never negative.
    pub quantity: i64,

    pub unit: Unit,

    /// Packaging description, e.g. "Bolsa de 1kg".
    pub presentation: Option<String>,

    /// Acquisition cost per unit, in cents.
    pub cost_cents: i64,

    /// Sale price per unit, in cents.
    pub price_cents: i64,

    /// Date the current batch entered the store.
    #[ts(as = "String")]
    pub entry_date: NaiveDate,

    /// Expiry date of the current batch.
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    /// Representative image (URL or data URL).
    pub image_url: String,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// The editable field set of a product.
///
/// Used both to create a product (the code is assigned, never supplied)
/// and to edit one (the stored code is kept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub quantity: i64,
    pub unit: Unit,
    #[serde(default)]
    pub presentation: Option<String>,
    pub cost_cents: i64,
    pub price_cents: i64,
    #[ts(as = "String")]
    pub entry_date: NaiveDate,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub image_url: String,
}

impl ProductInput {
    /// Builds the input that would reproduce an existing product unchanged.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            supplier: product.supplier.clone(),
            quantity: product.quantity,
            unit: product.unit,
            presentation: product.presentation.clone(),
            cost_cents: product.cost_cents,
            price_cents: product.price_cents,
            entry_date: product.entry_date,
            expiry_date: product.expiry_date,
            image_url: product.image_url.clone(),
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// One append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Movement {
    pub id: String,

    pub product_id: String,

    /// Product name at the time the movement was recorded.
    pub product_name: String,

    pub movement_type: MovementType,

    /// Always positive; direction comes from `movement_type`.
    pub quantity: i64,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[ts(as = "String")]
    pub time: NaiveTime,

    /// Acting user.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "user_name"))]
    pub user: String,

    pub reason: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Quantity with the direction applied (+ inbound, - outbound).
    #[inline]
    pub fn signed_quantity(&self) -> i64 {
        self.movement_type.sign() * self.quantity
    }
}

/// A request to register a movement against a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MovementRequest {
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
