//! # Inventory Ledger
//!
//! Every write that changes stock. Each operation runs in a single SQLite
//! transaction, so the product row and its movement are committed together
//! or not at all.
//!
//! Transactions start with `BEGIN IMMEDIATE`: the write lock is taken before
//! the product is read, so concurrent writers queue on `busy_timeout` and
//! each one sees the stock the previous one committed.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atomic Dual Write                                    │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                        │
//! │    │                                                                    │
//! │    ├── read product (active only)          ── missing → NotFound       │
//! │    ├── inventics_core::stock rule          ── violated → rollback      │
//! │    ├── UPDATE products ...                                              │
//! │    └── INSERT INTO movements ...           (only when stock changed)   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Dropping the transaction on any `?` rolls everything back.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use inventics_core::code::next_product_code;
use inventics_core::stock::{adjustment_for, apply_movement};
use inventics_core::validation::{
    validate_movement_request, validate_product_input, validate_user, MAX_QUANTITY,
};
use inventics_core::{
    CoreError, Movement, MovementRequest, MovementType, Product, ProductInput, ADJUSTMENT_REASON,
    INITIAL_STOCK_REASON,
};

use super::{movement, product};
use crate::error::DbResult;

/// Result of creating or editing a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductChange {
    pub product: Product,
    /// The movement written alongside the product, if stock changed.
    pub movement: Option<Movement>,
}

/// Result of registering a movement.
#[derive(Debug, Clone, Serialize)]
pub struct MovementReceipt {
    /// The product with its new quantity.
    pub product: Product,
    pub movement: Movement,
}

#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    /// Opens a transaction that already holds the database write lock.
    async fn begin_write(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Creates a product with the next sequential code.
    ///
    /// A positive opening quantity is recorded as an inbound movement
    /// ("Stock inicial de nuevo producto") in the same transaction.
    pub async fn create_product(&self, input: &ProductInput, user: &str) -> DbResult<ProductChange> {
        validate_product_input(input)?;
        validate_user(user)?;

        let now = Utc::now();
        let mut tx = self.begin_write().await?;

        let codes = product::fetch_all_codes(&mut tx).await?;
        let code = next_product_code(codes.iter().map(String::as_str));

        let created = build_product(product::generate_product_id(), code, input, now, now);
        product::insert(&mut tx, &created).await?;

        let opening = if created.quantity > 0 {
            let entry = new_movement(
                &created,
                MovementType::Inbound,
                created.quantity,
                user,
                INITIAL_STOCK_REASON,
                now,
            );
            movement::insert(&mut tx, &entry).await?;
            Some(entry)
        } else {
            None
        };

        tx.commit().await?;

        info!(
            id = %created.id,
            code = %created.code,
            quantity = created.quantity,
            "Product created"
        );

        Ok(ProductChange {
            product: created,
            movement: opening,
        })
    }

    /// Replaces a product's editable fields.
    ///
    /// When the quantity changes, exactly one compensating movement of
    /// `|new - old|` is appended ("Ajuste de stock (edición manual)"),
    /// carrying the updated name. Unknown or deleted products fail with
    /// not found and nothing is written. The code is kept.
    pub async fn edit_product(
        &self,
        id: &str,
        input: &ProductInput,
        user: &str,
    ) -> DbResult<ProductChange> {
        validate_product_input(input)?;
        validate_user(user)?;

        let now = Utc::now();
        let mut tx = self.begin_write().await?;

        let previous = product::fetch_active(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        let updated = build_product(
            previous.id.clone(),
            previous.code.clone(),
            input,
            previous.created_at,
            now,
        );
        product::update_fields(&mut tx, &updated).await?;

        let adjustment = match adjustment_for(previous.quantity, updated.quantity) {
            Some(change) => {
                let entry = new_movement(
                    &updated,
                    change.movement_type,
                    change.quantity,
                    user,
                    ADJUSTMENT_REASON,
                    now,
                );
                movement::insert(&mut tx, &entry).await?;
                Some(entry)
            }
            None => None,
        };

        tx.commit().await?;

        info!(
            id = %updated.id,
            old_quantity = previous.quantity,
            new_quantity = updated.quantity,
            adjusted = adjustment.is_some(),
            "Product updated"
        );

        Ok(ProductChange {
            product: updated,
            movement: adjustment,
        })
    }

    /// Registers an inbound or outbound movement.
    ///
    /// Outbound movements larger than the current stock are rejected with
    /// [`CoreError::InsufficientStock`] and nothing is written.
    pub async fn register_movement(
        &self,
        request: &MovementRequest,
        user: &str,
    ) -> DbResult<MovementReceipt> {
        validate_movement_request(request)?;
        validate_user(user)?;

        let now = Utc::now();
        let mut tx = self.begin_write().await?;

        let mut current = product::fetch_active(&mut tx, &request.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;

        let new_quantity = apply_movement(
            &current.name,
            current.quantity,
            request.movement_type,
            request.quantity,
        )?;

        let delta = request.movement_type.sign() * request.quantity;
        apply_guarded_delta(&mut tx, &current, delta, request.quantity, now).await?;

        let entry = new_movement(
            &current,
            request.movement_type,
            request.quantity,
            user,
            request.reason.trim(),
            now,
        );
        movement::insert(&mut tx, &entry).await?;

        tx.commit().await?;

        info!(
            product_id = %current.id,
            movement_type = %entry.movement_type,
            quantity = entry.quantity,
            new_quantity,
            "Movement registered"
        );

        current.quantity = new_quantity;
        current.updated_at = now;

        Ok(MovementReceipt {
            product: current,
            movement: entry,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Applies `delta` only if the stock stays within `0..=MAX_QUANTITY` at
/// write time.
///
/// The ledger reads under the write lock, so this only trips when `current`
/// is stale.
async fn apply_guarded_delta(
    conn: &mut SqliteConnection,
    current: &Product,
    delta: i64,
    requested: i64,
    now: DateTime<Utc>,
) -> DbResult<()> {
    debug!(id = %current.id, delta, "Applying stock delta");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET quantity = quantity + ?2, updated_at = ?3
        WHERE id = ?1 AND is_active = 1 AND quantity + ?2 BETWEEN 0 AND ?4
        "#,
    )
    .bind(&current.id)
    .bind(delta)
    .bind(now)
    .bind(MAX_QUANTITY)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let err = if delta < 0 {
            CoreError::InsufficientStock {
                product: current.name.clone(),
                available: current.quantity,
                requested,
            }
        } else {
            CoreError::StockLimitExceeded {
                product: current.name.clone(),
                current: current.quantity,
                incoming: requested,
            }
        };
        return Err(err.into());
    }

    Ok(())
}

fn build_product(
    id: String,
    code: String,
    input: &ProductInput,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Product {
    Product {
        id,
        code,
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        supplier: input.supplier.trim().to_string(),
        quantity: input.quantity,
        unit: input.unit,
        presentation: input
            .presentation
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        cost_cents: input.cost_cents,
        price_cents: input.price_cents,
        entry_date: input.entry_date,
        expiry_date: input.expiry_date,
        image_url: input.image_url.trim().to_string(),
        is_active: true,
        created_at,
        updated_at,
    }
}

/// Builds a movement stamped with the server clock (seconds precision).
fn new_movement(
    product: &Product,
    movement_type: MovementType,
    quantity: i64,
    user: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Movement {
    let stamp = now.trunc_subsecs(0);
    Movement {
        id: Uuid::new_v4().to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        movement_type,
        quantity,
        date: stamp.date_naive(),
        time: stamp.time(),
        user: user.trim().to_string(),
        reason: reason.to_string(),
        created_at: now,
    }
}

// =============================================================================
// Tests
// =============================================================================
