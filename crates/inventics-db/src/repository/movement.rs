//! # Movement Repository
//!
//! Read-only access to the stock ledger. The only way a movement is
//! written is [`insert`], called from inside a ledger transaction; there
//! is no update or delete, and the schema rejects both with a trigger.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use inventics_core::Movement;

const MOVEMENT_COLUMNS: &str =
    "id, product_id, product_name, movement_type, quantity, date, time, user_name, reason, created_at";

#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Newest movements first (date desc, time desc). `None` returns all.
    pub async fn list_recent(&self, limit: Option<u32>) -> DbResult<Vec<Movement>> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements \
             ORDER BY date DESC, time DESC, created_at DESC LIMIT ?1"
        );

        let movements = sqlx::query_as::<_, Movement>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = movements.len(), "Listed movements");
        Ok(movements)
    }

    /// All movements of one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Movement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE product_id = ?1 \
             ORDER BY date DESC, time DESC, created_at DESC"
        );

        let movements = sqlx::query_as::<_, Movement>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Sum of signed quantities for a product (+ entrada, - salida).
    ///
    /// Equals the product's quantity as long as every stock change went
    /// through the ledger.
    pub async fn ledger_balance(&self, product_id: &str) -> DbResult<i64> {
        let balance: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE movement_type WHEN 'entrada' THEN quantity ELSE -quantity END), 0)
            FROM movements
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Appends one movement. Only called inside a ledger transaction.
pub(crate) async fn insert(conn: &mut SqliteConnection, movement: &Movement) -> DbResult<()> {
    debug!(
        product_id = %movement.product_id,
        movement_type = %movement.movement_type,
        quantity = movement.quantity,
        "Appending movement"
    );

    sqlx::query(
        r#"
        INSERT INTO movements (
            id, product_id, product_name, movement_type, quantity,
            date, time, user_name, reason, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(&movement.product_name)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(movement.date)
    .bind(movement.time)
    .bind(&movement.user)
    .bind(&movement.reason)
    .bind(movement.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
