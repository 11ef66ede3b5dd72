//! # Product Repository
//!
//! Read access to the catalog plus the writes that never touch stock
//! (soft delete). Anything that changes `quantity` goes through
//! [`InventoryLedger`](super::inventory::InventoryLedger) so a movement is
//! always written alongside it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_active()        active products ORDER BY name                    │
//! │  get_active(id)       None for unknown or soft-deleted ids             │
//! │  all_codes()          every code ever issued (deleted included)        │
//! │  low_stock(threshold) quantity < threshold, lowest first               │
//! │  soft_delete(id)      is_active = 0, movements kept                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use inventics_core::Product;

/// Column list shared by every product SELECT.
pub(crate) const PRODUCT_COLUMNS: &str = "id, code, name, category, supplier, quantity, unit, \
     presentation, cost_cents, price_cents, entry_date, expiry_date, image_url, is_active, \
     created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name COLLATE NOCASE, code"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Gets a product by its ID, including soft-deleted ones.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets an active product by its ID.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self.get_by_id(id).await?.filter(|p| p.is_active))
    }

    /// Gets a product by its business code ("007").
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Every code ever issued, soft-deleted products included.
    pub async fn all_codes(&self) -> DbResult<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all_codes(&mut conn).await
    }

    /// Active products with `quantity < threshold`, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        debug!(threshold, "Listing low-stock products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND quantity < ?1 \
             ORDER BY quantity, name COLLATE NOCASE"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// - Movements still reference this product
    /// - Its code stays reserved, so it is never reissued
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers (used inside ledger transactions)
// =============================================================================

pub(crate) async fn fetch_active(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND is_active = 1");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(product)
}

pub(crate) async fn fetch_all_codes(conn: &mut SqliteConnection) -> DbResult<Vec<String>> {
    let codes: Vec<String> = sqlx::query_scalar("SELECT code FROM products")
        .fetch_all(&mut *conn)
        .await?;

    Ok(codes)
}

pub(crate) async fn insert(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    debug!(code = %product.code, name = %product.name, "Inserting product");

    sqlx::query(
        r#"
        INSERT INTO products (
            id, code, name, category, supplier, quantity, unit, presentation,
            cost_cents, price_cents, entry_date, expiry_date, image_url,
            is_active, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
    )
    .bind(&product.id)
    .bind(&product.code)
    .bind(&product.name)
    .bind(&product.category)
    .bind(&product.supplier)
    .bind(product.quantity)
    .bind(product.unit)
    .bind(&product.presentation)
    .bind(product.cost_cents)
    .bind(product.price_cents)
    .bind(product.entry_date)
    .bind(product.expiry_date)
    .bind(&product.image_url)
    .bind(product.is_active)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Writes every editable field. The code is never changed here.
pub(crate) async fn update_fields(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    debug!(id = %product.id, "Updating product");

    let result = sqlx::query(
        r#"
        UPDATE products SET
            name = ?2,
            category = ?3,
            supplier = ?4,
            quantity = ?5,
            unit = ?6,
            presentation = ?7,
            cost_cents = ?8,
            price_cents = ?9,
            entry_date = ?10,
            expiry_date = ?11,
            image_url = ?12,
            updated_at = ?13
        WHERE id = ?1 AND is_active = 1
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.category)
    .bind(&product.supplier)
    .bind(product.quantity)
    .bind(product.unit)
    .bind(&product.presentation)
    .bind(product.cost_cents)
    .bind(product.price_cents)
    .bind(product.entry_date)
    .bind(product.expiry_date)
    .bind(&product.image_url)
    .bind(product.updated_at)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", &product.id));
    }

    Ok(())
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use inventics_core::{ProductInput, Unit};

    fn input(name: &str, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            category: "Bebidas".to_string(),
            supplier: "Manantial Claro".to_string(),
            quantity,
            unit: Unit::Liter,
            presentation: None,
            cost_cents: 40,
            price_cents: 80,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            image_url: "https://example.com/agua.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_active_sorted_by_name_and_hides_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.ledger();
        ledger.create_product(&input("Zumo de naranja", 5), "ana").await.unwrap();
        let gone = ledger.create_product(&input("Bebida retirada", 5), "ana").await.unwrap();
        ledger.create_product(&input("agua mineral", 5), "ana").await.unwrap();

        db.products().soft_delete(&gone.product.id).await.unwrap();

        let names: Vec<String> = db
            .products()
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["agua mineral".to_string(), "Zumo de naranja".to_string()]);

        assert!(db.products().get_active(&gone.product.id).await.unwrap().is_none());
        assert!(db.products().get_by_id(&gone.product.id).await.unwrap().is_some());
        assert_eq!(db.products().all_codes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.ledger().create_product(&input("Agua", 7), "ana").await.unwrap();

        let stored = db.products().get_by_code("001").await.unwrap().unwrap();
        assert_eq!(stored.id, created.product.id);
        assert_eq!(stored.image_url, "https://example.com/agua.png");
        assert_eq!(stored.presentation, None);
        assert_eq!(stored.unit, Unit::Liter);
        assert_eq!(stored.entry_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_exclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.ledger();
        ledger.create_product(&input("Cincuenta", 50), "ana").await.unwrap();
        ledger.create_product(&input("Cuarenta", 40), "ana").await.unwrap();
        ledger.create_product(&input("Cero", 0), "ana").await.unwrap();

        let low: Vec<String> = db
            .products()
            .low_stock(50)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(low, vec!["Cero".to_string(), "Cuarenta".to_string()]);
    }

    #[tokio::test]
    async fn test_soft_delete_unknown_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().soft_delete("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
