//! # Product Commands
//!
//! Catalog reads and the three catalog writes.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  edit_product(id, input { quantity: 4, .. })   stored quantity: 10      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryLedger::edit_product  (one transaction)                      │
//! │       ├── UPDATE products ... quantity = 4                              │
//! │       └── INSERT movements (salida, 6, "Ajuste de stock ...")          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EventHub: ProductUpdated + MovementRecorded                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Outcome { success: true,                                              │
//! │            message: "Producto y stock actualizados exitosamente." }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use inventics_core::code::next_product_code;
use inventics_core::summary::{paginate, Page, PRODUCTS_PAGE_SIZE};
use inventics_core::{Product, ProductInput};
use inventics_db::ProductChange;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult, Outcome};
use crate::state::{ConfigState, DbState, EventHub, InventoryEvent};

pub const ADDED: &str = "Producto agregado exitosamente.";
pub const ADD_FAILED: &str = "Error al agregar el producto.";
pub const UPDATED: &str = "Producto y stock actualizados exitosamente.";
pub const UPDATE_FAILED: &str = "Error al actualizar el producto.";
pub const DELETED: &str = "Producto eliminado.";
pub const DELETE_FAILED: &str = "Error al eliminar el producto.";

/// Every active product, ordered by name.
pub async fn list_products(db: &DbState) -> ApiResult<Vec<Product>> {
    let start = Instant::now();
    let products = db.inner().products().list_active().await?;
    debug!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "list_products"
    );
    Ok(products)
}

/// One page of the product table (5 rows per page).
pub async fn product_page(db: &DbState, page: usize) -> ApiResult<Page<Product>> {
    let products = list_products(db).await?;
    Ok(paginate(&products, page, PRODUCTS_PAGE_SIZE))
}

pub async fn get_product(db: &DbState, id: &str) -> ApiResult<Product> {
    debug!(id = %id, "get_product command");
    db.inner()
        .products()
        .get_active(id)
        .await?
        .ok_or_else(ApiError::product_not_found)
}

pub async fn get_product_by_code(db: &DbState, code: &str) -> ApiResult<Product> {
    debug!(code = %code, "get_product_by_code command");
    db.inner()
        .products()
        .get_by_code(code.trim())
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(ApiError::product_not_found)
}

/// Active products below the configured threshold, lowest first.
pub async fn low_stock_products(db: &DbState, config: &ConfigState) -> ApiResult<Vec<Product>> {
    Ok(db
        .inner()
        .products()
        .low_stock(config.low_stock_threshold())
        .await?)
}

/// The code the next created product will receive.
pub async fn preview_next_code(db: &DbState) -> ApiResult<String> {
    let codes = db.inner().products().all_codes().await?;
    Ok(next_product_code(codes.iter().map(String::as_str)))
}

pub async fn add_product(
    db: &DbState,
    events: &EventHub,
    config: &ConfigState,
    input: &ProductInput,
    user: Option<&str>,
) -> Outcome<ProductChange> {
    let user = config.user_or_default(user);
    let result = db
        .inner()
        .ledger()
        .create_product(input, user)
        .await
        .map_err(ApiError::from);

    if let Ok(change) = &result {
        info!(
            product_id = %change.product.id,
            code = %change.product.code,
            user = %user,
            "Product added"
        );
        events.publish(InventoryEvent::ProductAdded {
            product_id: change.product.id.clone(),
            code: change.product.code.clone(),
            name: change.product.name.clone(),
        });
        publish_movement(events, change);
    }

    Outcome::from_result(result, ADDED, ADD_FAILED)
}

pub async fn edit_product(
    db: &DbState,
    events: &EventHub,
    config: &ConfigState,
    id: &str,
    input: &ProductInput,
    user: Option<&str>,
) -> Outcome<ProductChange> {
    let user = config.user_or_default(user);
    let result = db
        .inner()
        .ledger()
        .edit_product(id, input, user)
        .await
        .map_err(ApiError::from);

    if let Ok(change) = &result {
        info!(
            product_id = %id,
            quantity = change.product.quantity,
            adjusted = change.movement.is_some(),
            "Product updated"
        );
        events.publish(InventoryEvent::ProductUpdated {
            product_id: change.product.id.clone(),
            quantity: change.product.quantity,
        });
        publish_movement(events, change);
    }

    Outcome::from_result(result, UPDATED, UPDATE_FAILED)
}

/// Soft delete. The product's movements stay in the ledger.
pub async fn delete_product(db: &DbState, events: &EventHub, id: &str) -> Outcome<()> {
    let result: ApiResult<()> = db
        .inner()
        .products()
        .soft_delete(id)
        .await
        .map_err(ApiError::from);

    if result.is_ok() {
        info!(product_id = %id, "Product deleted");
        events.publish(InventoryEvent::ProductDeleted {
            product_id: id.to_string(),
        });
    }

    Outcome::from_result(result, DELETED, DELETE_FAILED)
}

fn publish_movement(events: &EventHub, change: &ProductChange) {
    if let Some(movement) = &change.movement {
        events.publish(InventoryEvent::MovementRecorded {
            movement_id: movement.id.clone(),
            product_id: movement.product_id.clone(),
            movement_type: movement.movement_type,
            quantity: movement.quantity,
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use inventics_core::{MovementType, Unit};
    use inventics_db::{Database, DbConfig};

    use super::*;

    async fn setup() -> (DbState, EventHub, ConfigState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (DbState::new(db), EventHub::new(), ConfigState::default())
    }

    fn input(name: &str, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            category: "Granos".to_string(),
            supplier: "Molinos del Valle".to_string(),
            quantity,
            unit: Unit::Units,
            presentation: Some("Bolsa de 1kg".to_string()),
            cost_cents: 180,
            price_cents: 250,
            entry_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_add_product_outcome_and_events() {
        let (db, events, config) = setup().await;
        let mut rx = events.subscribe();

        let outcome = add_product(&db, &events, &config, &input("Arroz", 10), None).await;

        assert!(outcome.success);
        assert_eq!(outcome.message, ADDED);
        let change = outcome.data.unwrap();
        assert_eq!(change.product.code, "001");
        assert_eq!(change.movement.as_ref().unwrap().user, "Admin");

        assert!(matches!(rx.recv().await.unwrap(), InventoryEvent::ProductAdded { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            InventoryEvent::MovementRecorded {
                movement_type: MovementType::Inbound,
                quantity: 10,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_add_invalid_product_reports_validation() {
        let (db, events, config) = setup().await;

        let outcome = add_product(&db, &events, &config, &input("  ", 10), Some("ana")).await;

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Datos inválidos"));
        assert!(list_products(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_product_adjusts_stock() {
        let (db, events, config) = setup().await;
        let created = add_product(&db, &events, &config, &input("Arroz", 10), None)
            .await
            .data
            .unwrap();

        let mut edited = input("Arroz Premium", 4);
        edited.price_cents = 300;
        let outcome =
            edit_product(&db, &events, &config, &created.product.id, &edited, Some("ana")).await;

        assert!(outcome.success);
        assert_eq!(outcome.message, UPDATED);
        let change = outcome.data.unwrap();
        let movement = change.movement.unwrap();
        assert_eq!(movement.movement_type, MovementType::Outbound);
        assert_eq!(movement.quantity, 6);
        assert_eq!(movement.product_name, "Arroz Premium");
        assert_eq!(movement.user, "ana");
        assert_eq!(change.product.code, "001");
    }

    #[tokio::test]
    async fn test_edit_unknown_product() {
        let (db, events, config) = setup().await;

        let outcome = edit_product(
            &db,
            &events,
            &config,
            "6f1c0a52-8f0e-4c41-9a43-2d7f3c1b9e10",
            &input("Arroz", 1),
            None,
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Producto no encontrado.");
    }

    #[tokio::test]
    async fn test_delete_then_lookup_fails() {
        let (db, events, config) = setup().await;
        let created = add_product(&db, &events, &config, &input("Arroz", 0), None)
            .await
            .data
            .unwrap();

        let outcome = delete_product(&db, &events, &created.product.id).await;
        assert!(outcome.success);
        assert_eq!(outcome.message, DELETED);

        assert!(get_product(&db, &created.product.id).await.is_err());
        assert!(get_product_by_code(&db, "001").await.is_err());
        assert_eq!(preview_next_code(&db).await.unwrap(), "002");

        let again = delete_product(&db, &events, &created.product.id).await;
        assert!(!again.success);
        assert_eq!(again.message, "Producto no encontrado.");
    }

    #[tokio::test]
    async fn test_product_pages_and_low_stock() {
        let (db, events, config) = setup().await;
        for (i, qty) in [80, 10, 49, 50, 0, 120].iter().enumerate() {
            add_product(&db, &events, &config, &input(&format!("Producto {i}"), *qty), None).await;
        }

        let page = product_page(&db, 2).await.unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);

        let low: Vec<i64> = low_stock_products(&db, &config)
            .await
            .unwrap()
            .iter()
            .map(|p| p.quantity)
            .collect();
        assert_eq!(low, vec![0, 10, 49]);
    }
}
