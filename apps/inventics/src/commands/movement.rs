//! # Movement Commands
//!
//! Ledger reads and movement registration.
//!
//! ```text
//! register_movement({ product_id, salida, 50 })      stock: 10
//!       │
//!       ▼
//! InventoryLedger::register_movement
//!       ├── 50 > 10 ──► CoreError::InsufficientStock ──► nothing written
//!       │                 "No hay stock suficiente para Arroz. Stock actual: 10."
//!       └── ok ──────► UPDATE products + INSERT movements (one transaction)
//! ```

use inventics_core::summary::{paginate, Page, MOVEMENTS_PAGE_SIZE};
use inventics_core::{Movement, MovementRequest};
use inventics_db::MovementReceipt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult, Outcome};
use crate::state::{ConfigState, DbState, EventHub, InventoryEvent};

pub const REGISTERED: &str = "Movimiento registrado con éxito.";
pub const REGISTER_FAILED: &str = "Error al registrar el movimiento.";

/// Movements newest first, optionally capped.
pub async fn list_movements(db: &DbState, limit: Option<u32>) -> ApiResult<Vec<Movement>> {
    debug!(?limit, "list_movements command");
    Ok(db.inner().movements().list_recent(limit).await?)
}

/// One page of the movement table (10 rows per page).
pub async fn movement_page(db: &DbState, page: usize) -> ApiResult<Page<Movement>> {
    let movements = list_movements(db, None).await?;
    Ok(paginate(&movements, page, MOVEMENTS_PAGE_SIZE))
}

pub async fn product_movements(db: &DbState, product_id: &str) -> ApiResult<Vec<Movement>> {
    Ok(db.inner().movements().list_for_product(product_id).await?)
}

pub async fn register_movement(
    db: &DbState,
    events: &EventHub,
    config: &ConfigState,
    request: &MovementRequest,
    user: Option<&str>,
) -> Outcome<MovementReceipt> {
    let user = config.user_or_default(user);
    let result = db
        .inner()
        .ledger()
        .register_movement(request, user)
        .await
        .map_err(ApiError::from);

    match &result {
        Ok(receipt) => {
            info!(
                product_id = %receipt.product.id,
                movement_type = %receipt.movement.movement_type,
                quantity = receipt.movement.quantity,
                stock = receipt.product.quantity,
                "Movement registered"
            );
            events.publish(InventoryEvent::MovementRecorded {
                movement_id: receipt.movement.id.clone(),
                product_id: receipt.product.id.clone(),
                movement_type: receipt.movement.movement_type,
                quantity: receipt.movement.quantity,
            });
            events.publish(InventoryEvent::ProductUpdated {
                product_id: receipt.product.id.clone(),
                quantity: receipt.product.quantity,
            });
        }
        Err(err) => {
            warn!(product_id = %request.product_id, error = %err, "Movement rejected");
        }
    }

    Outcome::from_result(result, REGISTERED, REGISTER_FAILED)
}

/// Stored quantity next to the sum of the product's movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerCheck {
    pub product_id: String,
    pub quantity: i64,
    pub ledger_balance: i64,
}

impl LedgerCheck {
    pub fn is_reconciled(&self) -> bool {
        self.quantity == self.ledger_balance
    }
}

pub async fn ledger_check(db: &DbState, product_id: &str) -> ApiResult<LedgerCheck> {
    let product = db
        .inner()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(ApiError::product_not_found)?;
    let ledger_balance = db.inner().movements().ledger_balance(product_id).await?;

    Ok(LedgerCheck {
        product_id: product.id,
        quantity: product.quantity,
        ledger_balance,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use inventics_core::{MovementType, ProductInput, Unit};
    use inventics_db::{Database, DbConfig};

    use super::*;
    use crate::commands::product::add_product;

    async fn setup_with_product(quantity: i64) -> (DbState, EventHub, ConfigState, String) {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let events = EventHub::new();
        let config = ConfigState::default();
        let input = ProductInput {
            name: "Arroz".to_string(),
            category: "Granos".to_string(),
            supplier: "Molinos del Valle".to_string(),
            quantity,
            unit: Unit::Kilogram,
            presentation: None,
            cost_cents: 180,
            price_cents: 250,
            entry_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            image_url: String::new(),
        };
        let id = add_product(&db, &events, &config, &input, None)
            .await
            .data
            .unwrap()
            .product
            .id;
        (db, events, config, id)
    }

    fn request(product_id: &str, movement_type: MovementType, quantity: i64) -> MovementRequest {
        MovementRequest {
            product_id: product_id.to_string(),
            movement_type,
            quantity,
            reason: "Venta mostrador".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_rejected() {
        let (db, events, config, id) = setup_with_product(10).await;
        let mut rx = events.subscribe();

        let outcome =
            register_movement(&db, &events, &config, &request(&id, MovementType::Outbound, 50), None)
                .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "No hay stock suficiente para Arroz. Stock actual: 10.");
        assert!(rx.try_recv().is_err());

        let check = ledger_check(&db, &id).await.unwrap();
        assert_eq!(check.quantity, 10);
        assert!(check.is_reconciled());
    }

    #[tokio::test]
    async fn test_register_updates_stock_and_ledger() {
        let (db, events, config, id) = setup_with_product(10).await;

        let inbound =
            register_movement(&db, &events, &config, &request(&id, MovementType::Inbound, 5), Some("ana"))
                .await;
        assert!(inbound.success);
        assert_eq!(inbound.message, REGISTERED);
        assert_eq!(inbound.data.unwrap().product.quantity, 15);

        let outbound =
            register_movement(&db, &events, &config, &request(&id, MovementType::Outbound, 15), None)
                .await;
        assert_eq!(outbound.data.unwrap().product.quantity, 0);

        let history = product_movements(&db, &id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(ledger_check(&db, &id).await.unwrap().is_reconciled());
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (db, events, config, _) = setup_with_product(1).await;

        let outcome = register_movement(
            &db,
            &events,
            &config,
            &request("6f1c0a52-8f0e-4c41-9a43-2d7f3c1b9e10", MovementType::Inbound, 1),
            None,
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Producto no encontrado.");
    }

    #[tokio::test]
    async fn test_movement_pages() {
        let (db, events, config, id) = setup_with_product(1).await;
        for _ in 0..11 {
            register_movement(&db, &events, &config, &request(&id, MovementType::Inbound, 1), None)
                .await;
        }

        let first = movement_page(&db, 1).await.unwrap();
        let second = movement_page(&db, 2).await.unwrap();

        assert_eq!(first.total_items, 12);
        assert_eq!(first.items.len(), 10);
        assert_eq!(second.items.len(), 2);
        assert_eq!(list_movements(&db, Some(3)).await.unwrap().len(), 3);
    }
}
