//! # Dashboard & Report Commands
//!
//! Figures are computed in `inventics-core` from the current listings; this
//! module only fetches and hands them over.

use chrono::Utc;
use inventics_ai::AnalysisResult;
use inventics_core::summary::{DashboardSummary, InventoryReport};
use tracing::{debug, warn};

use crate::error::{ApiResult, Outcome};
use crate::state::{AssistantState, ConfigState, DbState};

pub const SUGGESTIONS_READY: &str = "Sugerencias generadas.";
pub const SUGGESTIONS_FAILED: &str =
    "No se pudieron obtener las sugerencias de la IA en este momento.";

pub async fn dashboard(db: &DbState, config: &ConfigState) -> ApiResult<DashboardSummary> {
    let products = db.inner().products().list_active().await?;
    let movements = db.inner().movements().list_recent(None).await?;

    let summary = DashboardSummary::compute(&products, &movements, config.low_stock_threshold());
    debug!(
        total_products = summary.total_products,
        out_of_stock = summary.out_of_stock,
        "dashboard computed"
    );
    Ok(summary)
}

pub async fn inventory_report(db: &DbState) -> ApiResult<InventoryReport> {
    let products = db.inner().products().list_active().await?;
    let movements = db.inner().movements().list_recent(None).await?;

    Ok(InventoryReport::compute(&products, &movements, Utc::now()))
}

/// High-demand and reorder suggestions from the assistant.
///
/// Any assistant failure becomes one fixed message; storage failures keep
/// their own.
pub async fn ai_suggestions(db: &DbState, assistant: &AssistantState) -> Outcome<AnalysisResult> {
    let products = match db.inner().products().list_active().await {
        Ok(p) => p,
        Err(err) => return Outcome::from_result(Err(err.into()), SUGGESTIONS_READY, SUGGESTIONS_FAILED),
    };
    let movements = match db.inner().movements().list_recent(None).await {
        Ok(m) => m,
        Err(err) => return Outcome::from_result(Err(err.into()), SUGGESTIONS_READY, SUGGESTIONS_FAILED),
    };

    match assistant.inner().analyst.analyze(&products, &movements).await {
        Ok(result) => Outcome::ok(SUGGESTIONS_READY, result),
        Err(err) => {
            warn!(error = %err, "AI suggestions unavailable");
            Outcome::failed(SUGGESTIONS_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use inventics_ai::backend::{GenerateRequest, GenerateResponse, GenerativeBackend};
    use inventics_ai::{AiResult, AiSettings, Assistant};
    use inventics_core::{MovementRequest, MovementType, ProductInput, Unit};
    use inventics_db::{Database, DbConfig};

    use super::*;
    use crate::commands::{movement, product};
    use crate::state::EventHub;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl GenerativeBackend for CannedBackend {
        async fn generate(&self, _model: &str, _request: &GenerateRequest) -> AiResult<GenerateResponse> {
            Ok(GenerateResponse::from_text(self.0))
        }
    }

    fn input(name: &str, quantity: i64, cost: i64, price: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            category: "Abarrotes".to_string(),
            supplier: "Distribuidora Central".to_string(),
            quantity,
            unit: Unit::Units,
            presentation: None,
            cost_cents: cost,
            price_cents: price,
            entry_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            image_url: String::new(),
        }
    }

    async fn seeded() -> DbState {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let events = EventHub::new();
        let config = ConfigState::default();

        let arroz = product::add_product(&db, &events, &config, &input("Arroz", 100, 200, 300), None)
            .await
            .data
            .unwrap();
        product::add_product(&db, &events, &config, &input("Leche", 0, 100, 150), None).await;
        product::add_product(&db, &events, &config, &input("Café", 20, 500, 800), None).await;

        let sale = MovementRequest {
            product_id: arroz.product.id,
            movement_type: MovementType::Outbound,
            quantity: 40,
            reason: "Venta".to_string(),
        };
        movement::register_movement(&db, &events, &config, &sale, None).await;
        db
    }

    #[tokio::test]
    async fn test_dashboard_figures() {
        let db = seeded().await;

        let summary = dashboard(&db, &ConfigState::default()).await.unwrap();

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_units, 80);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(summary.low_stock, 2);
        assert_eq!(summary.recent_movements.len(), 3);
    }

    #[tokio::test]
    async fn test_report_values() {
        let db = seeded().await;

        let report = inventory_report(&db).await.unwrap();

        assert_eq!(report.total_products, 3);
        // Arroz 60 × 2.00 + Café 20 × 5.00
        assert_eq!(report.value_at_cost_cents, 60 * 200 + 20 * 500);
        assert_eq!(report.value_at_price_cents, 60 * 300 + 20 * 800);
        assert_eq!(report.recent_movements.len(), 3);
    }

    #[tokio::test]
    async fn test_ai_suggestions() {
        let db = seeded().await;
        let backend: Arc<dyn GenerativeBackend> = Arc::new(CannedBackend(
            r#"{"highDemand":[{"productName":"Arroz","reason":"Ventas altas"}],"reorder":[]}"#,
        ));
        let assistant =
            AssistantState::new(Assistant::with_backend(Some(backend), &AiSettings::default()));

        let outcome = ai_suggestions(&db, &assistant).await;

        assert!(outcome.success);
        assert_eq!(outcome.data.unwrap().high_demand[0].product_name, "Arroz");
    }

    #[tokio::test]
    async fn test_ai_suggestions_without_key() {
        let db = seeded().await;
        let assistant = AssistantState::from_settings(&AiSettings::default()).unwrap();

        let outcome = ai_suggestions(&db, &assistant).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, SUGGESTIONS_FAILED);
    }
}
