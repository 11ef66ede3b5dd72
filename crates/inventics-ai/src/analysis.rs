//! # Inventory Analysis
//!
//! Asks the model which products are in high demand and which need
//! reordering. Products and movements are reduced to the fields the model
//! needs (`n`, `q`, `t`) to keep the prompt small; only the latest 50
//! movements are sent. The answer is requested as JSON with a response
//! schema and parsed into [`AnalysisResult`].

use std::sync::Arc;

use inventics_core::summary::most_recent;
use inventics_core::{Movement, Product};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use ts_rs::TS;

use crate::backend::{GenerateRequest, GenerationConfig, GenerativeBackend};
use crate::error::{AiError, AiResult};
use crate::rotation::ModelRotation;

/// Movements included in the prompt.
pub const ANALYSIS_MOVEMENT_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalysisSuggestion {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalysisResult {
    #[serde(default)]
    pub high_demand: Vec<AnalysisSuggestion>,
    #[serde(default)]
    pub reorder: Vec<AnalysisSuggestion>,
}

pub struct InventoryAnalyst {
    backend: Option<Arc<dyn GenerativeBackend>>,
    rotation: ModelRotation,
}

#[derive(Serialize)]
struct CompactProduct<'a> {
    n: &'a str,
    q: i64,
}

#[derive(Serialize)]
struct CompactMovement<'a> {
    n: &'a str,
    t: &'a str,
    q: i64,
}

fn suggestion_list_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "productName": { "type": "STRING" },
                "reason": { "type": "STRING" }
            }
        }
    })
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "highDemand": suggestion_list_schema(),
            "reorder": suggestion_list_schema()
        }
    })
}

/// Builds the analysis prompt from the newest movements first.
pub fn analysis_prompt(products: &[Product], movements: &[Movement]) -> String {
    let products: Vec<CompactProduct<'_>> = products
        .iter()
        .map(|p| CompactProduct {
            n: &p.name,
            q: p.quantity,
        })
        .collect();

    let recent = most_recent(movements, ANALYSIS_MOVEMENT_LIMIT);
    let movements: Vec<CompactMovement<'_>> = recent
        .iter()
        .map(|m| CompactMovement {
            n: &m.product_name,
            t: m.movement_type.as_str(),
            q: m.quantity,
        })
        .collect();

    format!(
        "Analiza: Prod: {}, Movs: {}. Devuelve JSON con highDemand y reorder (productName, reason max 10 words).",
        serde_json::to_string(&products).unwrap_or_else(|_| "[]".to_string()),
        serde_json::to_string(&movements).unwrap_or_else(|_| "[]".to_string()),
    )
}

/// Parses the model's JSON, tolerating surrounding whitespace and code fences.
pub fn parse_analysis(raw: &str) -> AiResult<AnalysisResult> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|e| AiError::InvalidResponse(e.to_string()))
}

impl InventoryAnalyst {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>, rotation: ModelRotation) -> Self {
        Self { backend, rotation }
    }

    /// Runs the analysis.
    ///
    /// # Errors
    /// [`AiError::MissingApiKey`] without a key; [`AiError::Saturated`] when
    /// no model produced a parseable answer.
    pub async fn analyze(&self, products: &[Product], movements: &[Movement]) -> AiResult<AnalysisResult> {
        let backend = self.backend.as_deref().ok_or(AiError::MissingApiKey)?;

        let mut request = GenerateRequest::from_prompt(analysis_prompt(products, movements));
        request.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
            image_config: None,
        });

        let outcome = self
            .rotation
            .generate(backend, 0, &request)
            .await
            .and_then(|(_, response)| {
                let text = response
                    .text()
                    .ok_or_else(|| AiError::InvalidResponse("empty analysis".to_string()))?;
                parse_analysis(&text)
            });

        match outcome {
            Ok(result) => {
                info!(
                    high_demand = result.high_demand.len(),
                    reorder = result.reorder.len(),
                    "Inventory analysis ready"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "Inventory analysis failed");
                Err(AiError::Saturated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use inventics_core::{MovementType, Unit};

    use super::*;
    use crate::rotation::testing::*;

    fn product(name: &str, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: format!("id-{name}"),
            code: "001".to_string(),
            name: name.to_string(),
            category: "Lácteos".to_string(),
            supplier: "Alpina".to_string(),
            quantity,
            unit: Unit::Units,
            presentation: None,
            cost_cents: 100,
            price_cents: 200,
            entry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            image_url: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn movement(n: i64) -> Movement {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let at = base + Duration::minutes(n);
        Movement {
            id: format!("m-{n}"),
            product_id: "id-Leche".to_string(),
            product_name: format!("Leche {n}"),
            movement_type: MovementType::Outbound,
            quantity: n + 1,
            date: at.date_naive(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap() + Duration::minutes(n),
            user: "Admin".to_string(),
            reason: String::new(),
            created_at: at,
        }
    }

    fn analyst(backend: &Arc<FakeBackend>) -> InventoryAnalyst {
        let backend: Arc<dyn GenerativeBackend> = backend.clone();
        InventoryAnalyst::new(
            Some(backend),
            ModelRotation::new(vec!["lite".into(), "flash".into()]),
        )
    }

    #[test]
    fn test_prompt_is_compact_and_capped() {
        let movements: Vec<Movement> = (0..60).map(movement).collect();
        let prompt = analysis_prompt(&[product("Leche", 4)], &movements);

        assert!(prompt.starts_with("Analiza: Prod: [{\"n\":\"Leche\",\"q\":4}]"));
        assert_eq!(prompt.matches("\"t\":\"salida\"").count(), ANALYSIS_MOVEMENT_LIMIT);
        // Newest movement first, oldest ten dropped.
        assert!(prompt.contains("Leche 59"));
        assert!(!prompt.contains("\"Leche 9\""));
    }

    #[test]
    fn test_parse_analysis_accepts_fenced_json() {
        let raw = "```json\n{\"highDemand\":[{\"productName\":\"Leche\",\"reason\":\"Alta rotación\"}]}\n```";
        let result = parse_analysis(raw).unwrap();

        assert_eq!(result.high_demand.len(), 1);
        assert_eq!(result.high_demand[0].product_name, "Leche");
        assert!(result.reorder.is_empty());
    }

    #[test]
    fn test_parse_analysis_rejects_garbage() {
        assert!(parse_analysis("no es json").is_err());
    }

    #[tokio::test]
    async fn test_analyze_requests_json_and_rotates() {
        let body = r#"{"highDemand":[],"reorder":[{"productName":"Leche","reason":"Stock bajo"}]}"#;
        let backend = Arc::new(FakeBackend::new(vec![quota(), text(body)]));

        let result = analyst(&backend)
            .analyze(&[product("Leche", 4)], &[movement(1)])
            .await
            .unwrap();

        assert_eq!(result.reorder[0].reason, "Stock bajo");
        assert_eq!(backend.models_called(), vec!["lite", "flash"]);
        let config = backend.requests()[0].generation_config.clone().unwrap();
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(config.response_schema.unwrap()["properties"]["highDemand"].is_object());
    }

    #[tokio::test]
    async fn test_analyze_fails_saturated() {
        let backend = Arc::new(FakeBackend::new(vec![bad_request()]));
        let err = analyst(&backend).analyze(&[], &[]).await.unwrap_err();

        assert_eq!(err.to_string(), "Sistema saturado temporalmente.");
        assert_eq!(backend.models_called(), vec!["lite"]);
    }

    #[tokio::test]
    async fn test_analyze_without_key() {
        let analyst = InventoryAnalyst::new(None, ModelRotation::new(vec!["lite".into()]));
        let err = analyst.analyze(&[], &[]).await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));
    }
}
