//! # inventics-ai: Inventory Assistant
//!
//! Chat, demand analysis and image generation on top of a Gemini-style
//! `generateContent` API, with model rotation when a model runs out of quota.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          inventics-ai                                   │
//! │                                                                         │
//! │   ┌─────────────┐   ┌─────────────────┐   ┌─────────────────┐          │
//! │   │ ChatSession │   │ InventoryAnalyst│   │ ImageGenerator  │          │
//! │   │ (NutriBot)  │   │ highDemand /    │   │ data:image/...  │          │
//! │   │             │   │ reorder JSON    │   │                 │          │
//! │   └──────┬──────┘   └────────┬────────┘   └────────┬────────┘          │
//! │          │                   │                     │                    │
//! │          └─────────┬─────────┘                     │                    │
//! │                    ▼                               │                    │
//! │          ModelRotation (429 / 503 / quota → next)  │                    │
//! │                    │                               │                    │
//! │                    ▼                               ▼                    │
//! │          ┌─────────────────────────────────────────────────┐           │
//! │          │ dyn GenerativeBackend  (GeminiClient | fake)     │           │
//! │          └─────────────────────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures degrade instead of propagating: chat answers with fixed Spanish
//! fallback text, images return `None`. Only analysis surfaces an error.

pub mod analysis;
pub mod backend;
pub mod chat;
pub mod error;
pub mod gemini;
pub mod image;
pub mod rotation;

use std::sync::Arc;

pub use analysis::{AnalysisResult, AnalysisSuggestion, InventoryAnalyst};
pub use backend::{GenerateRequest, GenerateResponse, GenerativeBackend};
pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use image::{AspectRatio, ImageGenerator};
pub use rotation::ModelRotation;

// =============================================================================
// Defaults
// =============================================================================

/// Text models tried in order: lightest first.
pub const DEFAULT_MODELS: [&str; 3] = [
    "gemini-flash-lite-latest",
    "gemini-2.5-flash",
    "gemini-2.0-flash-exp",
];

/// Image model. Not rotated.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// Settings
// =============================================================================

/// What the assistant needs to reach the model API.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    /// `None` or empty disables every remote call.
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub image_model: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

// =============================================================================
// Assistant
// =============================================================================

/// The three assistant features sharing one backend.
pub struct Assistant {
    pub chat: ChatSession,
    pub analyst: InventoryAnalyst,
    pub images: ImageGenerator,
}

impl Assistant {
    /// Builds the assistant against the real API.
    ///
    /// Without an API key the assistant still works, answering with the
    /// missing-key fallbacks.
    pub fn from_settings(settings: &AiSettings) -> AiResult<Self> {
        let backend: Option<Arc<dyn GenerativeBackend>> = match settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Some(Arc::new(GeminiClient::new(
                key.trim(),
                &settings.base_url,
            )?)),
            _ => None,
        };

        Ok(Self::with_backend(backend, settings))
    }

    /// Builds the assistant on any backend (used by tests).
    pub fn with_backend(backend: Option<Arc<dyn GenerativeBackend>>, settings: &AiSettings) -> Self {
        let rotation = ModelRotation::new(settings.models.clone());
        Self {
            chat: ChatSession::new(backend.clone(), rotation.clone()),
            analyst: InventoryAnalyst::new(backend.clone(), rotation),
            images: ImageGenerator::new(backend, settings.image_model.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assistant_without_key_degrades() {
        let assistant = Assistant::from_settings(&AiSettings::default()).unwrap();

        assert_eq!(assistant.chat.send("hola", &[]).await, chat::MISSING_KEY_REPLY);
        assert!(matches!(
            assistant.analyst.analyze(&[], &[]).await,
            Err(AiError::MissingApiKey)
        ));
        assert!(assistant.images.product_photo("Arroz").await.is_none());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let settings = AiSettings {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(Assistant::from_settings(&settings).is_ok());
    }
}
