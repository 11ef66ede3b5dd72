//! # NutriBot Chat
//!
//! A conversational session grounded on the current inventory. The system
//! instruction embeds a compact JSON view of every product; when the product
//! set changes the conversation starts over with a fresh instruction.
//!
//! The index of the last model that answered is remembered, so the next
//! message starts there instead of retrying a model known to be saturated.

use std::sync::Arc;

use inventics_core::Product;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::backend::{Content, GenerateRequest, GenerativeBackend};
use crate::error::AiError;
use crate::rotation::ModelRotation;

pub const MISSING_KEY_REPLY: &str = "Error: Falta API Key.";

pub const TECHNICAL_ERROR_REPLY: &str =
    "Tuve un problema técnico no relacionado con la capacidad. Intenta reformular.";

pub const SATURATED_REPLY: &str =
    "😓 Mis servidores están muy ocupados en todos los canales gratuitos. Por favor, espera 1 minuto.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the visible conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Default)]
struct ChatState {
    history: Vec<ChatMessage>,
    /// Serialized products the current conversation was grounded on.
    fingerprint: Option<String>,
    preferred: usize,
}

pub struct ChatSession {
    backend: Option<Arc<dyn GenerativeBackend>>,
    rotation: ModelRotation,
    state: Mutex<ChatState>,
}

#[derive(Serialize)]
struct ContextItem<'a> {
    name: &'a str,
    qty: i64,
    price: f64,
    unit: &'a str,
}

/// System instruction for a conversation over `products`.
pub fn system_instruction(products: &[Product]) -> String {
    let context: Vec<ContextItem<'_>> = products
        .iter()
        .map(|p| ContextItem {
            name: &p.name,
            qty: p.quantity,
            price: p.price().as_units(),
            unit: p.unit.as_str(),
        })
        .collect();
    let context = serde_json::to_string_pretty(&context).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Eres NutriBot, el asistente de InvenTICS.\n\
         Tu objetivo: Ayudar con consultas sobre el inventario.\n\
         \n\
         Reglas:\n\
         1. Responde preguntas sobre cantidades, precios y productos basándote SOLO en el contexto JSON provisto.\n\
         2. Si un producto no está en la lista, di que no existe en el inventario.\n\
         3. Sé breve y directo.\n\
         \n\
         Contexto del inventario actual de InvenTICS:\n\
         {context}"
    )
}

impl ChatSession {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>, rotation: ModelRotation) -> Self {
        Self {
            backend,
            rotation,
            state: Mutex::new(ChatState::default()),
        }
    }

    /// Sends `message` and returns the reply, or a fallback sentence on failure.
    pub async fn send(&self, message: &str, products: &[Product]) -> String {
        let Some(backend) = self.backend.as_deref() else {
            warn!("Chat requested without an API key");
            return MISSING_KEY_REPLY.to_string();
        };

        let mut state = self.state.lock().await;

        let fingerprint = serde_json::to_string(products).unwrap_or_default();
        if state.fingerprint.as_deref() != Some(fingerprint.as_str()) {
            debug!(products = products.len(), "Inventory changed, starting a new conversation");
            state.history.clear();
            state.fingerprint = Some(fingerprint);
        }

        let mut contents: Vec<Content> = state
            .history
            .iter()
            .map(|m| match m.role {
                ChatRole::User => Content::user(m.text.clone()),
                ChatRole::Model => Content::model(m.text.clone()),
            })
            .collect();
        contents.push(Content::user(message));

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content::system(system_instruction(products))),
            generation_config: None,
        };

        match self.rotation.generate(backend, state.preferred, &request).await {
            Ok((idx, response)) => {
                state.preferred = idx;
                match response.text() {
                    Some(reply) => {
                        state.history.push(ChatMessage {
                            role: ChatRole::User,
                            text: message.to_string(),
                        });
                        state.history.push(ChatMessage {
                            role: ChatRole::Model,
                            text: reply.clone(),
                        });
                        reply
                    }
                    None => {
                        warn!("Model answered without text");
                        TECHNICAL_ERROR_REPLY.to_string()
                    }
                }
            }
            Err(AiError::Exhausted { attempts }) => {
                warn!(attempts, "Every chat model is saturated");
                SATURATED_REPLY.to_string()
            }
            Err(err) => {
                warn!(error = %err, "Chat failed");
                TECHNICAL_ERROR_REPLY.to_string()
            }
        }
    }

    /// Turns exchanged in the current conversation.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.history.clone()
    }

    /// Index into the rotation the next message will start from.
    pub async fn preferred_model(&self) -> usize {
        self.state.lock().await.preferred
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.history.clear();
        state.fingerprint = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use inventics_core::Unit;

    use super::*;
    use crate::rotation::testing::*;

    fn product(name: &str, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: format!("id-{name}"),
            code: "001".to_string(),
            name: name.to_string(),
            category: "Granos".to_string(),
            supplier: "Molinos".to_string(),
            quantity,
            unit: Unit::Kilogram,
            presentation: None,
            cost_cents: 150,
            price_cents: 250,
            entry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_url: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn rotation() -> ModelRotation {
        ModelRotation::new(vec!["lite".into(), "flash".into(), "exp".into()])
    }

    fn session(backend: &Arc<FakeBackend>) -> ChatSession {
        let backend: Arc<dyn GenerativeBackend> = backend.clone();
        ChatSession::new(Some(backend), rotation())
    }

    #[test]
    fn test_system_instruction_embeds_inventory() {
        let instruction = system_instruction(&[product("Arroz", 12)]);
        assert!(instruction.starts_with("Eres NutriBot"));
        assert!(instruction.contains("\"name\": \"Arroz\""));
        assert!(instruction.contains("\"qty\": 12"));
        assert!(instruction.contains("\"price\": 2.5"));
        assert!(instruction.contains("\"unit\": \"kg\""));
    }

    #[tokio::test]
    async fn test_missing_key_reply() {
        let chat = ChatSession::new(None, rotation());
        assert_eq!(chat.send("hola", &[]).await, MISSING_KEY_REPLY);
    }

    #[tokio::test]
    async fn test_reply_and_history() {
        let backend = Arc::new(FakeBackend::new(vec![text("Hay 12 kg de Arroz.")]));
        let chat = session(&backend);

        let reply = chat.send("¿Cuánto arroz hay?", &[product("Arroz", 12)]).await;

        assert_eq!(reply, "Hay 12 kg de Arroz.");
        let history = chat.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].text, "Hay 12 kg de Arroz.");
    }

    #[tokio::test]
    async fn test_preferred_model_sticks_after_rotation() {
        let backend = Arc::new(FakeBackend::new(vec![quota(), text("uno"), text("dos")]));
        let chat = session(&backend);
        let products = vec![product("Arroz", 12)];

        assert_eq!(chat.send("a", &products).await, "uno");
        assert_eq!(chat.preferred_model().await, 1);
        assert_eq!(chat.send("b", &products).await, "dos");

        assert_eq!(backend.models_called(), vec!["lite", "flash", "flash"]);
        // Second message carries the first exchange.
        assert_eq!(backend.requests()[2].contents.len(), 3);
    }

    #[tokio::test]
    async fn test_conversation_restarts_when_inventory_changes() {
        let backend = Arc::new(FakeBackend::new(vec![text("uno"), text("dos")]));
        let chat = session(&backend);

        chat.send("a", &[product("Arroz", 12)]).await;
        chat.send("b", &[product("Arroz", 11)]).await;

        let second = &backend.requests()[1];
        assert_eq!(second.contents.len(), 1);
        let instruction = second.system_instruction.as_ref().unwrap().text();
        assert!(instruction.contains("\"qty\": 11"));
        assert_eq!(chat.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_saturated_reply_when_all_models_fail() {
        let backend = Arc::new(FakeBackend::new(vec![quota(), quota(), quota()]));
        let chat = session(&backend);

        assert_eq!(chat.send("hola", &[]).await, SATURATED_REPLY);
        assert!(chat.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_technical_reply_on_other_errors() {
        let backend = Arc::new(FakeBackend::new(vec![bad_request()]));
        let chat = session(&backend);

        assert_eq!(chat.send("hola", &[]).await, TECHNICAL_ERROR_REPLY);
        assert_eq!(backend.models_called(), vec!["lite"]);
    }
}
