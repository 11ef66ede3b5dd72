//! # Assistant Commands
//!
//! Chat with NutriBot and image generation. The chat is always grounded on
//! the current active products, read fresh for every message.

use inventics_ai::{AspectRatio, ChatMessage, ChatRole};
use inventics_core::ValidationError;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{AssistantState, DbState};

/// First message shown when the chat opens.
pub const GREETING: &str = "¡Hola! Soy NutriBot. ¿En qué puedo ayudarte hoy?";

pub fn greeting() -> ChatMessage {
    ChatMessage {
        role: ChatRole::Model,
        text: GREETING.to_string(),
    }
}

/// Sends a chat message and returns NutriBot's reply.
///
/// Assistant failures come back as a reply with fallback text; only a blank
/// message or a storage failure is an error.
pub async fn chat(db: &DbState, assistant: &AssistantState, message: &str) -> ApiResult<ChatMessage> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::validation(&ValidationError::Required {
            field: "mensaje".to_string(),
        }));
    }

    let products = db.inner().products().list_active().await?;
    debug!(products = products.len(), "chat command");

    let reply = assistant.inner().chat.send(message, &products).await;
    Ok(ChatMessage {
        role: ChatRole::Model,
        text: reply,
    })
}

pub async fn chat_history(assistant: &AssistantState) -> Vec<ChatMessage> {
    assistant.inner().chat.history().await
}

/// Free-form image from a prompt. `None` when generation failed.
pub async fn generate_image(
    assistant: &AssistantState,
    prompt: &str,
    aspect_ratio: AspectRatio,
) -> ApiResult<Option<String>> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::validation(&ValidationError::Required {
            field: "descripción".to_string(),
        }));
    }
    Ok(assistant.inner().images.generate(prompt, aspect_ratio).await)
}

pub async fn product_photo(assistant: &AssistantState, product_name: &str) -> Option<String> {
    assistant.inner().images.product_photo(product_name).await
}

pub async fn simulated_scan(assistant: &AssistantState, product_name: &str) -> Option<String> {
    assistant.inner().images.simulated_scan(product_name).await
}
