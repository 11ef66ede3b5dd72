//! # Assistant State
//!
//! Holds the chat session, analyst and image generator built from the AI
//! section of the configuration. The chat conversation lives here, so it
//! survives between commands.

use inventics_ai::{AiResult, AiSettings, Assistant};

pub struct AssistantState {
    assistant: Assistant,
}

impl AssistantState {
    pub fn from_settings(settings: &AiSettings) -> AiResult<Self> {
        Ok(Self::new(Assistant::from_settings(settings)?))
    }

    pub fn new(assistant: Assistant) -> Self {
        AssistantState { assistant }
    }

    pub fn inner(&self) -> &Assistant {
        &self.assistant
    }
}

impl std::fmt::Debug for AssistantState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantState").finish_non_exhaustive()
    }
}
