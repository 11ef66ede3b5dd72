//! # AI Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AiError                           is_capacity_error()                 │
//! │  ├── Http { 429, .. }              yes → try next model                │
//! │  ├── Http { 503, .. }              yes → try next model                │
//! │  ├── Http { _, "...quota..." }     yes → try next model                │
//! │  ├── Http { 400, .. }              no  → give up                        │
//! │  ├── Transport / InvalidResponse   no  → give up                        │
//! │  ├── MissingApiKey                 no  → fallback immediately          │
//! │  └── Exhausted                     every model was saturated           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key missing")]
    MissingApiKey,

    /// Non-success HTTP status from the model API.
    #[error("model API returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Network failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but had no usable content.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Every model in the rotation was rate-limited or overloaded.
    #[error("all {attempts} models are saturated")]
    Exhausted { attempts: usize },

    /// Analysis could not be produced.
    #[error("Sistema saturado temporalmente.")]
    Saturated,
}

impl AiError {
    /// Rate-limit or overload: worth retrying on another model.
    pub fn is_capacity_error(&self) -> bool {
        match self {
            AiError::Http { status, message } => {
                *status == 429
                    || *status == 503
                    || message.contains("429")
                    || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AiError::Transport(err.to_string()),
        }
    }
}

pub type AiResult<T> = Result<T, AiError>;
