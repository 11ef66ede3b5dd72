//! # Model Rotation
//!
//! ```text
//! start = 1, models = [lite, flash, exp]
//!
//!   flash ──429──► exp ──503──► lite ──200──► Ok((0, response))
//!                                       │
//!                  400 at any step ─────┴──► Err(that error)
//!                  all saturated ──────────► Err(Exhausted { attempts: 3 })
//! ```

use tracing::{info, warn};

use crate::backend::{GenerateRequest, GenerateResponse, GenerativeBackend};
use crate::error::{AiError, AiResult};

/// Ordered list of model names to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRotation {
    models: Vec<String>,
}

impl ModelRotation {
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// `(index, model)` pairs starting at `start`, wrapping around once.
    pub fn order_from(&self, start: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        let len = self.models.len();
        (0..len).map(move |step| {
            let idx = (start + step) % len;
            (idx, self.models[idx].as_str())
        })
    }

    /// Sends `request`, moving to the next model on capacity errors.
    ///
    /// Returns the index of the model that answered with its response.
    pub async fn generate(
        &self,
        backend: &dyn GenerativeBackend,
        start: usize,
        request: &GenerateRequest,
    ) -> AiResult<(usize, GenerateResponse)> {
        for (idx, model) in self.order_from(start) {
            match backend.generate(model, request).await {
                Ok(response) => {
                    info!(model = %model, "Model answered");
                    return Ok((idx, response));
                }
                Err(err) if err.is_capacity_error() => {
                    warn!(model = %model, error = %err, "Model saturated, rotating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AiError::Exhausted {
            attempts: self.models.len(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend shared by the assistant tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::backend::{GenerateRequest, GenerateResponse, GenerativeBackend};
    use crate::error::{AiError, AiResult};

    #[derive(Default)]
    pub struct FakeBackend {
        replies: Mutex<VecDeque<AiResult<GenerateResponse>>>,
        calls: Mutex<Vec<(String, GenerateRequest)>>,
    }

    impl FakeBackend {
        pub fn new(replies: Vec<AiResult<GenerateResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }

        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
        }
    }

    pub fn quota() -> AiResult<GenerateResponse> {
        Err(AiError::Http {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        })
    }

    pub fn bad_request() -> AiResult<GenerateResponse> {
        Err(AiError::Http {
            status: 400,
            message: "Invalid argument".to_string(),
        })
    }

    pub fn text(body: &str) -> AiResult<GenerateResponse> {
        Ok(GenerateResponse::from_text(body))
    }

    #[async_trait]
    impl GenerativeBackend for FakeBackend {
        async fn generate(&self, model: &str, request: &GenerateRequest) -> AiResult<GenerateResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::Transport("no scripted reply".to_string())))
        }
    }
}
