//! # API Error Type
//!
//! Unified error type for commands, plus the `{ success, message }` outcome
//! every write command returns.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in InvenTICS                              │
//! │                                                                         │
//! │  register_movement(request)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  DbError::Domain(InsufficientStock) ──► ApiError {              │  │
//! │  │  DbError::NotFound                 ──►   code: NOT_FOUND, ...    │  │
//! │  │  DbError::QueryFailed              ──►   message: "..." }        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Outcome::from_result(result, "Movimiento registrado con éxito.",      │
//! │                               "Error al registrar el movimiento.")     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "success": false,                                                    │
//! │    "message": "No hay stock suficiente para Arroz. Stock actual: 10." } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operator-facing messages are Spanish. Storage failures are logged and
//! reported with the operation's generic failure message.

use inventics_ai::AiError;
use inventics_core::{CoreError, ValidationError};
use inventics_db::DbError;
use serde::Serialize;
use tracing::{error, warn};

/// API error returned from commands.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "No hay stock suficiente para Arroz. Stock actual: 10."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message for the operator
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    ValidationError,

    InsufficientStock,

    /// Code collision or similar uniqueness conflict.
    Conflict,

    /// Storage failed; details are only in the logs.
    DatabaseError,

    /// Generative-AI service unavailable.
    AssistantUnavailable,

    Internal,
}

impl ErrorCode {
    /// Whether the message is safe and useful to show as-is.
    ///
    /// Storage and internal failures are replaced by the operation's
    /// generic message.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ErrorCode::DatabaseError | ErrorCode::Internal)
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn product_not_found() -> Self {
        ApiError::new(ErrorCode::NotFound, "Producto no encontrado.")
    }

    pub fn insufficient_stock(product: &str, available: i64) -> Self {
        ApiError::new(
            ErrorCode::InsufficientStock,
            format!("No hay stock suficiente para {product}. Stock actual: {available}."),
        )
    }

    pub fn validation(err: &ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, format!("Datos inválidos: {err}."))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::product_not_found(),
            CoreError::InsufficientStock {
                product, available, ..
            } => ApiError::insufficient_stock(&product, available),
            CoreError::StockLimitExceeded { product, current, .. } => ApiError::new(
                ErrorCode::ValidationError,
                format!(
                    "La cantidad supera el máximo permitido para {product}. Stock actual: {current}."
                ),
            ),
            CoreError::Validation(e) => ApiError::validation(&e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(&err)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => ApiError::from(e),
            DbError::NotFound { entity, id } if entity == "Product" => {
                tracing::debug!(id = %id, "Product not found");
                ApiError::product_not_found()
            }
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{entity} no encontrado: {id}"))
            }
            DbError::UniqueViolation { field, .. } => {
                warn!(field = %field, "Unique constraint hit");
                ApiError::new(
                    ErrorCode::Conflict,
                    "Ya existe un producto con ese código. Intenta de nuevo.",
                )
            }
            DbError::ConstraintViolation { message } => {
                error!(message = %message, "Constraint violation");
                ApiError::new(ErrorCode::ValidationError, "Los datos no cumplen las reglas del inventario.")
            }
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Error de base de datos.")
            }
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::MissingApiKey => {
                ApiError::new(ErrorCode::AssistantUnavailable, "Error: Falta API Key.")
            }
            other => ApiError::new(ErrorCode::AssistantUnavailable, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Outcome
// =============================================================================

/// What a write command reports back to the operator.
///
/// ```json
/// { "success": true, "message": "Producto agregado exitosamente.", "data": { ... } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    /// Present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Outcome {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Folds a command result into an outcome.
    ///
    /// User-facing errors keep their own message; storage and internal
    /// errors fall back to `failure`.
    pub fn from_result(result: ApiResult<T>, success: &str, failure: &str) -> Self {
        match result {
            Ok(data) => Outcome::ok(success, data),
            Err(err) if err.code.is_user_facing() => Outcome::failed(err.message),
            Err(_) => Outcome::failed(failure),
        }
    }
}
