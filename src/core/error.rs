//! Typed error handling for the order wizard
//!
//! Every fallible operation in the crate returns [`WizardError`], which wraps a
//! category-specific error so callers can match on what actually went wrong
//! instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`OrderError`]: missing orders, blocked navigation, illegal status changes
//! - [`ValidationError`]: rejected user input (titles, customer info, payloads)
//! - [`StorageError`]: snapshot persistence failures
//! - [`ExportError`]: failures at the export/notification boundary
//! - [`ConfigError`]: configuration parsing and validation
//!
//! Referential misses on details, exports or sizes are *not* errors: the store
//! treats them as no-ops because the UI may race with stale ids.
//!
//! # Example
//!
//! ```rust,ignore
//! match store.navigate_to(WizardStep::Details) {
//!     Ok(step) => println!("now on {}", step.label()),
//!     Err(WizardError::Order(OrderError::StepBlocked { step })) => {
//!         println!("{} is not reachable yet", step.label());
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::order::OrderStatus;
use crate::workflow::WizardStep;

/// The main error type for the order wizard
#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (lock poisoning and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl WizardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WizardError::Order(e) => e.status_code(),
            WizardError::Validation(_) => StatusCode::BAD_REQUEST,
            WizardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WizardError::Export(e) => e.status_code(),
            WizardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WizardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            WizardError::Order(e) => e.error_code(),
            WizardError::Validation(_) => "VALIDATION_ERROR",
            WizardError::Storage(_) => "STORAGE_ERROR",
            WizardError::Export(e) => e.error_code(),
            WizardError::Config(_) => "CONFIG_ERROR",
            WizardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            WizardError::Order(OrderError::NotFound { id }) => {
                Some(serde_json::json!({ "order_id": id.to_string() }))
            }
            WizardError::Order(OrderError::StepBlocked { step }) => Some(serde_json::json!({
                "step": step.number(),
                "route": step.route(),
            })),
            WizardError::Order(OrderError::InvalidStatusTransition { from, to, .. }) => {
                Some(serde_json::json!({ "from": from, "to": to }))
            }
            WizardError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            WizardError::Validation(ValidationError::FieldError { field, message }) => Some(
                serde_json::json!({ "fields": [{ "field": field, "message": message }] }),
            ),
            _ => None,
        }
    }
}

impl IntoResponse for WizardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Errors related to orders and wizard navigation
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order was not found
    #[error("Order with id '{id}' not found")]
    NotFound { id: Uuid },

    /// An operation needed a current order and none is loaded
    #[error("No order is currently loaded")]
    NoCurrentOrder,

    /// Status change not permitted by the transition table
    #[error("Order '{id}' cannot move from {from} to {to}")]
    InvalidStatusTransition {
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Forward navigation refused by the step gate
    #[error("Step {} ({}) is not reachable yet", .step.number(), .step.label())]
    StepBlocked { step: WizardStep },

    /// A step number or route outside the wizard
    #[error("Unknown wizard step: {value}")]
    InvalidStep { value: String },
}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::NoCurrentOrder => StatusCode::CONFLICT,
            OrderError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            OrderError::StepBlocked { .. } => StatusCode::CONFLICT,
            OrderError::InvalidStep { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::NoCurrentOrder => "NO_CURRENT_ORDER",
            OrderError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            OrderError::StepBlocked { .. } => "STEP_BLOCKED",
            OrderError::InvalidStep { .. } => "INVALID_STEP",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Names of the offending fields, sorted
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldError { field, .. } => vec![field.as_str()],
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldValidationError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for WizardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        WizardError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised while reading or writing the persisted slot
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or failed an I/O operation
    #[error("{backend} storage error: {message}")]
    Backend { backend: String, message: String },

    /// The slot content could not be encoded or decoded
    #[error("Failed to (de)serialize slot '{slot}': {message}")]
    Serialization { slot: String, message: String },
}

impl StorageError {
    pub fn backend(backend: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            backend: backend.into(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors at the export and notification boundary
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sink is missing credentials or targets
    #[error("{sink} export is not configured")]
    NotConfigured { sink: String },

    /// The remote service could not be reached
    #[error("{sink} request failed: {message}")]
    Request { sink: String, message: String },

    /// The remote service answered with a failure
    #[error("{sink} rejected the request ({status}): {message}")]
    Rejected {
        sink: String,
        status: u16,
        message: String,
    },
}

impl ExportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::NotConfigured { .. } => StatusCode::PRECONDITION_FAILED,
            ExportError::Request { .. } => StatusCode::BAD_GATEWAY,
            ExportError::Rejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::NotConfigured { .. } => "EXPORT_NOT_CONFIGURED",
            ExportError::Request { .. } => "EXPORT_REQUEST_FAILED",
            ExportError::Rejected { .. } => "EXPORT_REJECTED",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error reading '{path}': {message}")]
    IoError { path: String, message: String },
}
