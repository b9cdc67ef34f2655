use axum::http::StatusCode;
use serde_json::{json, Value};
use std::fmt;

use crate::models::DeliveryMethod;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Bad request error (body could not be parsed).
    BadRequest(String),
    /// Body exceeded the configured size limit (bytes).
    PayloadTooLarge(usize),
    /// One or more required lead fields were missing.
    Validation(Vec<&'static str>),
    /// Error interacting with an external API.
    ExternalApiError(String),
    /// No delivery channel accepted the lead.
    DeliveryFailed {
        /// Address shown to the visitor so they can reach us directly.
        contact_email: String,
    },
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::PayloadTooLarge(limit) => {
                write!(f, "Request body exceeds {} bytes", limit)
            }
            AppError::Validation(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::DeliveryFailed { .. } => write!(f, "No delivery channel accepted the lead"),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error to a status code and a caller-safe JSON body.
    ///
    /// Only the 4xx variants echo details back; every other
    /// variant answers with a fixed message and logs the detail instead.
    pub fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Database error" }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::PayloadTooLarge(_) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "success": false, "error": self.to_string() }),
            ),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": self.to_string(),
                    "missingFields": fields,
                }),
            ),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "success": false, "error": "External service error" }),
                )
            }
            AppError::DeliveryFailed { contact_email } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "message": delivery_failed_message(contact_email),
                }),
            ),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Internal server error" }),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                source.status_and_body()
            }
        }
    }
}

/// The message shown when neither channel accepted a submission.
pub fn delivery_failed_message(contact_email: &str) -> String {
    format!(
        "We couldn't submit your message right now. Please email us directly at {}.",
        contact_email
    )
}

/// An error captured at a delivery channel boundary.
///
/// A `Primary` error is recoverable and hands the lead to the next channel;
/// a `Fallback` error is terminal.
#[derive(Debug)]
pub enum DeliveryError {
    Primary(AppError),
    Fallback(AppError),
}

impl DeliveryError {
    pub fn new(method: DeliveryMethod, source: AppError) -> Self {
        match method {
            DeliveryMethod::Primary => DeliveryError::Primary(source),
            DeliveryMethod::Fallback => DeliveryError::Fallback(source),
        }
    }

    pub fn method(&self) -> DeliveryMethod {
        match self {
            DeliveryError::Primary(_) => DeliveryMethod::Primary,
            DeliveryError::Fallback(_) => DeliveryMethod::Fallback,
        }
    }

    pub fn source_error(&self) -> &AppError {
        match self {
            DeliveryError::Primary(e) | DeliveryError::Fallback(e) => e,
        }
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Primary(e) => write!(f, "Primary delivery failed: {}", e),
            DeliveryError::Fallback(e) => write!(f, "Fallback delivery failed: {}", e),
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

/// Extension for sqlx::Error to add context
impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: context.into(),
        })
    }
}
