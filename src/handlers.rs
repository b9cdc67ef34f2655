use crate::config::Config;
use crate::errors::AppError;
use crate::models::DeliveryMethod;
use crate::submission::{SubmissionFailure, SubmissionRouter};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Ordered primary/fallback delivery pipeline.
    pub router: SubmissionRouter,
}

/// Health check endpoint.
///
/// Returns the service status and version. `fallbackConfigured` reflects
/// the fallback channel the router actually holds.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "fallbackConfigured": state.router.channel_configured(DeliveryMethod::Fallback)
        })),
    )
}

/// POST /api/contact
///
/// Accepts a contact-form lead and hands it to the first delivery channel
/// that takes it. The body is read as raw bytes, and a body that cannot be
/// read at all still gets the uniform `{success:false, ...}` response.
///
/// # Returns
///
/// * `200` with `method` set to `primary` or `fallback` on delivery.
/// * `400` when the body is malformed or required fields are missing.
/// * `413` when the body exceeds the configured limit.
/// * `500` with a direct contact address when every channel failed.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Contact body could not be read: {}", rejection.body_text());
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(crate::app::MAX_BODY_BYTES)
            } else {
                AppError::BadRequest("Request body could not be read".to_string())
            };
            return SubmissionFailure::rejected(error, Duration::ZERO).into_response();
        }
    };

    match state.router.submit(&body).await {
        Ok(receipt) => receipt.into_response(),
        Err(failure) => failure.into_response(),
    }
}
