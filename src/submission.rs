use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::delivery::DeliveryChannel;
use crate::errors::{AppError, DeliveryError};
use crate::models::{
    DeliveryMethod, LeadSubmission, SubmissionResponse, SUBMISSION_RECEIVED_MESSAGE,
};

/// A submission accepted by one of the channels.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub lead_id: Option<String>,
    pub method: DeliveryMethod,
    pub processing_time: Duration,
}

/// A submission that was rejected or that no channel accepted.
///
/// `error` decides what the caller sees; `failures` keeps the captured
/// channel errors for diagnostics only.
#[derive(Debug)]
pub struct SubmissionFailure {
    pub error: AppError,
    pub failures: Vec<DeliveryError>,
    pub processing_time: Duration,
}

impl SubmissionFailure {
    /// A failure raised before any channel was tried.
    pub fn rejected(error: AppError, processing_time: Duration) -> Self {
        Self {
            error,
            failures: Vec::new(),
            processing_time,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self.error,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::PayloadTooLarge(_)
        )
    }
}

/// Routes a lead through an ordered list of delivery channels.
///
/// Channels are attempted strictly in sequence and the first success wins,
/// so a lead is never delivered twice within one submission.
pub struct SubmissionRouter {
    channels: Vec<Arc<dyn DeliveryChannel>>,
    lead_source: String,
    contact_email: String,
}

impl SubmissionRouter {
    pub fn new(lead_source: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self {
            channels: Vec::new(),
            lead_source: lead_source.into(),
            contact_email: contact_email.into(),
        }
    }

    /// Appends a channel after the ones already registered.
    pub fn with_channel(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Whether a registered channel for `method` is able to take leads.
    pub fn channel_configured(&self, method: DeliveryMethod) -> bool {
        self.channels
            .iter()
            .any(|channel| channel.method() == method && channel.is_configured())
    }

    /// Parses, validates and delivers a raw contact-form body.
    pub async fn submit(&self, raw_body: &[u8]) -> Result<SubmissionReceipt, SubmissionFailure> {
        let start = Instant::now();
        tracing::info!("📨 Received contact submission ({} bytes)", raw_body.len());
        let submission = parse_submission(raw_body).map_err(|e| {
            tracing::warn!("Rejected malformed contact body: {}", e);
            SubmissionFailure::rejected(
                AppError::BadRequest("Request body must be a JSON object".to_string()),
                start.elapsed(),
            )
        })?;

        let lead = submission.into_lead(&self.lead_source).map_err(|e| {
            tracing::warn!("❌ Contact submission rejected: {}", e);
            SubmissionFailure::rejected(e, start.elapsed())
        })?;

        tracing::debug!("Lead validated: service={}, email={}", lead.service, lead.email);

        let mut failures = Vec::new();

        for channel in &self.channels {
            let method = channel.method();

            if !channel.is_configured() {
                tracing::warn!("⚠️  {} delivery not configured, skipping", method);
                continue;
            }

            match channel.attempt(&lead).await {
                Ok(lead_id) => {
                    let processing_time = start.elapsed();
                    tracing::info!(
                        "✅ Lead delivered via {} (id={}, {}ms)",
                        method,
                        lead_id.as_deref().unwrap_or("-"),
                        processing_time.as_millis()
                    );
                    return Ok(SubmissionReceipt {
                        lead_id,
                        method,
                        processing_time,
                    });
                }
                Err(e) => {
                    let failure = DeliveryError::new(method, e);
                    tracing::error!(detail = ?failure.source_error(), "{}", failure);
                    failures.push(failure);
                }
            }
        }

        tracing::error!(
            "No delivery channel accepted the lead ({} failed attempt(s))",
            failures.len()
        );
        Err(SubmissionFailure {
            error: AppError::DeliveryFailed {
                contact_email: self.contact_email.clone(),
            },
            failures,
            processing_time: start.elapsed(),
        })
    }
}

impl From<&SubmissionReceipt> for SubmissionResponse {
    fn from(receipt: &SubmissionReceipt) -> Self {
        SubmissionResponse {
            success: true,
            message: SUBMISSION_RECEIVED_MESSAGE.to_string(),
            lead_id: receipt.lead_id.clone(),
            method: receipt.method,
            processing_time: millis(receipt.processing_time),
        }
    }
}

impl IntoResponse for SubmissionReceipt {
    fn into_response(self) -> Response {
        Json(SubmissionResponse::from(&self)).into_response()
    }
}

impl IntoResponse for SubmissionFailure {
    fn into_response(self) -> Response {
        let (status, mut body) = self.error.status_and_body();
        body["processingTime"] = millis(self.processing_time).into();
        (status, Json(body)).into_response()
    }
}

/// Decodes the body, accepting only a JSON object. Serde would otherwise
/// also map a positional array onto the struct fields.
fn parse_submission(raw_body: &[u8]) -> Result<LeadSubmission, serde_json::Error> {
    match serde_json::from_slice::<Value>(raw_body)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        _ => Err(<serde_json::Error as serde::de::Error>::custom(
            "expected a JSON object",
        )),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
