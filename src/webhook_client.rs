use crate::errors::AppError;
use crate::models::Lead;
use chrono::{DateTime, Utc};
use std::time::Duration;
use url::Url;

/// Client for the spreadsheet intake webhook used as the fallback channel.
#[derive(Clone)]
pub struct FallbackWebhookClient {
    client: reqwest::Client,
    url: Url,
}

impl FallbackWebhookClient {
    /// Creates a new `FallbackWebhookClient`.
    ///
    /// # Arguments
    ///
    /// * `url` - The webhook endpoint.
    /// * `timeout` - Per-request timeout covering connect and response.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create webhook client: {}", e))
            })?;

        Ok(Self { client, url })
    }

    /// Posts the lead as form-encoded fields.
    ///
    /// Success is decided by the final HTTP status only; the response body
    /// is read solely for diagnostics.
    pub async fn submit(&self, lead: &Lead, submitted_at: DateTime<Utc>) -> Result<(), AppError> {
        tracing::info!(
            "Posting lead to fallback webhook: {}",
            self.url.host_str().unwrap_or("?")
        );

        let response = self
            .client
            .post(self.url.clone())
            .form(&lead.webhook_form(submitted_at))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Webhook returned {}: {}",
                status, error_text
            )));
        }

        tracing::info!("✓ Fallback webhook accepted lead ({})", response.status());
        Ok(())
    }
}
