//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use async_trait::async_trait;
use lead_intake_api::config::Config;
use lead_intake_api::delivery::DeliveryChannel;
use lead_intake_api::errors::AppError;
use lead_intake_api::models::{DeliveryMethod, Lead};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const CONTACT_EMAIL: &str = "hello@example.com";
pub const INTERNAL_DETAIL: &str = "connection refused by db-primary-7";

/// Channel double that records every lead it is handed.
pub struct StubChannel {
    method: DeliveryMethod,
    configured: bool,
    outcome: Result<Option<String>, String>,
    calls: AtomicUsize,
    received: Mutex<Vec<Lead>>,
}

impl StubChannel {
    pub fn succeeding(method: DeliveryMethod, lead_id: Option<&str>) -> Self {
        Self::build(method, true, Ok(lead_id.map(str::to_string)))
    }

    pub fn failing(method: DeliveryMethod) -> Self {
        Self::build(method, true, Err(INTERNAL_DETAIL.to_string()))
    }

    pub fn unconfigured(method: DeliveryMethod) -> Self {
        Self::build(method, false, Ok(None))
    }

    fn build(
        method: DeliveryMethod,
        configured: bool,
        outcome: Result<Option<String>, String>,
    ) -> Self {
        Self {
            method,
            configured,
            outcome,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<Lead> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannel for StubChannel {
    fn method(&self) -> DeliveryMethod {
        self.method
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn attempt(&self, lead: &Lead) -> Result<Option<String>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(lead.clone());
        self.outcome
            .clone()
            .map_err(AppError::ExternalApiError)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgresql://test".to_string(),
        port: 8080,
        fallback_webhook_url: None,
        contact_email: CONTACT_EMAIL.to_string(),
        lead_source: "website".to_string(),
        webhook_timeout_secs: 5,
    }
}

pub fn valid_body() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "name": "Jo",
        "email": "jo@x.com",
        "service": "SEO",
        "message": "hi"
    }))
    .unwrap()
}
