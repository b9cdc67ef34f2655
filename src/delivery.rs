//! Delivery channels a lead can be handed to.
//!
//! The submission router walks an ordered list of [`DeliveryChannel`]s and
//! stops at the first one that accepts the lead.

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::lead_storage::LeadStorage;
use crate::models::{DeliveryMethod, Lead};
use crate::webhook_client::FallbackWebhookClient;

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Tag reported to the caller when this channel accepts a lead.
    fn method(&self) -> DeliveryMethod;

    /// Whether the channel can be attempted at all. An unconfigured channel
    /// is skipped without counting as a failure.
    fn is_configured(&self) -> bool {
        true
    }

    /// Hands the lead over. Returns the id assigned by the collaborator,
    /// if it assigns one.
    async fn attempt(&self, lead: &Lead) -> Result<Option<String>, AppError>;
}

/// Primary channel: insert into the Postgres lead store.
pub struct DatabaseChannel {
    storage: LeadStorage,
}

impl DatabaseChannel {
    pub fn new(storage: LeadStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl DeliveryChannel for DatabaseChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Primary
    }

    async fn attempt(&self, lead: &Lead) -> Result<Option<String>, AppError> {
        let stored = self.storage.create(lead).await?;
        Ok(Some(stored.id.to_string()))
    }
}

/// Fallback channel: post to the spreadsheet webhook, when one is configured.
pub struct WebhookChannel {
    client: Option<FallbackWebhookClient>,
}

impl WebhookChannel {
    pub fn new(client: Option<FallbackWebhookClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeliveryChannel for WebhookChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Fallback
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn attempt(&self, lead: &Lead) -> Result<Option<String>, AppError> {
        let client = self.client.as_ref().ok_or_else(|| {
            AppError::InternalError("Fallback webhook is not configured".to_string())
        })?;
        client.submit(lead, Utc::now()).await?;
        Ok(None)
    }
}
