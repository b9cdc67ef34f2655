use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Inbound contact-form body, before validation.
///
/// Every field is optional here so that a missing field becomes a
/// validation error rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Fields that must be present for a submission to be accepted, in the
/// order they are reported.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "service", "message"];

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl LeadSubmission {
    /// Returns the required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [&self.name, &self.email, &self.service, &self.message];
        REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| present(value).is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    /// Validates the submission and builds the immutable lead record.
    pub fn into_lead(self, source: &str) -> Result<Lead, AppError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }

        let owned = |value: &Option<String>| present(value).unwrap_or_default().to_string();

        Ok(Lead {
            name: owned(&self.name),
            email: owned(&self.email),
            company: owned(&self.company),
            phone: owned(&self.phone),
            service: owned(&self.service),
            budget: present(&self.budget).map(str::to_string),
            message: owned(&self.message),
            source: source.to_string(),
            status: LeadStatus::New,
        })
    }
}

/// Lifecycle status of a lead. Every lead is created as `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
        }
    }
}

/// A validated lead, handed to exactly one delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub service: String,
    pub budget: Option<String>,
    pub message: String,
    pub source: String,
    pub status: LeadStatus,
}

impl Lead {
    /// Form fields sent to the fallback webhook, in wire order.
    pub fn webhook_form(&self, submitted_at: DateTime<Utc>) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("company", self.company.clone()),
            ("phone", self.phone.clone()),
            ("service", self.service.clone()),
            ("budget", self.budget.clone().unwrap_or_default()),
            ("message", self.message.clone()),
            ("source", self.source.clone()),
            (
                "timestamp",
                submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]
    }
}

/// Row returned by the lead store after an insert.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StoredLead {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Channel that accepted a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Primary,
    Fallback,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Primary => "primary",
            DeliveryMethod::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success body for `POST /api/contact`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    pub method: DeliveryMethod,
    /// Elapsed handling time in milliseconds.
    pub processing_time: u64,
}

pub const SUBMISSION_RECEIVED_MESSAGE: &str =
    "Thank you for reaching out! We'll get back to you within 24 hours.";
