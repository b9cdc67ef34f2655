use crate::errors::{AppError, ResultExt};
use crate::models::{Lead, StoredLead};
use sqlx::PgPool;
use uuid::Uuid;

const CREATE_LEADS_TABLE: &str = include_str!("../migrations/001_create_leads.sql");

/// Primary lead store backed by the `leads` table.
#[derive(Clone)]
pub struct LeadStorage {
    pool: PgPool,
}

impl LeadStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `leads` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_LEADS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create leads table")?;
        Ok(())
    }

    /// Inserts a lead and returns its id and server-assigned timestamps.
    ///
    /// Every call generates a fresh id, so resubmitting identical input
    /// produces a second row.
    pub async fn create(&self, lead: &Lead) -> Result<StoredLead, AppError> {
        let stored = sqlx::query_as::<_, StoredLead>(
            r#"
            INSERT INTO leads (id, name, email, company, phone, service, budget, message, source, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.phone)
        .bind(&lead.service)
        .bind(lead.budget.as_deref())
        .bind(&lead.message)
        .bind(&lead.source)
        .bind(lead.status.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert lead")?;

        tracing::debug!("Lead {} stored at {}", stored.id, stored.created_at);
        Ok(stored)
    }
}
