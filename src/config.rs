use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Spreadsheet webhook used when the database insert fails.
    /// `None` disables the fallback path.
    pub fallback_webhook_url: Option<Url>,
    /// Address shown to visitors when no channel accepted their message.
    pub contact_email: String,
    /// Tag stored on every lead to identify the origin channel.
    pub lead_source: String,
    pub webhook_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: lookup("DATABASE_URL")
                .or_else(|| lookup("DB_URL"))
                .ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL or DB_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DATABASE_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            fallback_webhook_url: lookup("FALLBACK_WEBHOOK_URL")
                .filter(|s| !s.trim().is_empty())
                .map(|raw| -> anyhow::Result<Url> {
                    let url = Url::parse(raw.trim()).map_err(|e| {
                        anyhow::anyhow!("FALLBACK_WEBHOOK_URL is not a valid URL: {}", e)
                    })?;
                    if url.scheme() != "http" && url.scheme() != "https" {
                        anyhow::bail!("FALLBACK_WEBHOOK_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?,
            contact_email: lookup("CONTACT_EMAIL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "hello@example.com".to_string()),
            lead_source: lookup("LEAD_SOURCE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "website".to_string()),
            webhook_timeout_secs: lookup("WEBHOOK_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("WEBHOOK_TIMEOUT_SECS must be a whole number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::debug!("Database host: {}", database_host(&config.database_url));
        match config.fallback_webhook_url {
            Some(ref url) => tracing::info!(
                "Fallback webhook configured: {}",
                url.host_str().unwrap_or("?")
            ),
            None => tracing::warn!("FALLBACK_WEBHOOK_URL not set, fallback delivery disabled"),
        }
        tracing::debug!("Lead source tag: {}", config.lead_source);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

/// Host part of a database URL, for logs. Credentials never leave this function.
fn database_host(database_url: &str) -> String {
    Url::parse(database_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "<unparseable>".to_string())
}
