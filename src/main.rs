use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_intake_api::app;
use lead_intake_api::config::Config;
use lead_intake_api::db::Database;
use lead_intake_api::delivery::{DatabaseChannel, WebhookChannel};
use lead_intake_api::handlers::AppState;
use lead_intake_api::lead_storage::LeadStorage;
use lead_intake_api::submission::SubmissionRouter;
use lead_intake_api::webhook_client::FallbackWebhookClient;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the lazy database pool and the
/// fallback webhook client, wires them into the submission router, and
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_intake_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // The pool connects on first use; an unreachable database at boot only
    // means submissions go to the fallback webhook.
    let db = Database::connect_lazy(&config.database_url)?;
    let storage = LeadStorage::new(db.pool.clone());
    match storage.ensure_schema().await {
        Ok(()) => tracing::info!("✓ Lead store ready"),
        Err(e) => tracing::warn!("⚠️  Lead store unavailable at startup: {}", e),
    }

    // A configured but unusable webhook is a startup error, not a silent
    // "fallback unavailable".
    let webhook_client = config
        .fallback_webhook_url
        .clone()
        .map(|url| FallbackWebhookClient::new(url, config.webhook_timeout()))
        .transpose()?;
    match &webhook_client {
        Some(_) => tracing::info!("✓ Fallback webhook client ready"),
        None => tracing::warn!("⚠️  FALLBACK_WEBHOOK_URL not set, fallback delivery disabled"),
    }

    let router = SubmissionRouter::new(config.lead_source.clone(), config.contact_email.clone())
        .with_channel(Arc::new(DatabaseChannel::new(storage)))
        .with_channel(Arc::new(WebhookChannel::new(webhook_client)));

    let port = config.port;
    let app_state = Arc::new(AppState { config, router });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    // Health check is added by `build` outside the rate-limited routes
    let protected_routes = app::api_routes().layer(GovernorLayer {
        config: governor_conf,
    });
    let app = app::build(app_state, protected_routes);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
