//! booking-sync: webhook receiver for the restaurant's ordering platform
//!
//! Long-running service that:
//! - Receives GloriaFood order / reservation webhooks
//! - Upserts table reservations into the `Dati` tab
//! - Upserts pickup orders into the `Asporto` tab

use booking_sync::error::BoxError;
use booking_sync::{AppState, Config, api, logging};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    logging::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    tracing::info!(
        environment = %config.environment,
        backend = ?config.backend,
        timezone = %config.timezone,
        "Starting booking-sync"
    );
    if config.webhook_secret.is_none() {
        tracing::warn!("GLORIAFOOD_WEBHOOK_SECRET not set, webhook accepts unauthenticated calls");
    }

    let state = AppState::new(&config)?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("booking-sync HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
