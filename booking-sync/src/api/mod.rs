//! API routes for booking-sync

pub mod gloriafood_webhook;
pub mod health;

use crate::auth::webhook_secret_middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Platform webhook (shared secret, raw body)
    let webhook = Router::new()
        .route(
            "/api/gloriafood-webhook",
            post(gloriafood_webhook::handle_webhook),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            webhook_secret_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(webhook)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
