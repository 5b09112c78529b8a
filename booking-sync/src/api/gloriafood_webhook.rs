//! GloriaFood webhook handler
//!
//! POST /api/gloriafood-webhook. The body is taken raw and parsed here so a
//! malformed payload gets the unified 400 envelope instead of axum's plain
//! text rejection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use shared::error::AppError;

use crate::reconcile::{SyncSummary, normalize_delivery, process_batch};
use crate::state::AppState;

pub async fn handle_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SyncSummary>, AppError> {
    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(%e, "Failed to parse webhook JSON");
        AppError::malformed_payload(format!("Invalid JSON body: {e}"))
            .with_detail("line", e.line())
            .with_detail("column", e.column())
    })?;

    // Customer PII, debug only
    tracing::debug!(payload = %payload, "Webhook received");

    let orders = normalize_delivery(payload)?;
    if orders.is_empty() {
        tracing::info!("No orders in delivery");
        return Ok(Json(SyncSummary::empty()));
    }

    tracing::info!(
        count = orders.len(),
        backend = state.backend.name(),
        "Processing delivery"
    );

    let store = state.backend.connect().await?;
    let summary = process_batch(store.as_ref(), &state.reconciler, &orders).await?;

    Ok(Json(summary))
}
