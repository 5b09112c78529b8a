//! Shared-secret check for platform webhooks
//!
//! GloriaFood sends the configured key verbatim in `Authorization` (no
//! `Bearer` scheme). The check runs before the body is read.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;

use crate::logging::SECURITY_TARGET;
use crate::state::AppState;

pub async fn webhook_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(expected) = state.webhook_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(target: SECURITY_TARGET, event = "webhook_auth_missing", "Webhook call without Authorization header");
            AppError::not_authenticated().into_response()
        })?;

    if provided != expected {
        tracing::warn!(target: SECURITY_TARGET, event = "webhook_auth_invalid", "Webhook call with wrong Authorization header");
        return Err(AppError::invalid_credentials().into_response());
    }

    Ok(next.run(request).await)
}
