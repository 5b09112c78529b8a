//! Sheet store error type
//!
//! `StoreError` covers everything that can go wrong talking to the
//! spreadsheet. Rejected requests stay inside the batch as per-record
//! failures; an unreachable store aborts the delivery and is converted into
//! `AppError` (logged once here).

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Spreadsheet id or credentials missing
    #[error("sheet store not configured: {0}")]
    NotConfigured(String),
    /// Access token could not be obtained
    #[error("sheet store authentication failed: {0}")]
    Auth(String),
    /// Network-level failure (connect, timeout, body decode)
    #[error("sheet store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-2xx status
    #[error("sheet store returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    /// The API answered 2xx with a body we cannot use
    #[error("sheet store returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotConfigured(_) => ErrorCode::StoreNotConfigured,
            StoreError::Auth(_) => ErrorCode::StoreAuthFailed,
            StoreError::Transport(e) if e.is_timeout() => ErrorCode::TimeoutError,
            StoreError::Transport(e) if e.is_decode() => ErrorCode::StoreResponseInvalid,
            StoreError::Transport(_) => ErrorCode::StoreUnavailable,
            StoreError::Api { status, .. } if *status >= 500 => ErrorCode::StoreUnavailable,
            StoreError::Api { .. } => ErrorCode::StoreRequestFailed,
            StoreError::InvalidResponse(_) => ErrorCode::StoreResponseInvalid,
        }
    }

    /// The store itself is down or unreachable, so no later record can
    /// succeed either. A 4xx answer only rejects the request at hand.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Transport(_) => true,
            StoreError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Sheet store failure aborted the delivery");
        AppError::with_message(e.code(), e.to_string())
    }
}
