//! Unified error codes for the booking sync service
//!
//! Error codes are organized by category:
//! - 1xxx: Authentication errors
//! - 4xxx: Order payload errors
//! - 5xxx: Sheet store errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the platform (and anyone
/// reading the logs) sees a stable number regardless of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 1xxx: Auth ====================
    /// Webhook request carried no credentials
    NotAuthenticated = 1001,
    /// Webhook shared secret does not match
    InvalidCredentials = 1002,

    // ==================== 4xxx: Order payload ====================
    /// Delivery body is not valid JSON
    PayloadMalformed = 4001,
    /// Delivery body is JSON but neither an order nor a list of orders
    PayloadShapeInvalid = 4002,
    /// Order type is not handled by the sync
    OrderTypeUnsupported = 4003,
    /// Order carries no external identifier
    OrderIdMissing = 4004,

    // ==================== 5xxx: Sheet store ====================
    /// Spreadsheet id or credentials are not configured
    StoreNotConfigured = 5001,
    /// Service account could not obtain an access token
    StoreAuthFailed = 5002,
    /// Spreadsheet API could not be reached
    StoreUnavailable = 5003,
    /// Spreadsheet API answered with an error status
    StoreRequestFailed = 5004,
    /// Spreadsheet API answered with an unexpected body
    StoreResponseInvalid = 5005,

    // ==================== 9xxx: System ====================
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Auth
            ErrorCode::NotAuthenticated => "Missing webhook authorization",
            ErrorCode::InvalidCredentials => "Invalid webhook authorization",

            // Order payload
            ErrorCode::PayloadMalformed => "Webhook payload is not valid JSON",
            ErrorCode::PayloadShapeInvalid => "Webhook payload has an unsupported shape",
            ErrorCode::OrderTypeUnsupported => "Order type is not supported",
            ErrorCode::OrderIdMissing => "Order has no identifier",

            // Sheet store
            ErrorCode::StoreNotConfigured => "Spreadsheet is not configured",
            ErrorCode::StoreAuthFailed => "Spreadsheet authentication failed",
            ErrorCode::StoreUnavailable => "Spreadsheet service unavailable",
            ErrorCode::StoreRequestFailed => "Spreadsheet request failed",
            ErrorCode::StoreResponseInvalid => "Spreadsheet returned an invalid response",

            // System
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable (per-record problems never reach the caller, but keep them mapped)
            Self::OrderTypeUnsupported | Self::OrderIdMissing => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway (the spreadsheet answered, badly)
            Self::StoreRequestFailed | Self::StoreResponseInvalid | Self::StoreAuthFailed => {
                StatusCode::BAD_GATEWAY
            }

            // 503 Service Unavailable (transient errors, platform can retry)
            Self::StoreUnavailable | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error (nothing the platform can fix by retrying)
            Self::StoreNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::PayloadMalformed | Self::PayloadShapeInvalid => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Order payload
            4001 => Ok(ErrorCode::PayloadMalformed),
            4002 => Ok(ErrorCode::PayloadShapeInvalid),
            4003 => Ok(ErrorCode::OrderTypeUnsupported),
            4004 => Ok(ErrorCode::OrderIdMissing),

            // Sheet store
            5001 => Ok(ErrorCode::StoreNotConfigured),
            5002 => Ok(ErrorCode::StoreAuthFailed),
            5003 => Ok(ErrorCode::StoreUnavailable),
            5004 => Ok(ErrorCode::StoreRequestFailed),
            5005 => Ok(ErrorCode::StoreResponseInvalid),

            // System
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
