//! Unified error system for the booking sync service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified error body
//!
//! # Error Code Ranges
//!
//! - 1xxx: Authentication errors
//! - 4xxx: Order payload errors
//! - 5xxx: Sheet store errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InvalidCredentials);
//!
//! let err = AppError::malformed_payload("expected value at line 1 column 1")
//!     .with_detail("line", 1);
//!
//! let response = ApiResponse::error(&err);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
