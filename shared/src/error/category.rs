//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 1xxx: Authentication errors
/// - 4xxx: Order payload errors
/// - 5xxx: Sheet store errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Authentication errors (1xxx)
    Auth,
    /// Order payload errors (4xxx)
    Order,
    /// Sheet store errors (5xxx)
    Store,
    /// System errors (everything else)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Auth,
            4000..5000 => Self::Order,
            5000..6000 => Self::Store,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Order => "order",
            Self::Store => "store",
            Self::System => "system",
        }
    }

    /// Errors in these categories point at the service or its dependencies,
    /// not at the caller, and are logged when rendered.
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::Store | Self::System)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
