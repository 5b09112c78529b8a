//! Order Model
//!
//! Normalized view of a GloriaFood order or table reservation. Built fresh for
//! every webhook delivery and never persisted as-is.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Platform order type (`type` field on the wire)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    TableReservation,
    Pickup,
    /// Anything else (`delivery`, `dine_in`, typos...). Never synced.
    Other(String),
}

impl OrderKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "table_reservation" => Self::TableReservation,
            "pickup" => Self::Pickup,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            Self::TableReservation => "table_reservation",
            Self::Pickup => "pickup",
            Self::Other(code) => code,
        }
    }
}

/// Platform order status (`status` field on the wire)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Accepted,
    Rejected,
    Canceled,
    TimedOut,
    #[default]
    Pending,
    /// Status code this service does not know about; rendered as pending.
    Unknown(String),
}

impl OrderStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "canceled" | "cancelled" => Self::Canceled,
            "timed_out" | "missed" => Self::TimedOut,
            "pending" => Self::Pending,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// One line of a pickup order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
}

/// Normalized order / reservation record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// External identifier assigned by the platform, always compared as a string
    pub id: String,
    pub kind: OrderKind,
    /// Scheduled fulfillment instant (`None` when absent or unparsable)
    pub fulfill_at: Option<DateTime<Utc>>,
    /// Acceptance instant, pickup orders only
    pub accepted_at: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Party size, reservations only
    pub persons: Option<u32>,
    /// Total in major currency units, pickup orders only
    pub total: Option<Decimal>,
    /// Payment method code (`CASH`, `CARD`, `ONLINE`), pickup orders only
    pub payment: Option<String>,
    pub items: Vec<LineItem>,
    pub instructions: String,
    pub status: OrderStatus,
}

impl OrderRecord {
    /// "First Last", trimmed so a missing part leaves no stray space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
