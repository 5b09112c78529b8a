//! Record classification
//!
//! Turns one raw platform order object into a normalized [`OrderRecord`],
//! or says why it cannot be synced. Pure apart from logging.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shared::error::ErrorCode;
use shared::models::{LineItem, OrderKind, OrderRecord, OrderStatus};

use super::format::parse_timestamp;

/// Outcome of classifying one record
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Reservation(OrderRecord),
    Pickup(OrderRecord),
    Unrecognized(SkipReason),
}

/// Why a record is skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingType,
    UnsupportedType(String),
    /// Recognized type, but no identifier to correlate rows with
    MissingId,
}

impl SkipReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            SkipReason::MissingId => ErrorCode::OrderIdMissing,
            _ => ErrorCode::OrderTypeUnsupported,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "record is not a JSON object"),
            SkipReason::MissingType => write!(f, "missing type"),
            SkipReason::UnsupportedType(t) => write!(f, "unsupported type '{t}'"),
            SkipReason::MissingId => write!(f, "missing id"),
        }
    }
}

pub fn classify(raw: &Value, tz: Tz) -> Classified {
    let Some(obj) = raw.as_object() else {
        return Classified::Unrecognized(SkipReason::NotAnObject);
    };

    let kind = match obj.get("type").and_then(Value::as_str) {
        None => return Classified::Unrecognized(SkipReason::MissingType),
        Some(code) => OrderKind::from_code(code),
    };
    if let OrderKind::Other(code) = kind {
        return Classified::Unrecognized(SkipReason::UnsupportedType(code));
    }

    let Some(id) = text(obj, "id").filter(|id| !id.is_empty()) else {
        return Classified::Unrecognized(SkipReason::MissingId);
    };

    let record = OrderRecord {
        fulfill_at: timestamp(obj, "fulfill_at", &id, tz),
        accepted_at: timestamp(obj, "accepted_at", &id, tz),
        first_name: text(obj, "client_first_name").unwrap_or_default(),
        last_name: text(obj, "client_last_name").unwrap_or_default(),
        phone: text(obj, "client_phone").unwrap_or_default(),
        email: text(obj, "client_email").unwrap_or_default(),
        persons: obj.get("persons").and_then(as_u32),
        total: obj.get("total_price").and_then(as_decimal),
        payment: text(obj, "payment").filter(|p| !p.is_empty()),
        items: line_items(obj),
        instructions: text(obj, "instructions").unwrap_or_default(),
        status: text(obj, "status")
            .map(|s| OrderStatus::from_code(&s))
            .unwrap_or_default(),
        kind,
        id,
    };

    match record.kind {
        OrderKind::TableReservation => Classified::Reservation(record),
        _ => Classified::Pickup(record),
    }
}

/// String or number as text; `null` and other shapes count as absent
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp(obj: &Map<String, Value>, key: &str, id: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = obj.get(key).and_then(Value::as_str)?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_timestamp(raw, tz);
    if parsed.is_none() {
        tracing::warn!(order_id = %id, field = key, value = raw, "Unparsable timestamp, leaving cells blank");
    }
    parsed
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn line_items(obj: &Map<String, Value>) -> Vec<LineItem> {
    let Some(items) = obj.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = text(item, "name").filter(|n| !n.is_empty())?;
            let quantity = item.get("quantity").and_then(as_u32).unwrap_or(1);
            Some(LineItem { name, quantity })
        })
        .collect()
}
