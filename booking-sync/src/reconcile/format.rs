//! Display formatting for spreadsheet cells
//!
//! Everything renders in the restaurant's timezone and in Italian. Nothing
//! here fails: missing or unusable input renders as an empty string.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{LineItem, OrderStatus};

/// Source label written on every reservation row
pub const SOURCE_ONLINE: &str = "🌐 Online";
/// Suffix for pickup times requested for (near) immediate fulfillment
pub const ASAP_MARKER: &str = "⚡ ASAP";

const WEEKDAYS: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

/// Naive layouts accepted after RFC 3339, read as restaurant-local time
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a platform timestamp.
///
/// RFC 3339 with an offset is taken as-is; a naive timestamp is interpreted
/// in `tz`. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// `Sabato`
pub fn weekday(ts: Option<DateTime<Utc>>, tz: Tz) -> String {
    ts.map(|ts| {
        let local = ts.with_timezone(&tz);
        WEEKDAYS[local.weekday().num_days_from_monday() as usize].to_string()
    })
    .unwrap_or_default()
}

/// `25/01/2025`
pub fn date(ts: Option<DateTime<Utc>>, tz: Tz) -> String {
    ts.map(|ts| ts.with_timezone(&tz).format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// `20:30`
pub fn time(ts: Option<DateTime<Utc>>, tz: Tz) -> String {
    ts.map(|ts| ts.with_timezone(&tz).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Last-updated marker, `21/01 15:30`
pub fn updated_stamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%d/%m %H:%M").to_string()
}

/// `1.234,50 €` (amount already in euros, not cents)
pub fn money(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return String::new();
    };
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part} €")
}

/// `2x Margherita, 1x Tiramisù`
pub fn items_summary(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}x {}", item.quantity, item.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn reservation_status_label(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Accepted => "✅ Confermata",
        OrderStatus::Rejected | OrderStatus::Canceled | OrderStatus::TimedOut => "❌ Cancellata",
        OrderStatus::Pending | OrderStatus::Unknown(_) => "⏳ In attesa",
    }
}

pub fn pickup_status_label(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Accepted => "✅ Accettato",
        OrderStatus::Rejected => "❌ Rifiutato",
        OrderStatus::Canceled => "❌ Annullato",
        OrderStatus::TimedOut => "⌛ Scaduto",
        OrderStatus::Pending | OrderStatus::Unknown(_) => "⏳ In attesa",
    }
}

/// Payment method label; unknown codes are shown verbatim
pub fn payment_label(code: Option<&str>) -> String {
    match code.map(|c| c.trim().to_ascii_uppercase()).as_deref() {
        None | Some("") => String::new(),
        Some("CASH") => "💵 Contanti".to_string(),
        Some("CARD") | Some("CARD_ON_DELIVERY") => "💳 Carta".to_string(),
        Some("ONLINE") => "🌐 Online".to_string(),
        Some(_) => code.unwrap_or_default().trim().to_string(),
    }
}
