//! Row building
//!
//! Each region has its own column layout; the two never share positions.

use chrono::{DateTime, TimeDelta, Utc};
use shared::models::OrderRecord;

use super::format::{self, ASAP_MARKER, SOURCE_ONLINE};
use super::{ReconcilerConfig, RegionKind};

/// Display cells for one record, in the region's column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledRow {
    pub region: RegionKind,
    pub external_id: String,
    pub cells: Vec<String>,
}

pub fn build_row(
    region: RegionKind,
    record: &OrderRecord,
    config: &ReconcilerConfig,
    now: DateTime<Utc>,
) -> ReconciledRow {
    let tz = config.timezone;
    let updated = format::updated_stamp(now, tz);

    let cells = match region {
        // A..L: weekday | date | time | name | phone | email | persons | status | source | notes | id | updated
        RegionKind::Reservations => vec![
            format::weekday(record.fulfill_at, tz),
            format::date(record.fulfill_at, tz),
            format::time(record.fulfill_at, tz),
            record.full_name(),
            record.phone.clone(),
            record.email.clone(),
            record.persons.map(|p| p.to_string()).unwrap_or_default(),
            format::reservation_status_label(&record.status).to_string(),
            SOURCE_ONLINE.to_string(),
            record.instructions.clone(),
            record.id.clone(),
            updated,
        ],
        // A..M: weekday | date | time | name | phone | email | total | payment | items | status | notes | id | updated
        RegionKind::Pickups => vec![
            format::weekday(record.fulfill_at, tz),
            format::date(record.fulfill_at, tz),
            pickup_time(record, config.asap_threshold, tz),
            record.full_name(),
            record.phone.clone(),
            record.email.clone(),
            format::money(record.total),
            format::payment_label(record.payment.as_deref()),
            format::items_summary(&record.items),
            format::pickup_status_label(&record.status).to_string(),
            record.instructions.clone(),
            record.id.clone(),
            updated,
        ],
    };

    debug_assert_eq!(cells.len(), config.layout(region).width as usize);

    ReconciledRow {
        region,
        external_id: record.id.clone(),
        cells,
    }
}

fn pickup_time(record: &OrderRecord, threshold: TimeDelta, tz: chrono_tz::Tz) -> String {
    let time = format::time(record.fulfill_at, tz);
    if !time.is_empty() && is_asap(record.fulfill_at, record.accepted_at, threshold) {
        format!("{time} {ASAP_MARKER}")
    } else {
        time
    }
}

/// Heuristic for "as soon as possible" orders: the platform sends no such
/// flag, so a short gap between acceptance and pickup stands in for it.
/// A missing timestamp on either side counts as ASAP.
pub fn is_asap(
    fulfill_at: Option<DateTime<Utc>>,
    accepted_at: Option<DateTime<Utc>>,
    threshold: TimeDelta,
) -> bool {
    match (fulfill_at, accepted_at) {
        (Some(fulfill), Some(accepted)) => fulfill - accepted < threshold,
        _ => true,
    }
}
