//! GloriaFood → spreadsheet reconciliation
//!
//! Pipeline per record: [`classify`] → [`format`] → [`row`] → [`upsert`];
//! [`batch`] drives it over a whole delivery.
//!
//! The reconciler never reads the environment. Everything it needs arrives in
//! a [`ReconcilerConfig`] built by the caller.

pub mod batch;
pub mod classify;
pub mod format;
pub mod row;
pub mod upsert;

use chrono::TimeDelta;
use chrono_tz::Tz;
use serde::Serialize;

use crate::sheets::{Column, RegionLayout};

pub use batch::{SyncSummary, normalize_delivery, process_batch};
pub use classify::{Classified, SkipReason, classify};
pub use row::{ReconciledRow, build_row};
pub use upsert::{UpsertOutcome, upsert};

pub const DEFAULT_RESERVATIONS_SHEET: &str = "Dati";
pub const DEFAULT_PICKUPS_SHEET: &str = "Asporto";
pub const DEFAULT_ASAP_THRESHOLD_MINUTES: i64 = 120;

/// Reservations: A..L, id in K
const RESERVATIONS_WIDTH: u8 = 12;
const RESERVATIONS_ID_COLUMN: Column = Column::new(10);
/// Pickup orders: A..M, id in L
const PICKUPS_WIDTH: u8 = 13;
const PICKUPS_ID_COLUMN: Column = Column::new(11);

/// Spreadsheet region a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Reservations,
    Pickups,
}

impl RegionKind {
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Reservations => "reservations",
            RegionKind::Pickups => "pickups",
        }
    }

    /// Column layout of this region on the given tab
    pub fn layout(&self, sheet: impl Into<String>) -> RegionLayout {
        match self {
            RegionKind::Reservations => {
                RegionLayout::new(sheet, RESERVATIONS_WIDTH, RESERVATIONS_ID_COLUMN)
            }
            RegionKind::Pickups => RegionLayout::new(sheet, PICKUPS_WIDTH, PICKUPS_ID_COLUMN),
        }
    }
}

/// Everything the reconciler needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Restaurant civil timezone for every displayed date/time
    pub timezone: Tz,
    /// Pickup orders scheduled closer than this to acceptance get the ASAP marker
    pub asap_threshold: TimeDelta,
    pub reservations: RegionLayout,
    pub pickups: RegionLayout,
}

impl ReconcilerConfig {
    pub fn new(
        timezone: Tz,
        asap_threshold: TimeDelta,
        reservations_sheet: impl Into<String>,
        pickups_sheet: impl Into<String>,
    ) -> Self {
        Self {
            timezone,
            asap_threshold,
            reservations: RegionKind::Reservations.layout(reservations_sheet),
            pickups: RegionKind::Pickups.layout(pickups_sheet),
        }
    }

    pub fn layout(&self, region: RegionKind) -> &RegionLayout {
        match region {
            RegionKind::Reservations => &self.reservations,
            RegionKind::Pickups => &self.pickups,
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new(
            chrono_tz::Europe::Rome,
            TimeDelta::minutes(DEFAULT_ASAP_THRESHOLD_MINUTES),
            DEFAULT_RESERVATIONS_SHEET,
            DEFAULT_PICKUPS_SHEET,
        )
    }
}
