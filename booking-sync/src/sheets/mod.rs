//! Spreadsheet access
//!
//! The reconciler only sees [`SheetStore`]: read one column, append a row,
//! overwrite a row. Two implementations exist:
//! - [`google::GoogleSheets`] talks to the Sheets v4 REST API
//! - [`memory::MemorySheet`] keeps rows in process (tests, local runs)

pub mod google;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

pub use google::{GoogleSheets, GoogleSheetsConfig};
pub use memory::MemorySheet;

/// Zero-based column index, rendered as a spreadsheet letter (`0` → `A`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u8);

impl Column {
    pub const A: Column = Column(0);

    /// Single-letter columns only (A–Z); every layout here fits.
    pub const fn new(index: u8) -> Self {
        assert!(index < 26, "column index out of range");
        Column(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }
}

/// Where one region lives in the spreadsheet and how wide its rows are
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLayout {
    /// Tab name (`Dati`, `Asporto`)
    pub sheet: String,
    /// Number of columns a full row spans, starting at A
    pub width: u8,
    /// Column holding the external identifier
    pub id_column: Column,
}

impl RegionLayout {
    pub fn new(sheet: impl Into<String>, width: u8, id_column: Column) -> Self {
        assert!(width > 0 && width <= 26, "layout width out of range");
        assert!(id_column.index() < width as usize, "id column outside layout");
        Self {
            sheet: sheet.into(),
            width,
            id_column,
        }
    }

    /// Last column of a full row (holds the updated-at stamp)
    pub fn last_column(&self) -> Column {
        Column::new(self.width - 1)
    }

    /// Tab name as it must appear in A1 notation
    fn quoted_sheet(&self) -> String {
        if self
            .sheet
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            self.sheet.clone()
        } else {
            format!("'{}'", self.sheet.replace('\'', "''"))
        }
    }

    /// Whole-column range, e.g. `Dati!K:K`
    pub fn column_range(&self, column: Column) -> String {
        let c = column.letter();
        format!("{}!{c}:{c}", self.quoted_sheet())
    }

    /// Full-width open range used for appends, e.g. `Dati!A:L`
    pub fn append_range(&self) -> String {
        format!(
            "{}!A:{}",
            self.quoted_sheet(),
            self.last_column().letter()
        )
    }

    /// One full row, 1-indexed, e.g. `Dati!A5:L5`
    pub fn row_range(&self, row_number: usize) -> String {
        format!(
            "{}!A{row_number}:{}{row_number}",
            self.quoted_sheet(),
            self.last_column().letter()
        )
    }
}

/// Capability interface over the spreadsheet
///
/// Implementations do no caching: every `read_column` reflects the store at
/// call time.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every cell of `column` from row 1 down, blank cells as empty strings
    async fn read_column(
        &self,
        region: &RegionLayout,
        column: Column,
    ) -> Result<Vec<String>, StoreError>;

    /// Append `row` after the last row of the region
    async fn append_row(&self, region: &RegionLayout, row: &[String]) -> Result<(), StoreError>;

    /// Replace row `row_number` (1-indexed) across the region's full width
    async fn overwrite_row(
        &self,
        region: &RegionLayout,
        row_number: usize,
        row: &[String],
    ) -> Result<(), StoreError>;
}

/// Configured spreadsheet backend, opened once per delivery
#[derive(Clone)]
pub enum SheetBackend {
    Google(GoogleSheets),
    Memory(Arc<MemorySheet>),
}

impl SheetBackend {
    /// Open a store for one delivery.
    ///
    /// For Google this validates configuration and fetches an access token,
    /// so a failure here means nothing in the delivery can be written.
    pub async fn connect(&self) -> Result<Arc<dyn SheetStore>, StoreError> {
        match self {
            SheetBackend::Google(google) => Ok(Arc::new(google.connect().await?)),
            SheetBackend::Memory(sheet) => Ok(sheet.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SheetBackend::Google(_) => "google",
            SheetBackend::Memory(_) => "memory",
        }
    }
}
