//! Upsert by external identifier
//!
//! Scan-then-write, not transactional. Two deliveries racing on the same id
//! can both miss and both append; that duplicate is tolerated.

use crate::error::StoreError;
use crate::sheets::{RegionLayout, SheetStore};

use super::row::ReconciledRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    /// Row number (1-indexed) that was overwritten
    Updated { row: usize },
}

/// Row number of the first cell equal to `id`, scanning from row 1.
///
/// A failed lookup is logged and reported as "not found", unless the store
/// is unreachable.
pub async fn find_row(
    store: &dyn SheetStore,
    layout: &RegionLayout,
    id: &str,
) -> Result<Option<usize>, StoreError> {
    match store.read_column(layout, layout.id_column).await {
        Ok(cells) => Ok(cells
            .iter()
            .position(|cell| cell == id)
            .map(|index| index + 1)),
        Err(e) if e.is_unavailable() => Err(e),
        Err(e) => {
            tracing::warn!(
                order_id = %id,
                sheet = %layout.sheet,
                error = %e,
                "Identifier lookup failed, appending"
            );
            Ok(None)
        }
    }
}

pub async fn upsert(
    store: &dyn SheetStore,
    layout: &RegionLayout,
    row: &ReconciledRow,
) -> Result<UpsertOutcome, StoreError> {
    match find_row(store, layout, &row.external_id).await? {
        Some(row_number) => {
            store.overwrite_row(layout, row_number, &row.cells).await?;
            tracing::info!(
                order_id = %row.external_id,
                region = row.region.name(),
                row = row_number,
                "Row updated"
            );
            Ok(UpsertOutcome::Updated { row: row_number })
        }
        None => {
            store.append_row(layout, &row.cells).await?;
            tracing::info!(
                order_id = %row.external_id,
                region = row.region.name(),
                "Row appended"
            );
            Ok(UpsertOutcome::Inserted)
        }
    }
}
