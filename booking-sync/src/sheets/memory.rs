//! In-process sheet store
//!
//! Rows live in a map keyed by tab name. Used by the test suite and by
//! `SHEETS_BACKEND=memory` for local runs; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Column, RegionLayout, SheetStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemorySheet {
    tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a tab (header rows, pre-existing bookings)
    pub async fn seed(&self, sheet: &str, rows: Vec<Vec<String>>) {
        self.tabs.lock().await.insert(sheet.to_string(), rows);
    }

    /// Snapshot of a tab's rows; empty when the tab was never written
    pub async fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.tabs
            .lock()
            .await
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn read_column(
        &self,
        region: &RegionLayout,
        column: Column,
    ) -> Result<Vec<String>, StoreError> {
        let tabs = self.tabs.lock().await;
        let rows = tabs.get(&region.sheet).map(Vec::as_slice).unwrap_or_default();
        Ok(rows
            .iter()
            .map(|row| row.get(column.index()).cloned().unwrap_or_default())
            .collect())
    }

    async fn append_row(&self, region: &RegionLayout, row: &[String]) -> Result<(), StoreError> {
        self.tabs
            .lock()
            .await
            .entry(region.sheet.clone())
            .or_default()
            .push(row.to_vec());
        Ok(())
    }

    async fn overwrite_row(
        &self,
        region: &RegionLayout,
        row_number: usize,
        row: &[String],
    ) -> Result<(), StoreError> {
        if row_number == 0 {
            return Err(StoreError::InvalidResponse(
                "row numbers start at 1".to_string(),
            ));
        }
        let mut tabs = self.tabs.lock().await;
        let rows = tabs.entry(region.sheet.clone()).or_default();
        if rows.len() < row_number {
            rows.resize_with(row_number, Vec::new);
        }
        rows[row_number - 1] = row.to_vec();
        Ok(())
    }
}
