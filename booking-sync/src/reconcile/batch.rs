//! Batch orchestration
//!
//! One delivery → normalized list → classify, build, upsert per record,
//! strictly in order. A bad record never aborts the batch; an unreachable
//! store does, so the platform sees an error and redelivers.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};

use super::classify::{Classified, classify};
use super::row::build_row;
use super::upsert::{UpsertOutcome, upsert};
use super::{ReconcilerConfig, RegionKind};
use crate::error::StoreError;
use crate::sheets::SheetStore;

/// Accept `{"orders": [...]}`, a bare array, or a single order object.
///
/// `{"orders": null}` (or no `orders` key at all) means the object is itself
/// an order.
pub fn normalize_delivery(payload: Value) -> Result<Vec<Value>, AppError> {
    match payload {
        Value::Array(orders) => Ok(orders),
        Value::Object(mut obj) => match obj.remove("orders") {
            Some(Value::Array(orders)) => Ok(orders),
            None | Some(Value::Null) => Ok(vec![Value::Object(obj)]),
            Some(other) => Err(AppError::with_message(
                ErrorCode::PayloadShapeInvalid,
                format!("'orders' must be an array, got {}", json_kind(&other)),
            )),
        },
        other => Err(AppError::with_message(
            ErrorCode::PayloadShapeInvalid,
            format!(
                "expected an order object or a list of orders, got {}",
                json_kind(&other)
            ),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub inserted: u32,
    pub updated: u32,
    pub failed: u32,
}

/// A record that was recognized but could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub id: String,
    pub region: RegionKind,
    pub error: String,
}

/// Response body returned to the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub success: bool,
    /// Records inserted or updated
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
    pub reservations: TypeCounts,
    pub pickups: TypeCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RecordFailure>,
}

impl SyncSummary {
    pub fn empty() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    fn counts_mut(&mut self, region: RegionKind) -> &mut TypeCounts {
        match region {
            RegionKind::Reservations => &mut self.reservations,
            RegionKind::Pickups => &mut self.pickups,
        }
    }

    fn record(&mut self, region: RegionKind, outcome: UpsertOutcome) {
        let counts = self.counts_mut(region);
        match outcome {
            UpsertOutcome::Inserted => counts.inserted += 1,
            UpsertOutcome::Updated { .. } => counts.updated += 1,
        }
        self.processed += 1;
    }

    fn fail(&mut self, region: RegionKind, id: String, error: String) {
        self.counts_mut(region).failed += 1;
        self.failed += 1;
        self.failures.push(RecordFailure { id, region, error });
    }
}

/// Reconcile every record of one delivery against `store`, in order.
///
/// Fails only when the store is unavailable; rows written before that point
/// stay written and are updated in place on redelivery.
pub async fn process_batch(
    store: &dyn SheetStore,
    config: &ReconcilerConfig,
    orders: &[Value],
) -> Result<SyncSummary, StoreError> {
    let mut summary = SyncSummary::empty();

    for (index, raw) in orders.iter().enumerate() {
        let (region, record) = match classify(raw, config.timezone) {
            Classified::Reservation(record) => (RegionKind::Reservations, record),
            Classified::Pickup(record) => (RegionKind::Pickups, record),
            Classified::Unrecognized(reason) => {
                tracing::info!(index, code = %reason.code(), reason = %reason, "Skipping record");
                summary.skipped += 1;
                continue;
            }
        };

        let row = build_row(region, &record, config, Utc::now());
        match upsert(store, config.layout(region), &row).await {
            Ok(outcome) => summary.record(region, outcome),
            Err(e) if e.is_unavailable() => {
                tracing::error!(
                    order_id = %record.id,
                    region = region.name(),
                    written = summary.processed,
                    remaining = orders.len() - index,
                    error = %e,
                    "Sheet store unavailable, aborting delivery"
                );
                return Err(e);
            }
            Err(e) => {
                tracing::error!(
                    order_id = %record.id,
                    region = region.name(),
                    error = %e,
                    "Failed to write record"
                );
                summary.fail(region, record.id, e.to_string());
            }
        }
    }

    tracing::info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Delivery reconciled"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::{Column, MemorySheet, RegionLayout};
    use async_trait::async_trait;
    use serde_json::json;

    fn anna() -> Value {
        json!({
            "type": "table_reservation",
            "id": "555",
            "fulfill_at": "2025-01-25T19:30:00Z",
            "client_first_name": "Anna",
            "client_last_name": "Bianchi",
            "persons": 4,
            "status": "accepted"
        })
    }

    fn pickup(id: &str) -> Value {
        json!({
            "type": "pickup",
            "id": id,
            "fulfill_at": "2025-01-25T19:30:00Z",
            "accepted_at": "2025-01-25T19:00:00Z",
            "total_price": "18.00",
            "payment": "CASH",
            "items": [{ "name": "Diavola", "quantity": 1 }],
            "status": "accepted"
        })
    }

    /// Memory store that rejects writes for one identifier
    struct FailingStore {
        inner: MemorySheet,
        poisoned_id: &'static str,
    }

    impl FailingStore {
        fn check(&self, region: &RegionLayout, row: &[String]) -> Result<(), StoreError> {
            if row.get(region.id_column.index()).map(String::as_str) == Some(self.poisoned_id) {
                return Err(StoreError::Api {
                    status: 400,
                    body: "Invalid values".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SheetStore for FailingStore {
        async fn read_column(
            &self,
            region: &RegionLayout,
            column: Column,
        ) -> Result<Vec<String>, StoreError> {
            self.inner.read_column(region, column).await
        }

        async fn append_row(&self, region: &RegionLayout, row: &[String]) -> Result<(), StoreError> {
            self.check(region, row)?;
            self.inner.append_row(region, row).await
        }

        async fn overwrite_row(
            &self,
            region: &RegionLayout,
            row_number: usize,
            row: &[String],
        ) -> Result<(), StoreError> {
            self.check(region, row)?;
            self.inner.overwrite_row(region, row_number, row).await
        }
    }

    /// Store that answers every call with 503
    struct DownStore;

    impl DownStore {
        fn outage() -> StoreError {
            StoreError::Api {
                status: 503,
                body: "The service is currently unavailable.".into(),
            }
        }
    }

    #[async_trait]
    impl SheetStore for DownStore {
        async fn read_column(
            &self,
            _region: &RegionLayout,
            _column: Column,
        ) -> Result<Vec<String>, StoreError> {
            Err(Self::outage())
        }

        async fn append_row(&self, _region: &RegionLayout, _row: &[String]) -> Result<(), StoreError> {
            Err(Self::outage())
        }

        async fn overwrite_row(
            &self,
            _region: &RegionLayout,
            _row_number: usize,
            _row: &[String],
        ) -> Result<(), StoreError> {
            Err(Self::outage())
        }
    }

    #[test]
    fn test_normalize_shapes() {
        assert_eq!(normalize_delivery(json!({ "orders": [anna(), anna()] })).unwrap().len(), 2);
        assert_eq!(normalize_delivery(json!([anna()])).unwrap().len(), 1);
        assert!(normalize_delivery(json!({ "orders": [] })).unwrap().is_empty());

        let single = normalize_delivery(anna()).unwrap();
        assert_eq!(single, vec![anna()]);

        let null_orders = normalize_delivery(json!({ "orders": null, "id": "1" })).unwrap();
        assert_eq!(null_orders, vec![json!({ "id": "1" })]);
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        let err = normalize_delivery(json!("hello")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PayloadShapeInvalid);
        let err = normalize_delivery(json!({ "orders": { "id": 1 } })).unwrap_err();
        assert_eq!(err.code, ErrorCode::PayloadShapeInvalid);
    }

    #[tokio::test]
    async fn test_scenario_insert_then_update() {
        let store = MemorySheet::new();
        let config = ReconcilerConfig::default();

        let first = process_batch(&store, &config, &[anna()]).await.unwrap();
        assert_eq!(first.reservations.inserted, 1);
        assert_eq!(first.processed, 1);

        let rows = store.rows("Dati").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(
            &rows[0][..11],
            &[
                "Sabato",
                "25/01/2025",
                "20:30",
                "Anna Bianchi",
                "",
                "",
                "4",
                "✅ Confermata",
                "🌐 Online",
                "",
                "555",
            ]
        );
        assert_eq!(rows[0][11].len(), "21/01 15:30".len());

        let second = process_batch(&store, &config, &[anna()]).await.unwrap();
        assert_eq!(second.reservations.updated, 1);
        assert_eq!(second.reservations.inserted, 0);
        assert_eq!(store.rows("Dati").await.len(), 1);
    }

    #[tokio::test]
    async fn test_type_isolation() {
        let store = MemorySheet::new();
        let config = ReconcilerConfig::default();

        // Same identifier in both regions stays two independent rows
        let summary = process_batch(&store, &config, &[anna(), pickup("555")]).await.unwrap();
        assert_eq!(summary.reservations.inserted, 1);
        assert_eq!(summary.pickups.inserted, 1);

        let pickups = store.rows("Asporto").await;
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].len(), 13);
        assert_eq!(pickups[0][11], "555");
        assert_eq!(pickups[0][6], "18,00 €");
        assert_eq!(pickups[0][2], "20:30 ⚡ ASAP");
        assert_eq!(store.rows("Dati").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_records_touch_nothing() {
        let store = MemorySheet::new();
        let config = ReconcilerConfig::default();
        let orders = vec![
            json!({ "type": "delivery", "id": "1" }),
            json!({ "id": "2" }),
            json!({ "type": "pickup" }),
            json!(42),
        ];

        let summary = process_batch(&store, &config, &orders).await.unwrap();
        assert_eq!(summary.skipped, 4);
        assert_eq!(summary.processed, 0);
        assert!(store.rows("Dati").await.is_empty());
        assert!(store.rows("Asporto").await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_timestamp_still_written() {
        let store = MemorySheet::new();
        let config = ReconcilerConfig::default();
        let mut raw = anna();
        raw["fulfill_at"] = json!("25 gennaio, sera");

        let summary = process_batch(&store, &config, &[raw]).await.unwrap();
        assert_eq!(summary.reservations.inserted, 1);

        let rows = store.rows("Dati").await;
        assert_eq!(&rows[0][..4], &["", "", "", "Anna Bianchi"]);
        assert_eq!(rows[0][10], "555");
    }

    #[tokio::test]
    async fn test_partial_failure_is_contained() {
        let store = FailingStore {
            inner: MemorySheet::new(),
            poisoned_id: "2",
        };
        let config = ReconcilerConfig::default();

        let summary = process_batch(&store, &config, &[pickup("1"), pickup("2"), pickup("3")])
            .await
            .unwrap();
        assert!(summary.success);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pickups.inserted, 2);
        assert_eq!(summary.pickups.failed, 1);
        assert_eq!(summary.failures[0].id, "2");
        assert_eq!(summary.failures[0].region, RegionKind::Pickups);

        let ids: Vec<String> = store
            .inner
            .rows("Asporto")
            .await
            .into_iter()
            .map(|row| row[11].clone())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_aborts_delivery() {
        let config = ReconcilerConfig::default();
        let orders = vec![anna(), pickup("1"), pickup("2")];

        let err = process_batch(&DownStore, &config, &orders).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_skips_alone_never_touch_a_down_store() {
        let config = ReconcilerConfig::default();
        let summary = process_batch(&DownStore, &config, &[json!({ "type": "delivery", "id": "1" })])
            .await
            .unwrap();
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_summary_json_shape() {
        let mut summary = SyncSummary::empty();
        summary.record(RegionKind::Reservations, UpsertOutcome::Inserted);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "processed": 1,
                "skipped": 0,
                "failed": 0,
                "reservations": { "inserted": 1, "updated": 0, "failed": 0 },
                "pickups": { "inserted": 0, "updated": 0, "failed": 0 }
            })
        );

        summary.fail(RegionKind::Pickups, "9".into(), "boom".into());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value["failures"],
            json!([{ "id": "9", "region": "pickups", "error": "boom" }])
        );
    }
}
