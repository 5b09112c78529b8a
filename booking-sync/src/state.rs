//! Application state

use std::sync::Arc;

use crate::config::{BackendKind, Config};
use crate::error::StoreError;
use crate::reconcile::ReconcilerConfig;
use crate::sheets::{GoogleSheets, MemorySheet, SheetBackend};

/// Shared application state
///
/// Holds no sheet contents: every delivery re-reads what it needs.
#[derive(Clone)]
pub struct AppState {
    /// Expected `Authorization` header value; `None` accepts every caller
    pub webhook_secret: Option<Arc<str>>,
    /// Spreadsheet backend, opened once per delivery
    pub backend: SheetBackend,
    /// Timezone, ASAP threshold and region layouts
    pub reconciler: Arc<ReconcilerConfig>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let backend = match config.backend {
            BackendKind::Google => SheetBackend::Google(GoogleSheets::new(config.google.clone())?),
            BackendKind::Memory => SheetBackend::Memory(Arc::new(MemorySheet::new())),
        };
        Ok(Self::with_backend(
            config.webhook_secret.as_deref(),
            backend,
            config.reconciler(),
        ))
    }

    pub fn with_backend(
        webhook_secret: Option<&str>,
        backend: SheetBackend,
        reconciler: ReconcilerConfig,
    ) -> Self {
        Self {
            webhook_secret: webhook_secret.map(Arc::from),
            backend,
            reconciler: Arc::new(reconciler),
        }
    }
}
