//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{Item, TickReport};
use crate::domain::errors::{AdmissionError, EngineError};
use async_trait::async_trait;

/// Primary bundling API, used by producers and by the scheduler.
#[async_trait]
pub trait BundleEngineApi: Send + Sync {
    /// Admit an item into the dependency-aware store.
    ///
    /// Overwrites any item with the same identifier.
    fn insert(&self, item: Item) -> Result<(), AdmissionError>;

    /// Admit an item into the priority mempool (dependencies ignored).
    fn add_independent(&self, item: Item) -> Result<(), AdmissionError>;

    /// Run one dependency-aware scheduling tick.
    ///
    /// 1. Snapshot the store
    /// 2. Resolve into a dependency-respecting order
    /// 3. Select a budgeted bundle
    /// 4. Submit it to the sink (skipped when empty)
    async fn tick(&self) -> Result<TickReport, EngineError>;

    /// Pop the best items from the priority mempool and submit them.
    async fn drain_priority(&self) -> Result<TickReport, EngineError>;
}
