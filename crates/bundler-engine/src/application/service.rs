//! Bundle Engine Service
//!
//! Main service implementing `BundleEngineApi`.

use crate::algorithms::{resolve, select_with_mode};
use crate::config::EngineConfig;
use crate::domain::entities::{Bundle, Item, TickReport};
use crate::domain::errors::{AdmissionError, ConfigError, EngineError};
use crate::domain::invariants::{
    invariant_completeness, invariant_profit_order, invariant_within_budget,
};
use crate::domain::mempool::PriorityMempool;
use crate::domain::store::ItemStore;
use crate::ports::inbound::BundleEngineApi;
use crate::ports::outbound::BundleSink;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Bundle Engine Service
///
/// Owns the item store, the priority mempool and the sink. Producers call
/// `insert` / `add_independent` concurrently; ticks are serialized so two
/// ticks never select from the same pending set.
pub struct BundleEngine {
    config: EngineConfig,
    store: Arc<ItemStore>,
    mempool: Arc<PriorityMempool>,
    sink: Arc<dyn BundleSink>,
    ticks: AtomicU64,
    tick_lock: Mutex<()>,
}

impl BundleEngine {
    /// Create an engine, rejecting an invalid budget before any item is
    /// accepted.
    pub fn new(config: EngineConfig, sink: Arc<dyn BundleSink>) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            max_count = config.budget.max_count(),
            max_value = %config.budget.max_value(),
            max_cost = %config.budget.max_cost(),
            selection = ?config.selection,
            "Bundle engine configured"
        );

        Ok(Self {
            config,
            store: Arc::new(ItemStore::new()),
            mempool: Arc::new(PriorityMempool::new()),
            sink,
            ticks: AtomicU64::new(0),
            tick_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn mempool(&self) -> &Arc<PriorityMempool> {
        &self.mempool
    }

    /// Number of ticks (and drains) started so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    fn next_tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn admit(&self, item: &Item) -> Result<(), AdmissionError> {
        self.config.admission.check(item).inspect_err(|err| {
            debug!(item_id = %item.id, error = %err, "Item rejected");
        })
    }

    async fn submit(&self, bundle: &Bundle) -> Result<(), EngineError> {
        self.sink.submit(bundle).await.map_err(|source| {
            warn!(tick = bundle.tick, error = %source, "Bundle submission failed");
            EngineError::SubmissionFailed {
                tick: bundle.tick,
                source,
            }
        })
    }
}

#[async_trait]
impl BundleEngineApi for BundleEngine {
    fn insert(&self, item: Item) -> Result<(), AdmissionError> {
        self.admit(&item)?;
        self.store.insert(item).inspect_err(|err| {
            debug!(error = %err, "Item rejected");
        })
    }

    fn add_independent(&self, item: Item) -> Result<(), AdmissionError> {
        self.admit(&item)?;
        self.mempool.add(item);
        Ok(())
    }

    async fn tick(&self) -> Result<TickReport, EngineError> {
        let _guard = self.tick_lock.lock().await;
        let tick = self.next_tick();

        // 1. Snapshot
        let view = self.store.snapshot();

        // 2. Resolve
        let resolution = resolve(&view);
        debug_assert!(invariant_completeness(&resolution.order, &view));

        // 3. Select
        let budget = &self.config.budget;
        let bundle = select_with_mode(&resolution.order, budget, self.config.selection).with_tick(tick);
        debug_assert!(invariant_within_budget(&bundle, budget));
        debug_assert!(invariant_profit_order(&bundle));

        // 4. Submit
        if bundle.is_empty() {
            debug!(tick, pending = view.node_count(), "Nothing selected, skipping submission");
        } else {
            self.submit(&bundle).await?;
            let marked = self
                .store
                .mark_admitted(bundle.items.iter().filter_map(|item| view.node(&item.id)));
            let compacted = if self.config.compact_submitted {
                self.store.compact()
            } else {
                0
            };
            info!(
                tick,
                bundle_size = bundle.len(),
                marked,
                compacted,
                total_profit = %bundle.total_profit,
                "Tick complete"
            );
        }

        Ok(TickReport {
            tick,
            resolved_count: resolution.order.len(),
            diagnostics: resolution.diagnostics,
            bundle,
        })
    }

    async fn drain_priority(&self) -> Result<TickReport, EngineError> {
        let _guard = self.tick_lock.lock().await;
        let tick = self.next_tick();

        let best = self.mempool.pop_best(self.config.budget.max_count());
        let resolved_count = best.len();
        let bundle = Bundle::from_items(best).with_tick(tick);

        if bundle.is_empty() {
            debug!(tick, "Priority mempool empty, skipping submission");
        } else {
            let submitted = self.submit(&bundle).await;
            if let Err(err) = submitted {
                // Put the popped items back so the mempool keeps them.
                for item in bundle.items {
                    self.mempool.add(item);
                }
                return Err(err);
            }
            info!(
                tick,
                bundle_size = bundle.len(),
                total_profit = %bundle.total_profit,
                remaining = self.mempool.len(),
                "Priority drain complete"
            );
        }

        Ok(TickReport {
            tick,
            bundle,
            diagnostics: Vec::new(),
            resolved_count,
        })
    }
}
