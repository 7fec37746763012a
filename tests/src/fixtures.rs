//! Item and graph generators.

use async_trait::async_trait;
use bundler_engine::{Amount, Bundle, BundleSink, Item, ResourceBudget, SubmissionError};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};

/// Sink that keeps every accepted bundle; can be told to refuse.
#[derive(Default)]
pub struct RecordingSink {
    bundles: Mutex<Vec<Bundle>>,
    refuse: AtomicBool,
}

impl RecordingSink {
    pub fn set_refusing(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn bundles(&self) -> Vec<Bundle> {
        self.bundles.lock().clone()
    }
}

#[async_trait]
impl BundleSink for RecordingSink {
    async fn submit(&self, bundle: &Bundle) -> Result<(), SubmissionError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SubmissionError::Unavailable("relay offline".into()));
        }
        self.bundles.lock().push(bundle.clone());
        Ok(())
    }
}

pub fn item(id: &str, profit: u64, cost: u64, deps: &[&str]) -> Item {
    Item::new(id, "0xSearcher", "0xRouter", cost.into(), 0u64.into(), 0)
        .with_profit(profit.into())
        .with_dependencies(deps.iter().copied())
}

pub fn budget(max_count: usize, max_value: u64, max_cost: u64) -> ResourceBudget {
    ResourceBudget::new(max_count, Amount::from(max_value), Amount::from(max_cost))
        .expect("test budget must be valid")
}

/// Acyclic graph of `n` items; item `i` depends on up to `max_deps` of the
/// items before it. Ids are zero-padded so id order matches index order.
pub fn random_dag<R: Rng>(rng: &mut R, n: usize, max_deps: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let deps: Vec<String> = if i == 0 {
                Vec::new()
            } else {
                (0..rng.gen_range(0..=max_deps))
                    .map(|_| format!("tx{:06}", rng.gen_range(0..i)))
                    .collect()
            };
            Item::new(
                format!("tx{i:06}"),
                format!("0xSender{}", i % 64),
                "0xRouter",
                rng.gen_range(1u64..1_000).into(),
                rng.gen_range(0u64..10_000).into(),
                i as u64,
            )
            .with_dependencies(deps)
        })
        .collect()
}

/// Independent items with random cost and profit.
pub fn random_items<R: Rng>(rng: &mut R, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            Item::new(
                format!("tx{i:06}"),
                "0xSender",
                "0xRouter",
                rng.gen_range(1u64..1_000).into(),
                rng.gen_range(0u64..10_000).into(),
                i as u64,
            )
        })
        .collect()
}
