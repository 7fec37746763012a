//! # Priority Mempool
//!
//! Alternative admission strategy for dependency-free workloads: a
//! max-priority queue keyed by `cost + profit`.
//!
//! ## Invariants Enforced
//!
//! - Max-heap property (every parent's priority >= its children's) after any
//!   sequence of `add` / `pop_best`
//! - `pop_best(k)` yields non-increasing priorities and at most `k` items
//!
//! The mempool has its own lock and never contends with the item store.

use super::entities::Item;
use super::value_objects::{Amount, PrioritizedItem};
use parking_lot::Mutex;
use std::collections::BinaryHeap;
use tracing::debug;

/// Max-priority queue of items, safe to share between threads.
#[derive(Debug, Default)]
pub struct PriorityMempool {
    heap: Mutex<BinaryHeap<PrioritizedItem>>,
}

impl PriorityMempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item in O(log n).
    ///
    /// Declared dependencies are ignored by this strategy.
    pub fn add(&self, item: Item) {
        if !item.is_independent() {
            debug!(
                item_id = %item.id,
                dependencies = item.dependencies.len(),
                "Priority mempool ignores declared dependencies"
            );
        }
        self.heap.lock().push(PrioritizedItem::new(item));
    }

    /// Removes and returns up to `k` items, highest priority first.
    pub fn pop_best(&self, k: usize) -> Vec<Item> {
        let mut heap = self.heap.lock();
        let count = k.min(heap.len());
        let mut best = Vec::with_capacity(count);

        for _ in 0..count {
            let Some(entry) = heap.pop() else {
                break;
            };
            best.push(entry.into_item());
        }

        best
    }

    pub fn peek_priority(&self) -> Option<Amount> {
        self.heap.lock().peek().map(|entry| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }

    /// Checks the max-heap property over the backing array.
    pub fn heap_property_holds(&self) -> bool {
        let heap = self.heap.lock();
        let slots = heap.as_slice();

        (1..slots.len()).all(|child| slots[(child - 1) / 2].priority >= slots[child].priority)
    }
}
