//! Core entities for the bundling engine.

use super::errors::Diagnostic;
use super::value_objects::{Amount, ItemId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::sync::Arc;

/// A candidate work item (transaction) with declared value, cost and
/// dependencies.
///
/// INVARIANT: `profit` is never negative. When derived it equals
/// `value - cost`, saturating at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier within a store.
    pub id: ItemId,
    /// Opaque origin tag (sender).
    pub origin: String,
    /// Opaque destination tag (receiver).
    pub destination: String,
    /// Cost measure (gas price).
    pub cost: Amount,
    /// Value measure; counts against the value budget.
    pub value: Amount,
    /// Declared or derived profit.
    pub profit: Amount,
    /// Identifiers that must precede this item.
    #[serde(default)]
    pub dependencies: BTreeSet<ItemId>,
    /// Insertion timestamp (ms), supplied by the caller.
    pub timestamp: Timestamp,
    /// Set once the item was part of a successfully submitted bundle.
    #[serde(default)]
    pub admitted: bool,
}

impl Item {
    /// Creates an item with profit derived as `value - cost`.
    pub fn new(
        id: impl Into<ItemId>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        cost: Amount,
        value: Amount,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            destination: destination.into(),
            cost,
            value,
            profit: value.saturating_sub(cost),
            dependencies: BTreeSet::new(),
            timestamp,
            admitted: false,
        }
    }

    /// Replaces the derived profit with an explicitly declared one.
    pub fn with_profit(mut self, profit: Amount) -> Self {
        self.profit = profit;
        self
    }

    pub fn with_dependencies<I, T>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Priority score used by the priority mempool: `cost + profit`.
    pub fn priority(&self) -> Amount {
        self.cost.saturating_add(self.profit)
    }

    pub fn is_independent(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn depends_on(&self, id: &ItemId) -> bool {
        self.dependencies.contains(id)
    }
}

/// A finalized, budget-respecting ordered subset of items.
///
/// Transient output of one scheduling tick; owned by whoever receives it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Tick that produced this bundle.
    pub tick: u64,
    /// Items in admission order.
    pub items: Vec<Item>,
    pub total_profit: Amount,
    pub total_value: Amount,
    pub total_cost: Amount,
}

impl Bundle {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a bundle from already-chosen items, computing the aggregates.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut bundle = Self::empty();
        for item in items {
            bundle.push(item);
        }
        bundle
    }

    pub(crate) fn push(&mut self, item: Item) {
        self.total_profit = self.total_profit.saturating_add(item.profit);
        self.total_value = self.total_value.saturating_add(item.value);
        self.total_cost = self.total_cost.saturating_add(item.cost);
        self.items.push(item);
    }

    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

/// Outcome of one scheduling tick (or one priority drain).
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub tick: u64,
    /// The bundle handed to the sink; empty bundles are never submitted.
    pub bundle: Bundle,
    /// Anomalies found while resolving this tick's snapshot.
    pub diagnostics: Vec<Diagnostic>,
    /// Items linearized by the resolver (or popped from the mempool).
    pub resolved_count: usize,
}

impl TickReport {
    pub fn submitted(&self) -> bool {
        !self.bundle.is_empty()
    }

    pub fn cycle_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_cycle()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_missing_dependency())
            .count()
    }
}

/// Point-in-time read view of the item store.
///
/// Nodes share their `Arc<Item>` with the store's arena; the store never
/// mutates an item in place once a view may hold it.
#[derive(Clone, Debug, Default)]
pub struct GraphView {
    /// All items by identifier (ascending).
    pub(crate) nodes: BTreeMap<ItemId, Arc<Item>>,
    /// Edges `dependency -> dependents`, including dependencies that are not
    /// (yet) nodes.
    pub(crate) edges: BTreeMap<ItemId, BTreeSet<ItemId>>,
    /// Submitted items already compacted out of the store.
    pub(crate) retired: Arc<BTreeSet<ItemId>>,
}

impl GraphView {
    pub fn new(
        nodes: BTreeMap<ItemId, Arc<Item>>,
        edges: BTreeMap<ItemId, BTreeSet<ItemId>>,
    ) -> Self {
        Self {
            nodes,
            edges,
            retired: Arc::default(),
        }
    }

    pub fn with_retired(mut self, retired: Arc<BTreeSet<ItemId>>) -> Self {
        self.retired = retired;
        self
    }

    /// Builds a view directly from items (edges derived from their
    /// dependency sets).
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut view = Self::default();
        for item in items {
            for dep in &item.dependencies {
                view.edges
                    .entry(dep.clone())
                    .or_default()
                    .insert(item.id.clone());
            }
            view.nodes.insert(item.id.clone(), Arc::new(item));
        }
        view
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.nodes.get(id).map(|item| item.as_ref())
    }

    /// The shared handle for `id`, as held by the store when the view was taken.
    pub fn node(&self, id: &ItemId) -> Option<&Arc<Item>> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// True when `id` was submitted and later compacted away.
    pub fn is_retired(&self, id: &ItemId) -> bool {
        self.retired.contains(id)
    }

    /// Items that declared `id` as a dependency.
    pub fn dependents_of(&self, id: &ItemId) -> impl Iterator<Item = &ItemId> {
        self.edges.get(id).into_iter().flatten()
    }

    /// Iterates nodes in ascending identifier order.
    pub fn iter(&self) -> btree_map::Iter<'_, ItemId, Arc<Item>> {
        self.nodes.iter()
    }

    /// Iterates every recorded edge as `(dependency, dependent)`.
    pub fn edges(&self) -> impl Iterator<Item = (&ItemId, &ItemId)> {
        self.edges
            .iter()
            .flat_map(|(dep, dependents)| dependents.iter().map(move |d| (dep, d)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
