//! # Item Store - Arena and Snapshots
//!
//! Holds candidate items and the dependency edges derived from their
//! declared dependency sets.
//!
//! ## Data Structures
//!
//! - `items`: arena of `Arc<Item>` addressed by identifier
//! - `edges`: `dependency -> dependents`, recorded even for unknown dependencies
//! - `retired`: ids of submitted items removed by `compact`
//!
//! ## Concurrency
//!
//! A single `RwLock` guards all three: writers are exclusive, snapshot
//! readers share. A snapshot copies the `Arc` handles, so later inserts
//! (which swap in new `Arc`s) are never observed by a resolution in
//! progress.
//!
//! ## Growth
//!
//! Without `compact`, submitted items stay in the arena for good and every
//! snapshot carries them. `compact` drops submitted items that no pending
//! item depends on; only their ids are kept, to reject resubmission.

use super::entities::{GraphView, Item};
use super::errors::AdmissionError;
use super::value_objects::ItemId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct StoreState {
    items: BTreeMap<ItemId, Arc<Item>>,
    edges: BTreeMap<ItemId, BTreeSet<ItemId>>,
    retired: Arc<BTreeSet<ItemId>>,
}

impl StoreState {
    fn unlink(&mut self, item: &Item) {
        for dep in &item.dependencies {
            let Some(dependents) = self.edges.get_mut(dep) else {
                continue;
            };
            dependents.remove(&item.id);
            if dependents.is_empty() {
                self.edges.remove(dep);
            }
        }
    }

    fn link(&mut self, item: &Item) {
        for dep in &item.dependencies {
            self.edges
                .entry(dep.clone())
                .or_default()
                .insert(item.id.clone());
        }
    }

    fn was_submitted(&self, id: &ItemId) -> bool {
        self.retired.contains(id) || self.items.get(id).is_some_and(|item| item.admitted)
    }

    /// Submitted and every current dependent submitted too.
    fn is_compactable(&self, id: &ItemId, item: &Item) -> bool {
        item.admitted
            && self.edges.get(id).map_or(true, |dependents| {
                dependents
                    .iter()
                    .all(|dependent| self.items.get(dependent).is_some_and(|d| d.admitted))
            })
    }
}

/// Thread-safe store of candidate items.
///
/// INVARIANTS:
/// - Identifiers are unique (insert overwrites a pending item)
/// - A submitted identifier is never accepted again
/// - Edges are exactly those declared by the current version of each item
#[derive(Debug, Default)]
pub struct ItemStore {
    state: RwLock<StoreState>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites an item by identifier.
    ///
    /// Records an edge `dependency -> item.id` for every declared
    /// dependency, whether or not that dependency exists yet. Overwriting
    /// drops the edges declared by the previous version.
    ///
    /// # Errors
    /// - `AlreadySubmitted` if the id was part of a submitted bundle
    pub fn insert(&self, item: Item) -> Result<(), AdmissionError> {
        let mut state = self.state.write();

        if state.was_submitted(&item.id) {
            return Err(AdmissionError::AlreadySubmitted { id: item.id });
        }

        if let Some(previous) = state.items.remove(&item.id) {
            state.unlink(&previous);
            debug!(item_id = %item.id, "Overwriting item");
        }

        state.link(&item);
        state.items.insert(item.id.clone(), Arc::new(item));
        Ok(())
    }

    /// Returns a consistent point-in-time view for resolution.
    pub fn snapshot(&self) -> GraphView {
        let state = self.state.read();
        GraphView::new(state.items.clone(), state.edges.clone()).with_retired(Arc::clone(&state.retired))
    }

    /// Flags submitted items as admitted.
    ///
    /// Each handle must come from the snapshot the bundle was selected
    /// from. An entry is flagged only while the store still holds that same
    /// version; an item overwritten after the snapshot stays pending.
    /// Unknown ids are ignored.
    ///
    /// Copy-on-write: an item shared with an outstanding snapshot is cloned
    /// before the flag is set.
    pub fn mark_admitted<'a>(&self, submitted: impl IntoIterator<Item = &'a Arc<Item>>) -> usize {
        let mut state = self.state.write();
        let mut marked = 0;

        for version in submitted {
            let Some(current) = state.items.get_mut(&version.id) else {
                continue;
            };
            if !Arc::ptr_eq(current, version) {
                debug!(item_id = %version.id, "Item overwritten since snapshot, left pending");
                continue;
            }
            Arc::make_mut(current).admitted = true;
            marked += 1;
        }

        marked
    }

    /// Removes submitted items that no pending item depends on.
    ///
    /// Their ids move to the retired set: resolution treats them as
    /// satisfied dependencies and `insert` keeps rejecting them. Returns the
    /// number of items removed.
    pub fn compact(&self) -> usize {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let removable: Vec<ItemId> = state
            .items
            .iter()
            .filter(|(id, item)| state.is_compactable(id, item))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &removable {
            if let Some(item) = state.items.remove(id) {
                state.unlink(&item);
            }
        }
        if !removable.is_empty() {
            Arc::make_mut(&mut state.retired).extend(removable.iter().cloned());
            debug!(removed = removable.len(), remaining = state.items.len(), "Store compacted");
        }

        removable.len()
    }

    pub fn get(&self, id: &ItemId) -> Option<Arc<Item>> {
        self.state.read().items.get(id).cloned()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.state.read().items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    /// Number of items not yet admitted into a submitted bundle.
    pub fn pending_count(&self) -> usize {
        self.state
            .read()
            .items
            .values()
            .filter(|item| !item.admitted)
            .count()
    }

    /// Number of submitted ids removed by compaction.
    pub fn retired_count(&self) -> usize {
        self.state.read().retired.len()
    }
}
