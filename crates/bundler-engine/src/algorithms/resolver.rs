//! Dependency Resolver
//!
//! Linearizes a snapshot so that dependencies precede dependents, using an
//! explicit-stack depth-first post-order traversal. O(V + E).
//!
//! Determinism: roots are visited in ascending id order and each node's
//! dependencies in ascending id order, so a fixed snapshot always yields
//! the same linearization.
//!
//! Cycles never abort resolution. Reaching a node that is still in
//! progress records `CycleDetected` and the edge is not followed; the node
//! is still emitted exactly once when its own frame completes.

use crate::domain::entities::{GraphView, Item};
use crate::domain::errors::Diagnostic;
use crate::domain::value_objects::ItemId;
use std::collections::{btree_set, HashMap};
use tracing::{debug, warn};

/// Result of one resolution: the linear order plus every anomaly seen.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub order: Vec<Item>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn ids(&self) -> Vec<ItemId> {
        self.order.iter().map(|item| item.id.clone()).collect()
    }

    pub fn has_cycles(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_cycle)
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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Resolved,
}

struct Frame<'a> {
    item: &'a Item,
    pending: btree_set::Iter<'a, ItemId>,
}

impl<'a> Frame<'a> {
    fn new(item: &'a Item) -> Self {
        Self {
            item,
            pending: item.dependencies.iter(),
        }
    }
}

/// Resolve a snapshot into a dependency-respecting order.
pub fn resolve(view: &GraphView) -> Resolution {
    let mut state: HashMap<&ItemId, VisitState> = HashMap::with_capacity(view.node_count());
    let mut resolution = Resolution {
        order: Vec::with_capacity(view.node_count()),
        diagnostics: Vec::new(),
    };
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for (root_id, root) in view.iter() {
        if state.contains_key(root_id) {
            continue;
        }
        state.insert(root_id, VisitState::InProgress);
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let current = frame.item;
            let Some(dep_id) = frame.pending.next() else {
                // All dependencies handled: post-order emit.
                stack.pop();
                state.insert(&current.id, VisitState::Resolved);
                resolution.order.push(current.clone());
                continue;
            };

            let dependent = &current.id;
            let Some((dep_key, dep_item)) = view.nodes.get_key_value(dep_id) else {
                if view.is_retired(dep_id) {
                    // Submitted and compacted: the dependency is satisfied.
                    continue;
                }
                warn!(item_id = %dependent, dependency = %dep_id, "Dependency not found in snapshot");
                resolution.diagnostics.push(Diagnostic::MissingDependency {
                    dependent: dependent.clone(),
                    missing: dep_id.clone(),
                });
                continue;
            };

            match state.get(dep_key) {
                None => {
                    state.insert(dep_key, VisitState::InProgress);
                    stack.push(Frame::new(dep_item));
                }
                Some(VisitState::InProgress) => {
                    warn!(item_id = %dep_key, via = %dependent, "Cycle detected");
                    resolution.diagnostics.push(Diagnostic::CycleDetected {
                        node: dep_key.clone(),
                        via: dependent.clone(),
                    });
                }
                Some(VisitState::Resolved) => {}
            }
        }
    }

    debug!(
        resolved = resolution.order.len(),
        diagnostics = resolution.diagnostics.len(),
        "Snapshot resolved"
    );

    resolution
}
