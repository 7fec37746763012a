//! Domain invariants for resolution and selection.
//!
//! Checked by the engine in debug builds and by the test suites.

use super::entities::{Bundle, GraphView, Item};
use super::value_objects::{Amount, ItemId, ResourceBudget};
use std::collections::{HashMap, HashSet};

/// INVARIANT-1: Dependency Order
/// For every edge `dependency -> dependent` whose endpoints are both in the
/// view, the dependency appears earlier in `order`.
///
/// Only meaningful for acyclic views; cycles make some edge unsatisfiable.
pub fn invariant_dependency_order(order: &[Item], view: &GraphView) -> bool {
    let position: HashMap<&ItemId, usize> = order
        .iter()
        .enumerate()
        .map(|(index, item)| (&item.id, index))
        .collect();

    view.edges().all(|(dependency, dependent)| {
        match (position.get(dependency), position.get(dependent)) {
            (Some(dep_index), Some(item_index)) => dep_index < item_index,
            // Missing dependency: no ordering constraint
            _ => true,
        }
    })
}

/// INVARIANT-2: Completeness
/// Every node of the view appears exactly once in `order`, and nothing else
/// does.
pub fn invariant_completeness(order: &[Item], view: &GraphView) -> bool {
    if order.len() != view.node_count() {
        return false;
    }

    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .all(|item| view.contains(&item.id) && seen.insert(&item.id))
}

/// INVARIANT-3: Budget
/// The bundle respects count, value and (strict) cost bounds.
pub fn invariant_within_budget(bundle: &Bundle, budget: &ResourceBudget) -> bool {
    let value = bundle
        .items
        .iter()
        .fold(Amount::zero(), |acc, item| acc.saturating_add(item.value));
    let cost = bundle
        .items
        .iter()
        .fold(Amount::zero(), |acc, item| acc.saturating_add(item.cost));

    bundle.len() <= budget.max_count()
        && value <= budget.max_value()
        && (bundle.is_empty() || cost < budget.max_cost())
}

/// INVARIANT-4: Profit Order
/// Admitted items are in non-increasing profit order.
pub fn invariant_profit_order(bundle: &Bundle) -> bool {
    bundle
        .items
        .windows(2)
        .all(|pair| pair[0].profit >= pair[1].profit)
}
