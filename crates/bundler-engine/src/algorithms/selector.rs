//! Budgeted Selector
//!
//! Greedy, non-backtracking selection of a profit-maximizing subset under a
//! count limit, a value budget and a cost budget. Not globally optimal: an
//! item that does not fit is skipped for good, and a later (cheaper,
//! lower-profit) item may still be admitted.

use crate::domain::entities::{Bundle, Item};
use crate::domain::value_objects::{ItemId, ResourceBudget};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// How declared dependencies constrain selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Budgets only; dependencies are not consulted.
    #[default]
    Greedy,
    /// Additionally skip an item whose dependencies are among the candidates
    /// but were not admitted before it. Dependencies outside the candidate
    /// set (missing or already submitted) do not block.
    DependencyClosed,
}

/// Select a bundle with the default greedy mode.
pub fn select(items: &[Item], budget: &ResourceBudget) -> Bundle {
    select_with_mode(items, budget, SelectionMode::Greedy)
}

/// Select a bundle from resolver output.
///
/// 1. Drop items already admitted by an earlier tick
/// 2. Stable sort by profit descending (equal profits keep resolver order)
/// 3. Admit while count < max, cost stays strictly below the cost budget and
///    value stays within the value budget; halt once the count is reached
pub fn select_with_mode(items: &[Item], budget: &ResourceBudget, mode: SelectionMode) -> Bundle {
    let mut candidates: Vec<&Item> = items.iter().filter(|item| !item.admitted).collect();
    // `sort_by` is stable: ties preserve resolver order.
    candidates.sort_by(|a, b| b.profit.cmp(&a.profit));

    let candidate_ids: HashSet<&ItemId> = match mode {
        SelectionMode::Greedy => HashSet::new(),
        SelectionMode::DependencyClosed => candidates.iter().map(|item| &item.id).collect(),
    };
    let mut admitted: HashSet<&ItemId> = HashSet::new();
    let mut bundle = Bundle::empty();

    for item in candidates {
        if bundle.len() >= budget.max_count() {
            break;
        }

        let fits_cost = bundle
            .total_cost
            .checked_add(item.cost)
            .is_some_and(|cost| cost < budget.max_cost());
        if !fits_cost {
            trace!(item_id = %item.id, cost = %item.cost, "Skipped: cost budget");
            continue;
        }

        let fits_value = bundle
            .total_value
            .checked_add(item.value)
            .is_some_and(|value| value <= budget.max_value());
        if !fits_value {
            trace!(item_id = %item.id, value = %item.value, "Skipped: value budget");
            continue;
        }

        if mode == SelectionMode::DependencyClosed {
            let blocked = item
                .dependencies
                .iter()
                .any(|dep| candidate_ids.contains(dep) && !admitted.contains(dep));
            if blocked {
                trace!(item_id = %item.id, "Skipped: dependency not admitted");
                continue;
            }
            admitted.insert(&item.id);
        }

        bundle.push(item.clone());
    }

    debug!(
        bundle_size = bundle.len(),
        total_profit = %bundle.total_profit,
        total_cost = %bundle.total_cost,
        "Bundle selected"
    );

    bundle
}
