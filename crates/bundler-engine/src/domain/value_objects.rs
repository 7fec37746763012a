//! Value objects for the bundling engine.
//!
//! Immutable types used for identifying, ordering and bounding items.

use super::entities::Item;
use super::errors::ConfigError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Amounts (cost, value, profit, priority) are 256-bit unsigned integers.
pub type Amount = U256;

/// Timestamp in milliseconds since UNIX epoch, always supplied by the caller.
pub type Timestamp = u64;

/// Unique identifier of an item within a store.
///
/// Ordered lexicographically; the resolver relies on this ordering for
/// deterministic node iteration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Resource budget bounding a single bundle.
///
/// Constructed once and immutable thereafter. The cost bound is strict
/// (cumulative cost must stay below `max_cost`), the value bound is
/// inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBudget {
    max_count: usize,
    max_value: Amount,
    max_cost: Amount,
}

impl ResourceBudget {
    /// Creates a validated budget.
    ///
    /// # Errors
    /// - `ZeroMaxCount` if `max_count` is zero
    /// - `ZeroValueBudget` if `max_value` is zero
    /// - `ZeroCostBudget` if `max_cost` is zero (nothing could ever be admitted)
    pub fn new(max_count: usize, max_value: Amount, max_cost: Amount) -> Result<Self, ConfigError> {
        let budget = Self {
            max_count,
            max_value,
            max_cost,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Budget limited by item count only.
    pub fn with_count(max_count: usize) -> Result<Self, ConfigError> {
        Self::new(max_count, Amount::MAX, Amount::MAX)
    }

    /// Re-checks the construction rules (used for deserialized budgets).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == 0 {
            return Err(ConfigError::ZeroMaxCount);
        }
        if self.max_value.is_zero() {
            return Err(ConfigError::ZeroValueBudget);
        }
        if self.max_cost.is_zero() {
            return Err(ConfigError::ZeroCostBudget);
        }
        Ok(())
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn max_value(&self) -> Amount {
        self.max_value
    }

    pub fn max_cost(&self) -> Amount {
        self.max_cost
    }
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self {
            max_count: 5,
            max_value: Amount::MAX,
            max_cost: Amount::MAX,
        }
    }
}

/// An item wrapped with its computed priority for the max-heap.
///
/// Implements `Ord` such that higher priority = greater.
/// Ties are broken by timestamp (earlier wins) then id (ascending wins).
#[derive(Clone, Debug)]
pub struct PrioritizedItem {
    pub priority: Amount,
    pub item: Item,
}

impl PrioritizedItem {
    pub fn new(item: Item) -> Self {
        Self {
            priority: item.priority(),
            item,
        }
    }

    pub fn into_item(self) -> Item {
        self.item
    }
}

impl Ord for PrioritizedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            // Earlier timestamp = greater (FIFO for same priority)
            .then_with(|| other.item.timestamp.cmp(&self.item.timestamp))
            .then_with(|| other.item.id.cmp(&self.item.id))
    }
}

impl PartialOrd for PrioritizedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PrioritizedItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PrioritizedItem {}
