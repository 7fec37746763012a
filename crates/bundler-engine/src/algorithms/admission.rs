//! Admission filter applied before an item reaches the store or the mempool.

use crate::domain::entities::Item;
use crate::domain::errors::AdmissionError;
use crate::domain::value_objects::Amount;
use serde::{Deserialize, Serialize};

/// Arrival-time thresholds. The default accepts everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionPolicy {
    /// Items with a lower profit are rejected.
    pub min_profit: Amount,
    /// Items with a higher cost are rejected (inclusive bound).
    pub max_cost: Option<Amount>,
}

impl AdmissionPolicy {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn with_min_profit(mut self, min_profit: Amount) -> Self {
        self.min_profit = min_profit;
        self
    }

    pub fn with_max_cost(mut self, max_cost: Amount) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    /// Checks an item against the thresholds.
    ///
    /// The cost ceiling is checked first.
    pub fn check(&self, item: &Item) -> Result<(), AdmissionError> {
        if let Some(maximum) = self.max_cost {
            if item.cost > maximum {
                return Err(AdmissionError::CostAboveMaximum {
                    id: item.id.clone(),
                    cost: item.cost,
                    maximum,
                });
            }
        }

        if item.profit < self.min_profit {
            return Err(AdmissionError::ProfitBelowMinimum {
                id: item.id.clone(),
                profit: item.profit,
                minimum: self.min_profit,
            });
        }

        Ok(())
    }
}
