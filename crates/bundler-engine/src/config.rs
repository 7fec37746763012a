//! Configuration for the bundling engine

use crate::algorithms::{AdmissionPolicy, SelectionMode};
use crate::domain::errors::ConfigError;
use crate::domain::value_objects::ResourceBudget;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-bundle count, value and cost limits
    pub budget: ResourceBudget,
    /// Arrival-time thresholds
    pub admission: AdmissionPolicy,
    /// Whether selection honours declared dependencies
    pub selection: SelectionMode,
    /// Drop submitted items from the store after each successful tick
    pub compact_submitted: bool,
}

impl EngineConfig {
    pub fn with_budget(budget: ResourceBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()
    }
}
