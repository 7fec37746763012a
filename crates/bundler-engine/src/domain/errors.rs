//! Error types for the bundling engine.
//!
//! Only `ConfigError` is fatal. Resolution anomalies are `Diagnostic`
//! values returned alongside the result, and submission failures are
//! scoped to a single tick.

use super::value_objects::{Amount, ItemId};
use thiserror::Error;

/// Invalid engine configuration, rejected before any item is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Budget max count must be positive")]
    ZeroMaxCount,

    #[error("Budget max cost must be positive")]
    ZeroCostBudget,

    #[error("Budget max value must be positive")]
    ZeroValueBudget,
}

/// Item rejected by the admission policy before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Item {id} profit {profit} below minimum {minimum}")]
    ProfitBelowMinimum {
        id: ItemId,
        profit: Amount,
        minimum: Amount,
    },

    #[error("Item {id} cost {cost} exceeds maximum {maximum}")]
    CostAboveMaximum {
        id: ItemId,
        cost: Amount,
        maximum: Amount,
    },

    #[error("Item {id} was already submitted in an earlier bundle")]
    AlreadySubmitted { id: ItemId },
}

/// Failure reported by a bundle sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Bundle rejected: {0}")]
    Rejected(String),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Non-fatal anomaly found while resolving a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A declared dependency is absent from the snapshot; the edge was dropped.
    #[error("Dependency {missing} not found for item {dependent}")]
    MissingDependency { dependent: ItemId, missing: ItemId },

    /// `via` declared a dependency on `node` while `node` was still being visited.
    #[error("Cycle detected at item {node} (reached from {via})")]
    CycleDetected { node: ItemId, via: ItemId },
}

impl Diagnostic {
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }

    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

/// Errors surfaced by the engine service.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Bundle submission failed at tick {tick}")]
    SubmissionFailed {
        tick: u64,
        #[source]
        source: SubmissionError,
    },
}
