//! # Domain Layer - Bundling Engine
//!
//! ## Components
//!
//! - `entities`: Item, Bundle, GraphView, TickReport
//! - `store`: ItemStore (arena + snapshots)
//! - `mempool`: PriorityMempool (max-heap strategy)
//! - `value_objects`: ItemId, ResourceBudget, PrioritizedItem
//! - `errors`: ConfigError, AdmissionError, SubmissionError, Diagnostic, EngineError
//! - `invariants`: checks shared by the engine and the test suites

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod mempool;
pub mod store;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use mempool::*;
pub use store::*;
pub use value_objects::*;
