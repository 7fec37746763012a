//! Algorithms module for the bundling engine
//!
//! Contains:
//! - Dependency resolver (explicit-stack DFS linearization)
//! - Budgeted selector (greedy, profit-descending)
//! - Admission policy

pub mod admission;
pub mod resolver;
pub mod selector;

pub use admission::AdmissionPolicy;
pub use resolver::{resolve, Resolution};
pub use selector::{select, select_with_mode, SelectionMode};
