//! # Bundler Engine
//!
//! Dependency-aware admission and bundling of candidate transactions.
//! Producers insert items concurrently; a scheduler periodically resolves a
//! snapshot into a dependency-respecting order, greedily selects a
//! budget-bounded, profit-maximizing bundle and hands it to a sink.
//!
//! ## Architecture
//!
//! - **Domain**: Item, Bundle, GraphView, ItemStore, PriorityMempool, errors, invariants
//! - **Algorithms**: DFS resolver, budgeted selector, admission policy
//! - **Ports**: Inbound (BundleEngineApi) and Outbound (BundleSink, TimeSource)
//! - **Adapters**: logging and channel sinks
//! - **Application**: BundleEngine service orchestration
//!
//! ## Strategies
//!
//! - Dependency-aware: `insert` + `tick` (snapshot, resolve, select, submit)
//! - Priority: `add_independent` + `drain_priority` (max-heap on `cost + profit`)

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{ChannelBundleSink, LoggingBundleSink};
pub use algorithms::{resolve, select, select_with_mode, AdmissionPolicy, Resolution, SelectionMode};
pub use application::BundleEngine;
pub use config::EngineConfig;
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::mempool::PriorityMempool;
pub use domain::store::ItemStore;
pub use domain::value_objects::*;
pub use ports::inbound::BundleEngineApi;
pub use ports::outbound::{BundleSink, SystemTimeSource, TimeSource};
