//! # Integration Tests
//!
//! Engine flows exercised through the public crate APIs only.

pub mod concurrency;
pub mod runtime;
pub mod scenarios;
