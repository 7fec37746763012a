//! Ports module for the bundling engine
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::BundleEngineApi;
pub use outbound::{BundleSink, SystemTimeSource, TimeSource};
