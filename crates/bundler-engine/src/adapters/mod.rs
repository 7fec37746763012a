//! Adapters layer for the bundling engine.
//!
//! Concrete bundle sinks for the outbound port.

pub mod sink;

pub use sink::{ChannelBundleSink, LoggingBundleSink};
