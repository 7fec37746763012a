//! Outbound (Driven) ports for the bundling engine.
//!
//! These traits define dependencies on external systems that the engine
//! needs for operation.

use crate::domain::entities::Bundle;
use crate::domain::errors::SubmissionError;
use crate::domain::value_objects::Timestamp;
use async_trait::async_trait;

/// Destination for finalized bundles (relay, block builder, log, ...).
///
/// A bundle is handed over by reference; implementations clone what they
/// keep.
#[async_trait]
pub trait BundleSink: Send + Sync {
    /// Submits one bundle.
    ///
    /// # Returns
    /// - `Ok(())`: the bundle was accepted; its items are marked admitted
    /// - `Err`: the bundle was not accepted; the engine state is left as is
    async fn submit(&self, bundle: &Bundle) -> Result<(), SubmissionError>;
}

/// Time source for stamping items on arrival.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}
