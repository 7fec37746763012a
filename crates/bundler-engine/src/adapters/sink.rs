//! Bundle sink adapters.

use crate::domain::entities::Bundle;
use crate::domain::errors::SubmissionError;
use crate::ports::outbound::BundleSink;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Reports each bundle as structured log lines and always accepts it.
#[derive(Debug, Clone, Default)]
pub struct LoggingBundleSink;

impl LoggingBundleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BundleSink for LoggingBundleSink {
    async fn submit(&self, bundle: &Bundle) -> Result<(), SubmissionError> {
        info!(
            tick = bundle.tick,
            bundle_size = bundle.len(),
            total_profit = %bundle.total_profit,
            total_value = %bundle.total_value,
            total_cost = %bundle.total_cost,
            "Bundle submitted"
        );

        for (position, item) in bundle.items.iter().enumerate() {
            debug!(
                tick = bundle.tick,
                position,
                item_id = %item.id,
                origin = %item.origin,
                destination = %item.destination,
                profit = %item.profit,
                cost = %item.cost,
                "Bundle item"
            );
        }

        Ok(())
    }
}

/// Forwards bundles to an in-process consumer over a bounded channel.
///
/// Applies backpressure: `submit` waits while the channel is full.
#[derive(Debug, Clone)]
pub struct ChannelBundleSink {
    sender: mpsc::Sender<Bundle>,
}

impl ChannelBundleSink {
    /// Creates a sink and the receiver that consumes its bundles.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Bundle>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: mpsc::Sender<Bundle>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl BundleSink for ChannelBundleSink {
    async fn submit(&self, bundle: &Bundle) -> Result<(), SubmissionError> {
        self.sender
            .send(bundle.clone())
            .await
            .map_err(|_| SubmissionError::Unavailable("bundle receiver dropped".into()))
    }
}
