//! JSON-lines producer: one item per line, routed by strategy.

use crate::config::Strategy;
use crate::record::ItemRecord;
use bundler_engine::{AdmissionError, BundleEngineApi, TimeSource};
use bundler_telemetry::{metric_inc, ITEMS_ADMITTED, ITEMS_REJECTED};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Counters for one producer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    pub accepted: u64,
    pub rejected: u64,
    pub malformed: u64,
}

/// Reads items until end of input or shutdown.
///
/// Blank lines are skipped. Malformed lines and policy rejections are logged
/// and counted; neither stops the producer.
pub async fn run_producer<R>(
    reader: R,
    engine: &dyn BundleEngineApi,
    strategy: Strategy,
    clock: &dyn TimeSource,
    mut shutdown: watch::Receiver<bool>,
) -> ProducerStats
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ProducerStats::default();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = shutdown.changed() => {
                info!("Producer received shutdown signal");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Producer input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Producer input failed");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let record = match ItemRecord::parse(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Malformed item line skipped");
                metric_inc!(ITEMS_REJECTED, &["malformed"]);
                stats.malformed += 1;
                continue;
            }
        };

        let item = record.into_item(clock);
        let item_id = item.id.clone();
        let result = match strategy {
            Strategy::Dependency => engine.insert(item),
            Strategy::Priority => engine.add_independent(item),
        };

        match result {
            Ok(()) => {
                debug!(item_id = %item_id, strategy = strategy.as_str(), "Item accepted");
                metric_inc!(ITEMS_ADMITTED, &[strategy.as_str()]);
                stats.accepted += 1;
            }
            Err(err) => {
                info!(item_id = %item_id, error = %err, "Item rejected");
                metric_inc!(ITEMS_REJECTED, &[rejection_reason(&err)]);
                stats.rejected += 1;
            }
        }
    }

    stats
}

fn rejection_reason(err: &AdmissionError) -> &'static str {
    match err {
        AdmissionError::ProfitBelowMinimum { .. } => "profit_below_minimum",
        AdmissionError::CostAboveMaximum { .. } => "cost_above_maximum",
        AdmissionError::AlreadySubmitted { .. } => "already_submitted",
    }
}
