//! Fixed-interval scheduling loop.

use crate::config::Strategy;
use bundler_engine::{BundleEngine, BundleEngineApi, EngineError, TickReport};
use bundler_telemetry::metrics::{
    HistogramTimer, BUNDLES_SUBMITTED, BUNDLE_SIZE, CYCLES_DETECTED, MISSING_DEPENDENCIES,
    PENDING_ITEMS, SUBMISSION_FAILURES, TICK_DURATION,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Runs one tick (or drain) per interval until shutdown.
///
/// A failed tick is logged and the loop continues. Returns the number of
/// ticks run.
pub async fn run_scheduler(
    engine: &BundleEngine,
    strategy: Strategy,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = run_once(engine, strategy).await {
                    debug!(tick = ticks + 1, error = %err, "Scheduler continuing after failed tick");
                }
                ticks += 1;
            }
            _ = shutdown.changed() => {
                info!(ticks, "Scheduler received shutdown signal");
                break;
            }
        }
    }

    ticks
}

/// Runs a single tick for the strategy and records its metrics.
pub async fn run_once(engine: &BundleEngine, strategy: Strategy) -> Result<TickReport, EngineError> {
    let result = {
        let _timer = HistogramTimer::new(&TICK_DURATION);
        match strategy {
            Strategy::Dependency => engine.tick().await,
            Strategy::Priority => engine.drain_priority().await,
        }
    };

    match &result {
        Ok(report) => record_report(report),
        Err(err) => {
            warn!(error = %err, "Tick failed, retrying next interval");
            SUBMISSION_FAILURES.inc();
        }
    }
    PENDING_ITEMS.set((engine.store().pending_count() + engine.mempool().len()) as f64);

    result
}

fn record_report(report: &TickReport) {
    if report.submitted() {
        BUNDLES_SUBMITTED.inc();
        BUNDLE_SIZE.observe(report.bundle.len() as f64);
    }
    CYCLES_DETECTED.inc_by(report.cycle_count() as f64);
    MISSING_DEPENDENCIES.inc_by(report.missing_count() as f64);
}
