//! # Bundler Runtime
//!
//! Reads candidate items as JSON lines on stdin and emits one bundle per
//! tick through the logging sink.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bundler_engine::LoggingBundleSink;
use bundler_runtime::{BundlerRuntime, RuntimeConfig};
use bundler_telemetry::{init_telemetry, TelemetryConfig};
use tokio::io::BufReader;
use tracing::info;

/// Blocking stdin reads cannot be cancelled, so the runtime is shut down
/// with a timeout instead of waiting for the pending read.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(run());
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn run() -> Result<()> {
    // Initialize logging and metrics
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    // Load configuration
    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;

    let runtime = BundlerRuntime::new(config, Arc::new(LoggingBundleSink::new()))
        .context("Invalid engine configuration")?;

    let producer = runtime.spawn_producer(BufReader::new(tokio::io::stdin()));
    let scheduler = runtime.spawn_scheduler();

    info!("Bundler is running. Press Ctrl+C to stop.");
    wait_for_signal().await?;

    runtime.shutdown();
    let ticks = scheduler.await.context("Scheduler task failed")?;
    let stats = producer.await.context("Producer task failed")?;

    info!(
        ticks,
        accepted = stats.accepted,
        rejected = stats.rejected,
        malformed = stats.malformed,
        "Shutdown complete"
    );

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for Ctrl+C")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<()> {
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")
}
