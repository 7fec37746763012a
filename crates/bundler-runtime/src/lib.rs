//! # Bundler Runtime
//!
//! Drives the bundling engine as a long-running process.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration (file, then environment overrides)
//! 3. Construct the engine (invalid budgets are fatal here)
//! 4. Spawn the producer (stdin JSON lines) and the scheduler (fixed interval)
//! 5. Wait for Ctrl+C / SIGTERM, then signal shutdown to both tasks

pub mod config;
pub mod producer;
pub mod record;
pub mod scheduler;

use std::sync::Arc;

use bundler_engine::{BundleEngine, BundleSink, ConfigError, SystemTimeSource};
use tokio::io::AsyncBufRead;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use config::{RuntimeConfig, RuntimeConfigError, Strategy};
pub use producer::ProducerStats;
pub use record::ItemRecord;

/// The engine plus the tasks that feed and drain it.
pub struct BundlerRuntime {
    engine: Arc<BundleEngine>,
    config: RuntimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl BundlerRuntime {
    pub fn new(config: RuntimeConfig, sink: Arc<dyn BundleSink>) -> Result<Self, ConfigError> {
        let engine = Arc::new(BundleEngine::new(config.engine.clone(), sink)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            strategy = config.strategy.as_str(),
            tick_interval_ms = config.tick_interval_ms,
            "Bundler runtime created"
        );

        Ok(Self {
            engine,
            config,
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn engine(&self) -> Arc<BundleEngine> {
        Arc::clone(&self.engine)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Spawn the producer over `reader`, stamping items with system time.
    pub fn spawn_producer<R>(&self, reader: R) -> JoinHandle<ProducerStats>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let strategy = self.config.strategy;
        let shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            producer::run_producer(reader, engine.as_ref(), strategy, &SystemTimeSource, shutdown).await
        })
    }

    /// Spawn the fixed-interval scheduler.
    pub fn spawn_scheduler(&self) -> JoinHandle<u64> {
        let engine = Arc::clone(&self.engine);
        let strategy = self.config.strategy;
        let interval = self.config.tick_interval();
        let shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move { scheduler::run_scheduler(&engine, strategy, interval, shutdown).await })
    }

    /// Signal every spawned task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }
}
