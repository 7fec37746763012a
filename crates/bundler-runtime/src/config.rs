//! Runtime configuration: optional JSON file plus environment overrides.

use crate::record::parse_amount;
use bundler_engine::{ConfigError, EngineConfig, ResourceBudget};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Which admission path the producer feeds and the scheduler drains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Item store + resolver + selector
    #[default]
    Dependency,
    /// Priority mempool; declared dependencies ignored
    Priority,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::Priority => "priority",
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dependency" => Ok(Self::Dependency),
            "priority" => Ok(Self::Priority),
            other => Err(format!("unknown strategy {other:?}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {name}")]
    InvalidVar { name: &'static str, value: String },

    #[error(transparent)]
    Budget(#[from] ConfigError),

    #[error("Tick interval must be positive")]
    ZeroTickInterval,
}

/// Runtime configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub strategy: Strategy,
    /// Scheduling period in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                compact_submitted: true,
                ..EngineConfig::default()
            },
            strategy: Strategy::default(),
            tick_interval_ms: 1_000,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BUNDLER_CONFIG`: path to a JSON config file (optional)
    /// - `BUNDLER_MAX_COUNT`: items per bundle
    /// - `BUNDLER_MAX_VALUE` / `BUNDLER_MAX_COST`: decimal or 0x-hex amounts
    /// - `BUNDLER_TICK_MS`: scheduling period
    /// - `BUNDLER_STRATEGY`: `dependency` or `priority`
    /// - `BUNDLER_COMPACT`: drop submitted items after each tick (default on)
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuntimeConfigError> {
        let mut config = match lookup("BUNDLER_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        let budget = &config.engine.budget;
        let mut max_count = budget.max_count();
        let mut max_value = budget.max_value();
        let mut max_cost = budget.max_cost();

        if let Some(raw) = lookup("BUNDLER_MAX_COUNT") {
            max_count = raw.trim().parse().map_err(|_| invalid("BUNDLER_MAX_COUNT", raw))?;
        }
        if let Some(raw) = lookup("BUNDLER_MAX_VALUE") {
            max_value = parse_amount(&raw).ok_or_else(|| invalid("BUNDLER_MAX_VALUE", raw))?;
        }
        if let Some(raw) = lookup("BUNDLER_MAX_COST") {
            max_cost = parse_amount(&raw).ok_or_else(|| invalid("BUNDLER_MAX_COST", raw))?;
        }
        if let Some(raw) = lookup("BUNDLER_TICK_MS") {
            config.tick_interval_ms = raw.trim().parse().map_err(|_| invalid("BUNDLER_TICK_MS", raw))?;
        }
        if let Some(raw) = lookup("BUNDLER_STRATEGY") {
            config.strategy = raw.parse().map_err(|_| invalid("BUNDLER_STRATEGY", raw))?;
        }
        if let Some(raw) = lookup("BUNDLER_COMPACT") {
            config.engine.compact_submitted = parse_flag(&raw).ok_or_else(|| invalid("BUNDLER_COMPACT", raw))?;
        }

        config.engine.budget = ResourceBudget::new(max_count, max_value, max_cost)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, RuntimeConfigError> {
        let text = std::fs::read_to_string(&path).map_err(|source| RuntimeConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RuntimeConfigError::Json { path, source })
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.engine.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(RuntimeConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &'static str, value: String) -> RuntimeConfigError {
    RuntimeConfigError::InvalidVar { name, value }
}
