//! # Runtime configuration.
//!
//! Provides [`Config`], the centralized settings for the daemon, loaded from
//! environment variables with the `config` crate.
//!
//! ## Environment variable format
//! Prefix `REPORTD`, `__` between nesting levels:
//! - `REPORTD__SOURCE__ENDPOINT=tcp://localhost:5561` → `source.endpoint`
//! - `REPORTD__INGEST__WINDOW_MS=30000` → `ingest.window_ms`
//! - `REPORTD__BUS_CAPACITY=1024` → `bus_capacity`
//!
//! Every field has a default, so an empty environment yields [`Config::default`].
//!
//! ## Sentinel values
//! - `ingest.window_ms = 0` → the listener performs no receive at all
//! - `ingest.poll_ms = 0` → clamped to 1ms
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use serde::Deserialize;

use crate::error::RuntimeError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "REPORTD";

/// Global configuration for the daemon.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Publish/subscribe endpoint and topic filter.
    pub source: SourceConfig,
    /// Event ingestion worker settings.
    pub ingest: IngestConfig,
    /// Event persistence worker settings.
    pub persist: PersistConfig,
    /// Capacity of the runtime event bus ring buffer.
    pub bus_capacity: usize,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

/// Where the event source connects and what it subscribes to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Transport endpoint, e.g. `tcp://localhost:5561`.
    pub endpoint: String,
    /// Topic filter installed on the subscription.
    pub topic: String,
}

/// Event ingestion worker settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// Wall-clock window, measured from the worker's start, during which it receives.
    pub window_ms: u64,
    /// Longest single wait on the source before the window is re-checked.
    pub poll_ms: u64,
}

/// Event persistence worker settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PersistConfig {
    /// How long the placeholder worker holds its slot.
    pub hold_ms: u64,
}

impl Config {
    /// Loads configuration from `REPORTD__*` environment variables.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Config`] if a value cannot be parsed into its field type.
    pub fn load() -> Result<Self, RuntimeError> {
        Self::from_env(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from the given environment source.
    fn from_env(env: config::Environment) -> Result<Self, RuntimeError> {
        let cfg = config::Config::builder()
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl IngestConfig {
    /// Receive window as a [`Duration`].
    #[inline]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Poll interval as a [`Duration`], at least 1ms.
    #[inline]
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}

impl PersistConfig {
    /// Hold duration as a [`Duration`].
    #[inline]
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `log_filter = "info"`
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            ingest: IngestConfig::default(),
            persist: PersistConfig::default(),
            bus_capacity: 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl Default for SourceConfig {
    /// `tcp://localhost:5561`, topic `packetd-events`.
    fn default() -> Self {
        Self {
            endpoint: "tcp://localhost:5561".to_string(),
            topic: "packetd-events".to_string(),
        }
    }
}

impl Default for IngestConfig {
    /// 30s window, 1s poll.
    fn default() -> Self {
        Self {
            window_ms: 30_000,
            poll_ms: 1_000,
        }
    }
}

impl Default for PersistConfig {
    /// 30s hold.
    fn default() -> Self {
        Self { hold_ms: 30_000 }
    }
}
