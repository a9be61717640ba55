//! Event persistence placeholder.
//!
//! Holds a supervision slot for a fixed duration without performing any I/O.
//! Storage is deliberately not implemented here.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::{config::PersistConfig, error::WorkerError, workers::Worker};

/// Placeholder worker standing in for "store events somewhere".
#[derive(Debug, Clone)]
pub struct PersistWorker {
    hold: Duration,
}

impl PersistWorker {
    /// Creates the worker from its configuration.
    pub fn new(cfg: &PersistConfig) -> Self {
        Self { hold: cfg.hold() }
    }
}

#[async_trait]
impl Worker for PersistWorker {
    fn name(&self) -> &str {
        "event-logger"
    }

    async fn run(&mut self) -> Result<(), WorkerError> {
        info!(hold = ?self.hold, "starting event logger");
        tokio::time::sleep(self.hold).await;
        Ok(())
    }
}
