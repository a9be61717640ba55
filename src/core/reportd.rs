//! # Reportd: process wiring.
//!
//! [`Reportd`] connects the event source, starts the ingestion and persistence
//! workers under a [`Supervisor`] and waits for the shutdown decision.
//!
//! ## Startup sequence
//! ```text
//! Reportd::run(connect)
//!   ├─► Observer::spawn(bus, subscribers)
//!   ├─► connect(&cfg.source)
//!   │     └─ Err ──► log, close observer, return RuntimeError::SourceSetup  (no worker started)
//!   ├─► Supervisor::new(bus)
//!   ├─► runner::spawn_all([IngestWorker(source), PersistWorker])
//!   │     └─ register both ──► spawn both
//!   ├─► Supervisor::shutdown()   (blocks until the count returns to zero)
//!   └─► Observer::close()        (flush logs)
//! ```
//!
//! The caller decides what happens after the decision; the `reportd` binary
//! exits the process with status 0 without waiting for anything else.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    config::{Config, SourceConfig},
    core::{observer::Observer, runner, supervisor::{Shutdown, Supervisor}},
    error::{RuntimeError, SourceError},
    events::Bus,
    source::EventSource,
    subscribers::Subscribe,
    workers::{IngestWorker, PersistWorker, Worker},
};

/// Configured daemon, ready to run. Build with [`Reportd::builder`].
pub struct Reportd {
    pub(super) cfg: Config,
    pub(super) subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Reportd {
    /// Returns a builder for the daemon.
    pub fn builder(cfg: Config) -> super::builder::ReportdBuilder {
        super::builder::ReportdBuilder::new(cfg)
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Connects the event source with `connect`, runs both workers and returns
    /// the shutdown decision.
    ///
    /// # Errors
    /// - [`RuntimeError::SourceSetup`] if `connect` fails; no worker is started.
    /// - [`RuntimeError::SupervisorPanicked`] if the supervisor consumer dies.
    pub async fn run<S, F>(self, connect: F) -> Result<Shutdown, RuntimeError>
    where
        S: EventSource,
        F: FnOnce(&SourceConfig) -> Result<S, SourceError>,
    {
        let Self { cfg, subscribers } = self;
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let observer = Observer::spawn(&bus, subscribers);

        info!(endpoint = %cfg.source.endpoint, topic = %cfg.source.topic, "setting up event source");
        let source = match connect(&cfg.source) {
            Ok(source) => source,
            Err(e) => {
                error!(label = e.as_label(), "unable to set up event source: {e}");
                observer.close().await;
                return Err(RuntimeError::SourceSetup(e));
            }
        };

        let supervisor = Supervisor::new(bus.clone());
        let workers: Vec<Box<dyn Worker>> = vec![
            Box::new(IngestWorker::new(source, &cfg.ingest, bus.clone())),
            Box::new(PersistWorker::new(&cfg.persist)),
        ];
        runner::spawn_all(workers, &supervisor.reporter(), &bus);

        info!("waiting for all workers to finish");
        let decision = supervisor.shutdown().await;
        observer.close().await;
        decision
    }
}
