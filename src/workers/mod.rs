//! # Supervised workers.
//!
//! This module provides the worker abstraction and the two workers the daemon runs:
//! - [`Worker`] - trait for a named, async unit of work run once under supervision
//! - [`IngestWorker`] - pulls events from an [`EventSource`](crate::EventSource) for a bounded window
//! - [`PersistWorker`] - placeholder for event persistence, holds its slot for a fixed time

mod ingest;
mod persist;
mod worker;

pub use ingest::IngestWorker;
pub use persist::PersistWorker;
pub use worker::Worker;
