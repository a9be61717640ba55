//! # reportd
//!
//! **reportd** is a small event reporting daemon. It subscribes to a
//! publish/subscribe event stream, runs a fixed set of supervised workers, and
//! exits cleanly exactly when the last of them has finished.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────────────┐        ┌────────────────────┐
//!     │    IngestWorker    │        │   PersistWorker    │
//!     │ (EventSource recv) │        │   (placeholder)    │
//!     └─────────┬──────────┘        └─────────┬──────────┘
//!               │ WorkerGuard                 │ WorkerGuard
//!               │ (+1 on spawn, -1 on drop)   │
//!               ▼                             ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                   │
//! │  - mpsc::unbounded<Delta> (single ordered stream)             │
//! │  - consumer task: sole writer of the active count             │
//! │  - watch<Tally>: shutdown decision, fired exactly once        │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ lifecycle events
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast channel)                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼
//!                    Observer ──► SubscriberSet ──► LogWriter (tracing)
//! ```
//!
//! ### Lifecycle
//! ```text
//! connect source ──► register(ingest), register(persist) ──► spawn both
//!
//! count: 0 ─► 1 ─► 2 ─► ... ─► 0   ──► Shutdown decision ──► process exit(0)
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                      |
//! |-------------------|-------------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Count live workers, decide shutdown once.                   | [`Supervisor`], [`Reporter`], [`WorkerGuard`] |
//! | **Workers**       | Bounded event ingestion, persistence placeholder.           | [`Worker`], [`IngestWorker`], [`PersistWorker`] |
//! | **Sources**       | Pub/sub transport boundary.                                 | [`EventSource`], [`ChannelSource`]      |
//! | **Subscriber API**| Hook into runtime events (logging, custom subscribers).     | [`Subscribe`], [`LogWriter`]            |
//! | **Errors**        | Typed errors for runtime, workers and sources.              | [`RuntimeError`], [`WorkerError`], [`SourceError`] |
//! | **Configuration** | Environment-driven settings.                                | [`Config`]                              |
//!
//! ## Optional features
//! - `zmq`: exports [`ZmqSource`] (ZeroMQ `SUB` socket) and builds the `reportd` binary.
//!
//! ## Example
//! ```rust
//! use reportd::{Config, Reportd, source};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), reportd::RuntimeError> {
//!     let mut cfg = Config::default();
//!     cfg.ingest.window_ms = 50;
//!     cfg.persist.hold_ms = 10;
//!
//!     let (publisher, src) = source::channel(16);
//!     let daemon = Reportd::builder(cfg).build();
//!
//!     let decision = daemon.run(move |_| Ok(src)).await?;
//!     assert_eq!(decision.signals, 4);
//!     drop(publisher);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;

pub mod config;
pub mod logging;
pub mod source;
pub mod workers;

// ---- Public re-exports ----

pub use crate::core::{
    Applied, Delta, Observer, Reporter, Reportd, ReportdBuilder, Shutdown, Supervisor, Tally,
    WorkerGuard, spawn_all, spawn_supervised,
};
pub use config::Config;
pub use error::{RuntimeError, SourceError, WorkerError};
pub use events::{Bus, Event, EventKind};
#[cfg(feature = "zmq")]
pub use source::ZmqSource;
pub use source::{ChannelPublisher, ChannelSource, EventSource, RawEvent};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use workers::{IngestWorker, PersistWorker, Worker};
