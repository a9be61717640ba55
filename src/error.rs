//! Error types used by the reportd runtime, its workers and event sources.
//!
//! This module defines three enums:
//!
//! - [`RuntimeError`]: errors raised while starting or driving the process.
//! - [`WorkerError`]: errors that end a single worker run.
//! - [`SourceError`]: transport failures reported by an [`EventSource`](crate::EventSource).
//!
//! Each type provides `as_label` (stable snake_case label for logs).
//! Worker and source errors never reach the supervisor: they are logged by the
//! component that observed them and only end that worker's run.

use thiserror::Error;

/// # Errors produced by the reportd runtime.
///
/// These represent failures of the process wiring itself: configuration,
/// event source setup and the supervisor consumer.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The event source could not be opened; no worker was started.
    #[error("event source setup failed: {0}")]
    SourceSetup(#[source] SourceError),

    /// Every reporter was dropped before any worker registered.
    #[error("lifecycle stream closed before any worker registered")]
    NoWorkers,

    /// The supervisor consumer task terminated abnormally.
    #[error("supervisor consumer terminated abnormally")]
    SupervisorPanicked,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use reportd::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoWorkers.as_label(), "runtime_no_workers");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Config(_) => "runtime_config",
            RuntimeError::SourceSetup(_) => "runtime_source_setup",
            RuntimeError::NoWorkers => "runtime_no_workers",
            RuntimeError::SupervisorPanicked => "runtime_supervisor_panicked",
        }
    }
}

/// # Errors produced by a worker run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The event source failed while the worker was receiving.
    #[error("event source failed: {0}")]
    Source(#[from] SourceError),

    /// The worker task panicked.
    #[error("worker panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Source(_) => "worker_source",
            WorkerError::Panicked { .. } => "worker_panicked",
        }
    }
}

/// # Errors produced by an event source.
///
/// `Connect` and `Subscribe` happen during setup, the rest while receiving.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// Could not open or connect the transport.
    #[error("connect to {endpoint} failed: {error}")]
    Connect {
        /// Endpoint the source tried to reach.
        endpoint: String,
        /// Underlying transport error.
        error: String,
    },

    /// Could not install the topic filter.
    #[error("subscribe to {topic:?} failed: {error}")]
    Subscribe {
        /// Topic filter that was rejected.
        topic: String,
        /// Underlying transport error.
        error: String,
    },

    /// A receive call failed at the transport level.
    #[error("receive failed: {error}")]
    Receive {
        /// Underlying transport error.
        error: String,
    },

    /// A message did not have the `[topic, payload, ..]` shape.
    #[error("malformed message: expected at least 2 frames, got {frames}")]
    Malformed {
        /// Number of frames actually received.
        frames: usize,
    },

    /// The source has been closed and will not yield more events.
    #[error("source closed")]
    Closed,
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use reportd::SourceError;
    ///
    /// assert_eq!(SourceError::Closed.as_label(), "source_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Connect { .. } => "source_connect",
            SourceError::Subscribe { .. } => "source_subscribe",
            SourceError::Receive { .. } => "source_receive",
            SourceError::Malformed { .. } => "source_malformed",
            SourceError::Closed => "source_closed",
        }
    }

    /// Indicates whether the error happened while setting the source up.
    pub fn is_setup(&self) -> bool {
        matches!(self, SourceError::Connect { .. } | SourceError::Subscribe { .. })
    }
}
