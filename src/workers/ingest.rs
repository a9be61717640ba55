//! # Event ingestion worker.
//!
//! Drains an [`EventSource`] for a bounded wall-clock window and publishes
//! every message to the bus as [`EventKind::MessageReceived`].
//!
//! ## Loop
//! ```text
//! start = now
//! while now - start < window:
//!     wait = min(window - elapsed, poll)
//!     recv(wait)
//!       ├─ Some(msg) → publish MessageReceived{topic, payload}
//!       ├─ None      → (idle) re-check window
//!       └─ Err(e)    → publish ReceiveFailed, stop, return Err(e)
//! ```
//!
//! ## Rules
//! - The window is checked **before** every receive: a zero window performs no receive
//! - No receive waits past the end of the window
//! - Receive errors are never retried
//! - Messages are forwarded as-is (no decoding, filtering or validation)

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    config::IngestConfig,
    error::WorkerError,
    events::{Bus, Event, EventKind},
    source::EventSource,
    workers::Worker,
};

const NAME: &str = "event-listener";

/// Pulls events from its source for a bounded window.
///
/// Owns the source exclusively; the connection is released when the worker is dropped.
pub struct IngestWorker<S> {
    source: S,
    window: Duration,
    poll: Duration,
    bus: Bus,
}

impl<S: EventSource> IngestWorker<S> {
    /// Creates the worker around an already connected source.
    pub fn new(source: S, cfg: &IngestConfig, bus: Bus) -> Self {
        Self {
            source,
            window: cfg.window(),
            poll: cfg.poll(),
            bus,
        }
    }

    /// How long the next receive may wait, or `None` once the window has elapsed.
    fn next_wait(&self, elapsed: Duration) -> Option<Duration> {
        self.window
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
            .map(|remaining| remaining.min(self.poll))
    }
}

#[async_trait]
impl<S: EventSource> Worker for IngestWorker<S> {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&mut self) -> Result<(), WorkerError> {
        info!(window = ?self.window, "starting event listener");
        let started = Instant::now();
        let mut received: u64 = 0;

        let res = loop {
            let Some(wait) = self.next_wait(started.elapsed()) else {
                break Ok(());
            };

            match self.source.recv(wait).await {
                Ok(Some(msg)) => {
                    received += 1;
                    self.bus.publish(
                        Event::new(EventKind::MessageReceived)
                            .with_worker(NAME)
                            .with_topic(msg.topic)
                            .with_payload(msg.payload),
                    );
                }
                Ok(None) => debug!("no event within {wait:?}"),
                Err(e) => {
                    self.bus.publish(
                        Event::new(EventKind::ReceiveFailed)
                            .with_worker(NAME)
                            .with_reason(e.to_string()),
                    );
                    break Err(e.into());
                }
            }
        };

        info!(received, elapsed = ?started.elapsed(), "event listener loop ended");
        res
    }
}
