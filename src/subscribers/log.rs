//! # LogWriter: renders runtime events through `tracing`
//!
//! This is the logging collaborator of the daemon: every runtime event ends up
//! as one leveled log line.
//!
//! ## Levels
//! - `info`: registrations, worker start/finish, received messages, shutdown decision
//! - `warn`: receive failures, worker failures, unbalanced unregisters, subscriber overflow
//! - `error`: subscriber panics
//!
//! ## Example output
//! ```text
//! INFO  running workers: 2
//! INFO  got some data, topic: packetd-events, message: {"session":1}
//! WARN  unable to receive messages: receive failed: Context was terminated
//! INFO  running workers: 0
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::WorkerRegistered | EventKind::WorkerUnregistered => {
                info!(seq = e.seq, "running workers: {}", e.active.unwrap_or_default());
            }
            EventKind::UnbalancedUnregister => {
                warn!(seq = e.seq, "unregister without matching register; count stays at 0");
            }
            EventKind::ShutdownDecided => {
                info!(
                    seq = e.seq,
                    signals = e.signals.unwrap_or_default(),
                    "all workers finished; shutdown decided"
                );
            }
            EventKind::WorkerStarting => {
                info!(worker, "starting worker");
            }
            EventKind::WorkerFinished => {
                info!(worker, "shutting down worker {reason}");
            }
            EventKind::WorkerFailed => {
                warn!(worker, "worker ended with error: {reason}");
            }
            EventKind::MessageReceived => {
                info!(
                    worker,
                    "got some data, topic: {}, message: {}",
                    e.topic.as_deref().unwrap_or(""),
                    e.payload_text().unwrap_or_default()
                );
            }
            EventKind::ReceiveFailed => {
                warn!(worker, "unable to receive messages: {reason}");
            }
            EventKind::SubscriberOverflow => {
                warn!(subscriber = worker, "subscriber dropped event: {reason}");
            }
            EventKind::SubscriberPanicked => {
                error!(subscriber = worker, "subscriber panicked: {reason}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
