//! # Runtime events emitted by the supervisor, workers and event sources.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Supervisor events**: lifecycle signals applied to the active worker count
//! - **Worker events**: a supervised worker starting, finishing or failing
//! - **Ingestion events**: messages pulled from the event source, receive failures
//! - **Subscriber events**: overflow and panics in the fan-out layer
//!
//! The [`Event`] struct carries the metadata relevant to each kind: worker name,
//! active count, topic/payload, reason.
//!
//! ## Ordering
//! `seq` is taken from a process-wide counter when the event is built, so it
//! orders events from different publishers.
//!
//! ## Example
//! ```rust
//! use reportd::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::MessageReceived)
//!     .with_worker("ingest")
//!     .with_topic("packetd-events")
//!     .with_payload(b"hello".to_vec());
//!
//! assert_eq!(ev.kind, EventKind::MessageReceived);
//! assert_eq!(ev.worker.as_deref(), Some("ingest"));
//! assert_eq!(ev.payload.as_deref(), Some(&b"hello"[..]));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Next value of [`Event::seq`].
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // Supervisor
    /// A `+1` lifecycle signal was applied.
    ///
    /// Sets:
    /// - `active`: count after applying the signal
    WorkerRegistered,

    /// A `-1` lifecycle signal was applied.
    ///
    /// Sets:
    /// - `active`: count after applying the signal
    WorkerUnregistered,

    /// A `-1` arrived while the count was already zero and was rejected.
    ///
    /// Sets:
    /// - `active`: always `0`
    UnbalancedUnregister,

    /// The active count returned to zero; the process must terminate.
    ///
    /// Published exactly once per supervisor.
    ///
    /// Sets:
    /// - `active`: always `0`
    /// - `signals`: number of signals applied when the decision fired
    ShutdownDecided,

    // Workers
    /// A supervised worker task is starting.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerStarting,

    /// A supervised worker returned normally.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `reason`: optional summary of the run
    WorkerFinished,

    /// A supervised worker ended with an error (or panicked).
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `reason`: error message
    WorkerFailed,

    // Ingestion
    /// A message was received from the event source.
    ///
    /// Sets:
    /// - `worker`: receiving worker
    /// - `topic`: message topic
    /// - `payload`: raw message body
    MessageReceived,

    /// A receive call on the event source failed; the receiving loop stops.
    ///
    /// Sets:
    /// - `worker`: receiving worker
    /// - `reason`: transport error
    ReceiveFailed,

    // Subscriber health
    /// A subscriber panicked while handling an event.
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// An event was dropped for one subscriber.
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: `full` or `closed`
    SubscriberOverflow,
}

/// One runtime event. Which optional fields are set depends on [`EventKind`].
#[derive(Clone, Debug)]
pub struct Event {
    /// Process-wide sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the worker (or subscriber), if applicable.
    pub worker: Option<Arc<str>>,
    /// Active worker count after a lifecycle signal.
    pub active: Option<u64>,
    /// Number of lifecycle signals applied so far.
    pub signals: Option<u64>,
    /// Human-readable reason (errors, overflow details, run summary).
    pub reason: Option<Arc<str>>,
    /// Topic of a received message.
    pub topic: Option<Arc<str>>,
    /// Payload of a received message.
    pub payload: Option<Arc<[u8]>>,
}

impl Event {
    /// Creates an event stamped with the next sequence number and the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            active: None,
            signals: None,
            reason: None,
            topic: None,
            payload: None,
        }
    }

    /// Attaches a worker (or subscriber) name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches the active worker count.
    #[inline]
    pub fn with_active(mut self, active: u64) -> Self {
        self.active = Some(active);
        self
    }

    /// Attaches the number of applied lifecycle signals.
    #[inline]
    pub fn with_signals(mut self, signals: u64) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Attaches an error or overflow description.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a message topic.
    #[inline]
    pub fn with_topic(mut self, topic: impl Into<Arc<str>>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Attaches a message payload.
    #[inline]
    pub fn with_payload(mut self, payload: impl Into<Arc<[u8]>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// `SubscriberOverflow` for `subscriber`.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// `SubscriberPanicked` for `subscriber`.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }

    /// Returns the payload rendered as (lossy) UTF-8 text.
    pub fn payload_text(&self) -> Option<String> {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::WorkerStarting);
        let b = Event::new(EventKind::WorkerFinished);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_payload_text_is_lossy() {
        let ev = Event::new(EventKind::MessageReceived).with_payload(vec![b'o', b'k', 0xff]);
        assert_eq!(ev.payload_text().as_deref(), Some("ok\u{fffd}"));
        assert_eq!(Event::new(EventKind::MessageReceived).payload_text(), None);
    }
}
