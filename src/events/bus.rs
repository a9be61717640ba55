//! # Runtime event bus.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] channel. The supervisor consumer,
//! the worker runner, the ingestion loop and the subscriber tasks all publish
//! on it; the [`Observer`](crate::Observer) is its only regular reader.
//!
//! ```text
//! Supervisor ──┐
//! Runner     ──┼──► Bus ──► Observer ──► SubscriberSet
//! IngestWorker ┘
//! ```
//!
//! Publishing never waits. A reader that falls more than `capacity` events
//! behind receives `Lagged(n)` and misses the `n` oldest events, and events
//! published while nobody subscribes are lost. That is acceptable because
//! the bus only carries observability data: lifecycle signals travel on the
//! supervisor's own channel.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to the runtime event channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes `ev` to current receivers; dropped if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Returns a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::WorkerStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::WorkerFinished).with_worker("persist"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::WorkerFinished);
        assert_eq!(ev.worker.as_deref(), Some("persist"));
    }
}
