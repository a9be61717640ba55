//! # Fan-out of runtime events to subscribers.
//!
//! [`SubscriberSet`] gives every subscriber a bounded queue and a dedicated
//! task. [`SubscriberSet::emit`] never waits: a full or closed queue drops the
//! event for that subscriber only and reports it as `SubscriberOverflow`.
//!
//! ```text
//! emit(event) ─┬─► queue ─► task ─► LogWriter::on_event
//!              └─► queue ─► task ─► custom::on_event ── panic ─► SubscriberPanicked
//! ```
//!
//! Each subscriber sees events in emit order; there is no ordering between
//! subscribers. Panics are caught with `AssertUnwindSafe`, so a subscriber that
//! panics while holding a lock may leave its own state poisoned.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Queue feeding one subscriber task.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Subscribers of one daemon run, each behind its own queue.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    tasks: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one task per subscriber. Tasks run until [`SubscriberSet::shutdown`].
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, tasks) = subs
            .into_iter()
            .map(|sub| {
                let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let lane = Lane {
                    name: sub.name(),
                    tx,
                };
                (lane, tokio::spawn(drive(sub, rx, bus.clone())))
            })
            .unzip();

        Self { lanes, tasks, bus }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// True when no subscriber was registered.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Queues a copy of `event` for every subscriber.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Queues a shared event for every subscriber without waiting.
    ///
    /// A full or closed queue drops the event for that subscriber and publishes
    /// `SubscriberOverflow`, except for overflow events themselves.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let report = event.kind != EventKind::SubscriberOverflow;

        for lane in &self.lanes {
            let reason = match lane.tx.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if report {
                self.bus.publish(Event::subscriber_overflow(lane.name, reason));
            }
        }
    }

    /// Closes every queue and waits until each subscriber has handled what was
    /// already queued.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

/// Feeds queued events to one subscriber, reporting panics on the bus.
async fn drive(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(panic) = handled {
            bus.publish(Event::subscriber_panicked(sub.name(), panic_message(&*panic)));
        }
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Explode;

    #[async_trait]
    impl Subscribe for Explode {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "explode"
        }
    }

    #[tokio::test]
    async fn test_events_delivered_in_order_before_shutdown_returns() {
        let collect = Arc::new(Collect::default());
        let set = SubscriberSet::new(vec![collect.clone()], Bus::new(16));

        set.emit(&Event::new(EventKind::WorkerStarting));
        set.emit(&Event::new(EventKind::WorkerFinished));
        set.shutdown().await;

        let seen = collect.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::WorkerStarting, EventKind::WorkerFinished]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_reported_and_isolated() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let collect = Arc::new(Collect::default());
        let set = SubscriberSet::new(vec![Arc::new(Explode), collect.clone()], bus);

        set.emit(&Event::new(EventKind::WorkerStarting));
        set.shutdown().await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.worker.as_deref(), Some("explode"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert_eq!(collect.seen.lock().unwrap().len(), 1);
    }
}
