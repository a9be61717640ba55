//! # Bus listener feeding the subscriber set.
//!
//! ```text
//! Bus.subscribe() ──► listener task ──► SubscriberSet::emit(&Event)
//!                          ▲
//!              CancellationToken (close)
//!                          │
//!                          └─► drain pending events ─► SubscriberSet::shutdown()
//! ```
//!
//! [`Observer::close`] returns only after every event published before the
//! call has been handed to the subscribers and their queues have drained, so
//! the final log lines are written before the process exits.

use std::sync::Arc;

use tokio::{
    sync::broadcast::error::{RecvError, TryRecvError},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Running bus listener.
pub struct Observer {
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl Observer {
    /// Subscribes to `bus` and starts forwarding events to `subscribers`.
    pub fn spawn(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(subscribers, bus.clone());
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "event listener lagged; events dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = cancelled.cancelled() => {
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => set.emit(&ev),
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            set.shutdown().await;
        });

        Self { token, listener }
    }

    /// Stops the listener and waits for subscribers to finish queued events.
    pub async fn close(self) {
        self.token.cancel();
        let _ = self.listener.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::{Event, EventKind};

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.seq);
        }
    }

    #[tokio::test]
    async fn test_close_flushes_events_published_before_it() {
        let bus = Bus::new(64);
        let collect = Arc::new(Collect::default());
        let observer = Observer::spawn(&bus, vec![collect.clone()]);

        let published: Vec<u64> = (0..10)
            .map(|_| {
                let ev = Event::new(EventKind::WorkerRegistered).with_active(1);
                let seq = ev.seq;
                bus.publish(ev);
                seq
            })
            .collect();
        observer.close().await;

        assert_eq!(*collect.seen.lock().unwrap(), published);
    }
}
