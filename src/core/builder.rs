use std::sync::Arc;

use super::reportd::Reportd;
use crate::{
    config::Config,
    subscribers::{LogWriter, Subscribe},
};

/// Builder for constructing a [`Reportd`] instance.
pub struct ReportdBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ReportdBuilder {
    /// Creates a new builder with the given configuration.
    ///
    /// Starts with a single [`LogWriter`] subscriber.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: vec![Arc::new(LogWriter::new())],
        }
    }

    /// Replaces the event subscribers.
    ///
    /// Subscribers receive runtime events (lifecycle signals, messages, failures)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber to the current set.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the daemon. Nothing is spawned until [`Reportd::run`].
    pub fn build(self) -> Reportd {
        Reportd {
            cfg: self.cfg,
            subscribers: self.subscribers,
        }
    }
}
