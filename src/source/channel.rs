//! In-process event source backed by a bounded tokio channel.
//!
//! The publisher side can inject transport failures with
//! [`ChannelPublisher::fail`], which the source returns from its next `recv`.
//! Dropping every publisher closes the source: `recv` then returns
//! [`SourceError::Closed`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{EventSource, RawEvent};
use crate::error::SourceError;

type Item = Result<RawEvent, SourceError>;

/// Creates a connected publisher/source pair with the given queue capacity.
pub fn channel(capacity: usize) -> (ChannelPublisher, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelPublisher { tx }, ChannelSource { rx })
}

/// Sending half of an in-process source.
#[derive(Clone, Debug)]
pub struct ChannelPublisher {
    tx: mpsc::Sender<Item>,
}

impl ChannelPublisher {
    /// Publishes one message. Returns `Closed` if the source was dropped.
    pub async fn publish(
        &self,
        topic: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Result<(), SourceError> {
        self.send(Ok(RawEvent::new(topic, payload))).await
    }

    /// Makes the source's next `recv` fail with `err`.
    pub async fn fail(&self, err: SourceError) -> Result<(), SourceError> {
        self.send(Err(err)).await
    }

    async fn send(&self, item: Item) -> Result<(), SourceError> {
        self.tx.send(item).await.map_err(|_| SourceError::Closed)
    }
}

/// Receiving half of an in-process source.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Item>,
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn recv(&mut self, wait: Duration) -> Result<Option<RawEvent>, SourceError> {
        match tokio::time::timeout(wait, self.rx.recv()).await {
            Err(_elapsed) => Ok(None),
            Ok(None) => Err(SourceError::Closed),
            Ok(Some(item)) => item.map(Some),
        }
    }
}
