//! # Event sources: the boundary to the publish/subscribe transport.
//!
//! An [`EventSource`] owns its connection and yields raw `(topic, payload)`
//! pairs. Connecting and subscribing happen in the concrete source's
//! constructor; releasing the connection happens on `Drop`, so every exit path
//! (including a failed setup, where no source is ever returned) is covered.
//!
//! ## Implementations
//! - [`ChannelSource`]: in-process source fed by a [`ChannelPublisher`].
//! - `ZmqSource` (feature `zmq`): ZeroMQ `SUB` socket.
//!
//! ## Receive contract
//! ```text
//! recv(wait) ──► Ok(Some(event))  message available
//!            ──► Ok(None)         nothing arrived within `wait` (not an error)
//!            ──► Err(e)           transport failure; callers stop receiving
//! ```

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SourceError;

mod channel;
#[cfg(feature = "zmq")]
mod zeromq;

pub use channel::{ChannelPublisher, ChannelSource, channel};
#[cfg(feature = "zmq")]
pub use zeromq::ZmqSource;

/// One message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Topic the message was published on.
    pub topic: String,
    /// Raw message body.
    pub payload: Vec<u8>,
}

impl RawEvent {
    /// Creates an event from a topic and a payload.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Decodes a multipart message `[topic, payload, ..]`.
    ///
    /// Frames after the payload are ignored. Fewer than two frames is
    /// [`SourceError::Malformed`]. The topic frame is decoded as lossy UTF-8.
    pub fn from_frames(frames: Vec<Vec<u8>>) -> Result<Self, SourceError> {
        let count = frames.len();
        let mut it = frames.into_iter();
        match (it.next(), it.next()) {
            (Some(topic), Some(payload)) => Ok(Self {
                topic: String::from_utf8_lossy(&topic).into_owned(),
                payload,
            }),
            _ => Err(SourceError::Malformed { frames: count }),
        }
    }
}

/// A subscription to a publish/subscribe transport.
///
/// Exclusively owned by one receiver; no concurrent access.
#[async_trait]
pub trait EventSource: Send + 'static {
    /// Waits up to `wait` for the next message.
    async fn recv(&mut self, wait: Duration) -> Result<Option<RawEvent>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frames_takes_topic_and_payload() {
        let ev = RawEvent::from_frames(vec![b"packetd-events".to_vec(), b"{}".to_vec()]).unwrap();
        assert_eq!(ev, RawEvent::new("packetd-events", b"{}".to_vec()));
    }

    #[test]
    fn test_from_frames_ignores_trailing_frames() {
        let ev = RawEvent::from_frames(vec![b"t".to_vec(), b"p".to_vec(), b"extra".to_vec()]).unwrap();
        assert_eq!(ev.payload, b"p");
    }

    #[test]
    fn test_from_frames_rejects_single_frame() {
        let err = RawEvent::from_frames(vec![b"only-topic".to_vec()]).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { frames: 1 }));
    }
}
