//! ZeroMQ `SUB` socket source.
//!
//! The socket API is blocking, so each receive runs on the blocking pool. The
//! socket is moved into the blocking closure and handed back with the result,
//! which keeps it exclusively owned without a lock. A receive never blocks for
//! longer than its `wait`: the closure polls for readability first and only
//! then reads the multipart message.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{EventSource, RawEvent};
use crate::{config::SourceConfig, error::SourceError};

/// Subscription on a ZeroMQ publisher.
pub struct ZmqSource {
    endpoint: String,
    socket: Option<zmq::Socket>,
    _context: zmq::Context,
}

impl ZmqSource {
    /// Opens a `SUB` socket, connects it to `cfg.endpoint` and subscribes to
    /// `cfg.topic`.
    ///
    /// Any failure is returned; a partially set up socket is closed before
    /// returning.
    pub fn connect(cfg: &SourceConfig) -> Result<Self, SourceError> {
        let connect_err = |e: zmq::Error| SourceError::Connect {
            endpoint: cfg.endpoint.clone(),
            error: e.to_string(),
        };

        let context = zmq::Context::new();
        let socket = context.socket(zmq::SUB).map_err(connect_err)?;
        socket.connect(&cfg.endpoint).map_err(connect_err)?;
        socket
            .set_subscribe(cfg.topic.as_bytes())
            .map_err(|e| SourceError::Subscribe {
                topic: cfg.topic.clone(),
                error: e.to_string(),
            })?;

        info!(endpoint = %cfg.endpoint, topic = %cfg.topic, "subscribed to event publisher");
        Ok(Self {
            endpoint: cfg.endpoint.clone(),
            socket: Some(socket),
            _context: context,
        })
    }

    /// Closes the socket now instead of waiting for drop.
    pub fn close(self) {
        drop(self);
    }
}

#[async_trait]
impl EventSource for ZmqSource {
    async fn recv(&mut self, wait: Duration) -> Result<Option<RawEvent>, SourceError> {
        let socket = self.socket.take().ok_or(SourceError::Closed)?;
        let timeout_ms = i64::try_from(wait.as_millis()).unwrap_or(i64::MAX);

        let (socket, res) = tokio::task::spawn_blocking(move || {
            let res = poll_once(&socket, timeout_ms);
            (socket, res)
        })
        .await
        .map_err(|e| SourceError::Receive {
            error: e.to_string(),
        })?;

        self.socket = Some(socket);
        res
    }
}

impl Drop for ZmqSource {
    fn drop(&mut self) {
        if let Some(socket) = self.socket.take() {
            // Pending outbound data is irrelevant for a SUB socket.
            let _ = socket.set_linger(0);
            drop(socket);
            debug!(endpoint = %self.endpoint, "closed event source");
        }
    }
}

fn poll_once(socket: &zmq::Socket, timeout_ms: i64) -> Result<Option<RawEvent>, SourceError> {
    let ready = socket.poll(zmq::POLLIN, timeout_ms).map_err(receive_err)?;
    if ready == 0 {
        return Ok(None);
    }
    let frames = socket.recv_multipart(0).map_err(receive_err)?;
    RawEvent::from_frames(frames).map(Some)
}

fn receive_err(e: zmq::Error) -> SourceError {
    SourceError::Receive {
        error: e.to_string(),
    }
}
