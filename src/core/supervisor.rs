//! # Supervisor: counts live workers and decides when the process must stop.
//!
//! The [`Supervisor`] is the single source of truth for "is any work still in
//! flight". It owns one consumer task, the **only writer** of the active count,
//! which drains an ordered stream of [`Delta`]s sent by any number of
//! [`Reporter`]s.
//!
//! ## Architecture
//! ```text
//! Reporter (worker A) ──┐
//! Reporter (worker B) ──┼──► mpsc::unbounded (ordered) ──► consumer task
//! Reporter (entry)    ──┘                                   │  Tally::apply(delta)
//!                                                           ├─► watch::Sender<Tally>   (readers)
//!                                                           └─► Bus (WorkerRegistered / WorkerUnregistered /
//!                                                                    UnbalancedUnregister / ShutdownDecided)
//! ```
//!
//! ## Decision rule
//! - The shutdown decision fires **exactly once**, on the delta that first
//!   brings the count from nonzero to zero.
//! - It can never fire before a `Register` has been applied: an `Unregister`
//!   at zero is rejected and counted in [`Tally::rejected`].
//! - Later zero crossings do not fire again.
//!
//! ## Example
//! ```rust
//! use reportd::{Bus, Supervisor};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), reportd::RuntimeError> {
//! let sup = Supervisor::new(Bus::new(16));
//! let reporter = sup.reporter();
//!
//! let guard = reporter.register();
//! tokio::spawn(async move {
//!     let _guard = guard;
//!     // work...
//! });
//!
//! let decision = sup.shutdown().await?;
//! assert_eq!(decision.signals, 2);
//! # Ok(())
//! # }
//! ```

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    core::signal::{Delta, Reporter},
    error::RuntimeError,
    events::{Bus, Event, EventKind},
};

/// The one-time shutdown decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shutdown {
    /// Number of signals applied when the count returned to zero.
    pub signals: u64,
}

/// Outcome of applying one delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// `+1` applied.
    Registered,
    /// `-1` applied, count still nonzero (or decision already taken).
    Unregistered,
    /// `-1` applied and the count returned to zero for the first time.
    Decided,
    /// `-1` at zero; not applied.
    Rejected,
}

/// Running state of the active worker count.
///
/// Owned and mutated by the supervisor consumer only; everyone else sees
/// clones published through a `watch` channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Current number of registered workers.
    pub active: u64,
    /// Number of signals applied so far.
    pub signals: u64,
    /// Number of `Unregister` signals rejected because the count was zero.
    pub rejected: u64,
    /// The shutdown decision, once taken.
    pub shutdown: Option<Shutdown>,
}

impl Tally {
    /// Applies one delta and reports what happened.
    pub fn apply(&mut self, delta: Delta) -> Applied {
        match delta {
            Delta::Register => {
                self.active += 1;
                self.signals += 1;
                Applied::Registered
            }
            Delta::Unregister if self.active == 0 => {
                self.rejected += 1;
                Applied::Rejected
            }
            Delta::Unregister => {
                self.active -= 1;
                self.signals += 1;
                if self.active == 0 && self.shutdown.is_none() {
                    self.shutdown = Some(Shutdown {
                        signals: self.signals,
                    });
                    Applied::Decided
                } else {
                    Applied::Unregistered
                }
            }
        }
    }
}

/// Counts live workers through a single ordered signal stream.
pub struct Supervisor {
    reporter: Reporter,
    state: watch::Receiver<Tally>,
    consumer: JoinHandle<Tally>,
}

impl Supervisor {
    /// Creates the supervisor and spawns its consumer task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(bus: Bus) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(Tally::default());
        let consumer = tokio::spawn(consume(rx, state_tx, bus));

        Self {
            reporter: Reporter::new(tx),
            state,
            consumer,
        }
    }

    /// Returns a new handle for sending lifecycle signals.
    pub fn reporter(&self) -> Reporter {
        self.reporter.clone()
    }

    /// Sends one lifecycle signal. Shorthand for `reporter().report(delta)`.
    pub fn report(&self, delta: Delta) {
        self.reporter.report(delta);
    }

    /// Latest state published by the consumer.
    ///
    /// Eventually consistent: signals still queued are not reflected yet.
    pub fn tally(&self) -> Tally {
        self.state.borrow().clone()
    }

    /// Current active worker count (see [`Supervisor::tally`]).
    pub fn active(&self) -> u64 {
        self.state.borrow().active
    }

    /// Waits for the shutdown decision.
    ///
    /// Drops the supervisor's own sender first, so if every other reporter is
    /// gone before any worker registered this returns
    /// [`RuntimeError::NoWorkers`] instead of waiting forever.
    pub async fn shutdown(self) -> Result<Shutdown, RuntimeError> {
        let Self {
            reporter,
            mut state,
            consumer,
        } = self;
        drop(reporter);

        let decided = state
            .wait_for(|t| t.shutdown.is_some())
            .await
            .ok()
            .and_then(|t| t.shutdown);

        match decided {
            Some(shutdown) => Ok(shutdown),
            None => match consumer.await {
                Ok(_) => Err(RuntimeError::NoWorkers),
                Err(_) => Err(RuntimeError::SupervisorPanicked),
            },
        }
    }

    /// Closes the supervisor's sender and waits until every reporter is gone
    /// and all queued signals have been applied. Returns the final state.
    pub async fn drain(self) -> Result<Tally, RuntimeError> {
        drop(self.reporter);
        self.consumer
            .await
            .map_err(|_| RuntimeError::SupervisorPanicked)
    }
}

/// Consumer loop: the sole writer of the active count.
async fn consume(
    mut rx: mpsc::UnboundedReceiver<Delta>,
    state: watch::Sender<Tally>,
    bus: Bus,
) -> Tally {
    let mut tally = Tally::default();

    while let Some(delta) = rx.recv().await {
        let applied = tally.apply(delta);
        debug!(?delta, ?applied, active = tally.active, "lifecycle signal");

        match applied {
            Applied::Registered => {
                bus.publish(Event::new(EventKind::WorkerRegistered).with_active(tally.active));
            }
            Applied::Unregistered => {
                bus.publish(Event::new(EventKind::WorkerUnregistered).with_active(tally.active));
            }
            Applied::Rejected => {
                bus.publish(Event::new(EventKind::UnbalancedUnregister).with_active(0));
            }
            Applied::Decided => {
                bus.publish(Event::new(EventKind::WorkerUnregistered).with_active(0));
                bus.publish(
                    Event::new(EventKind::ShutdownDecided)
                        .with_active(0)
                        .with_signals(tally.signals),
                );
            }
        }
        state.send_replace(tally.clone());
    }
    tally
}
