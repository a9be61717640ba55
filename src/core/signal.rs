//! # Lifecycle signals and the handles that send them.
//!
//! A [`Delta`] is the only message the supervisor understands. Workers never
//! touch the active count: they hold a [`Reporter`] (a cloneable sender into the
//! supervisor's ordered stream) and, while running, a [`WorkerGuard`].
//!
//! ## Guard discipline
//! ```text
//! reporter.register()  ──► Delta::Register   (sent now)
//!        │
//!        ▼
//!   WorkerGuard  ── moved into the worker task ──► dropped on any exit path
//!                                                  ──► Delta::Unregister (sent once)
//! ```
//!
//! Sends on an unbounded channel never block and never fail while the consumer
//! is alive. Signals from one sender keep their order.

use tokio::sync::mpsc;

/// Signed change applied to the active worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// `+1`: a worker started.
    Register,
    /// `-1`: a worker ended.
    Unregister,
}

impl Delta {
    /// Numeric value of the delta.
    #[inline]
    pub fn value(self) -> i64 {
        match self {
            Delta::Register => 1,
            Delta::Unregister => -1,
        }
    }
}

/// Cloneable handle for sending lifecycle signals to the supervisor.
///
/// Safe to use from any number of tasks concurrently; no locking is involved.
#[derive(Clone, Debug)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<Delta>,
}

impl Reporter {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Delta>) -> Self {
        Self { tx }
    }

    /// Sends one lifecycle signal.
    ///
    /// Prefer [`Reporter::register`], which pairs the `+1` with exactly one `-1`.
    pub fn report(&self, delta: Delta) {
        // Consumer gone means the process is already past its shutdown decision.
        let _ = self.tx.send(delta);
    }

    /// Sends `+1` and returns the guard that will send the matching `-1`.
    #[must_use = "dropping the guard immediately unregisters the worker"]
    pub fn register(&self) -> WorkerGuard {
        self.report(Delta::Register);
        WorkerGuard {
            reporter: self.clone(),
        }
    }
}

/// RAII registration of one worker.
///
/// Sends [`Delta::Unregister`] exactly once, when dropped: on normal return,
/// early `?` return, or unwinding panic.
#[derive(Debug)]
pub struct WorkerGuard {
    reporter: Reporter,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.reporter.report(Delta::Unregister);
    }
}
