//! # Worker abstraction.
//!
//! A worker runs exactly once. It does not register itself: the runner holds
//! its registration (see [`spawn_all`](crate::spawn_all)) so the matching
//! unregister is sent on every exit path, including panics.

use async_trait::async_trait;

use crate::error::WorkerError;

/// # Asynchronous unit of supervised work.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use reportd::{Worker, WorkerError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Worker for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&mut self) -> Result<(), WorkerError> {
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + 'static {
    /// Returns a stable, human-readable worker name (for logs only).
    fn name(&self) -> &str;

    /// Runs the worker to completion.
    ///
    /// An `Err` ends this worker only; it is logged and never escalated.
    async fn run(&mut self) -> Result<(), WorkerError>;
}
