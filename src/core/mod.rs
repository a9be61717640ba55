//! Runtime core: supervision and process wiring.
//!
//! Public API from this module: [`Supervisor`] (the active-worker count and
//! shutdown decision), the signal handles, and [`Reportd`] (the wiring used by
//! the binary).
//!
//! Internal modules:
//! - [`signal`]: lifecycle deltas, reporters and RAII worker guards;
//! - [`supervisor`]: single-writer count and one-time shutdown decision;
//! - [`runner`]: spawns workers holding their registration;
//! - [`observer`]: bus listener feeding the subscriber set;
//! - [`reportd`] / [`builder`]: entry-point orchestration.

mod builder;
mod observer;
mod reportd;
mod runner;
mod signal;
mod supervisor;

pub use builder::ReportdBuilder;
pub use observer::Observer;
pub use reportd::Reportd;
pub use runner::{spawn_all, spawn_supervised};
pub use signal::{Delta, Reporter, WorkerGuard};
pub use supervisor::{Applied, Shutdown, Supervisor, Tally};
