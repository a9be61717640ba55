//! # Event subscribers for the reportd runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Supervisor / workers ── publish(Event) ──► Bus ──► Observer ──► SubscriberSet
//!                                                                      │
//!                                                           ┌──────────┴──────────┐
//!                                                           ▼                     ▼
//!                                                       LogWriter              Custom
//! ```

mod log;
mod subscribe;
mod subscriber_set;

pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
pub(crate) use subscriber_set::panic_message;
