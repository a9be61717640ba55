//! # Subscriber trait
//!
//! Anything that wants to see the daemon's runtime events (lifecycle signals,
//! received messages, failures) implements [`Subscribe`] and is handed to
//! [`ReportdBuilder::with_subscriber`](crate::ReportdBuilder::with_subscriber).
//!
//! Each subscriber is fed from its own bounded queue by the
//! [`SubscriberSet`](crate::SubscriberSet). A slow subscriber only delays
//! itself; when its queue is full the event is dropped for that subscriber and
//! a `SubscriberOverflow` event is published instead.

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of runtime events.
///
/// `on_event` runs on the subscriber's own task; keep it non-blocking.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Events arrive in publish order.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
