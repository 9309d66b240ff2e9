//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! This port defines how handlers register interest in domain events
//! without knowing about the underlying transport mechanism.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - Safe to call multiple times with same event
/// - **Quick** - Long operations should be queued for async processing
/// - **Isolated** - Errors don't affect other handlers
///
/// # Example
///
/// ```ignore
/// struct ReportRefresher { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for ReportRefresher {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: CycleCompletedEvent = event.payload_as()?;
///         // Refresh reporting read model...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "ReportRefresher"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    ///
    /// This method should be idempotent - calling it multiple times
    /// with the same event should produce the same result.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging and metrics.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// Handlers register interest in specific event types and are invoked
/// when matching events are published.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe("cycle.completed.v1", report_refresher);
/// subscriber.subscribe_all(&["meeting.completed.v1", "meeting.cancelled.v1"], tracker);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
///
/// An EventBus provides both publishing and subscribing capabilities.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety tests
    #[allow(dead_code)]
    fn assert_handler_object_safe(_: &dyn EventHandler) {}

    #[allow(dead_code)]
    fn assert_subscriber_object_safe(_: &dyn EventSubscriber) {}

    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn event_handler_is_send_sync() {
        fn _check<T: EventHandler>() {
            assert_send_sync::<T>();
        }
    }

    #[test]
    fn event_subscriber_is_send_sync() {
        fn _check<T: EventSubscriber>() {
            assert_send_sync::<T>();
        }
    }
}
