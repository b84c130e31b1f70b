//! EventPublisher port - Interface for publishing domain events.
//!
//! Command handlers publish the events they commit without knowing how
//! (or whether) anyone consumes them.

use crate::bus::CallContext;
use crate::domain::foundation::Message;

/// Port for publishing domain events.
///
/// Publishing is fire-and-forget:
/// - the call never waits for subscribers to finish
/// - subscriber failures are never reported back to the publisher
/// - no ordering is guaranteed between subscribers
///
/// Returns the number of handler invocations scheduled, which is useful
/// for logs and tests but carries no delivery guarantee.
pub trait EventPublisher<E: Message>: Send + Sync {
    /// Publish a single event.
    fn publish(&self, ctx: &CallContext, event: E) -> usize;

    /// Publish a batch of events, scheduling them in order.
    fn publish_all(&self, ctx: &CallContext, events: Vec<E>) -> usize {
        events
            .into_iter()
            .map(|event| self.publish(ctx, event))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserEvent;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher<UserEvent>) {}

    struct CountingPublisher;

    impl EventPublisher<UserEvent> for CountingPublisher {
        fn publish(&self, _ctx: &CallContext, _event: UserEvent) -> usize {
            2
        }
    }

    #[test]
    fn publish_all_sums_scheduled_handlers() {
        use crate::domain::foundation::{Timestamp, UserId};
        use crate::domain::user::EmailAddress;

        let event = UserEvent::WasRegisteredWithEmail {
            user_id: UserId::new(),
            email: EmailAddress::new("a@example.com").unwrap(),
            occurred_at: Timestamp::now(),
        };

        let scheduled =
            CountingPublisher.publish_all(&CallContext::background(), vec![event.clone(), event]);
        assert_eq!(scheduled, 4);
    }
}
