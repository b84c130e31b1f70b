//! Event bus: fan-out of domain events to zero or more handlers.
//!
//! Publishing never waits. Every handler registered for the event's kind
//! gets its own task and its own clone of the event; a failing or panicking
//! handler is logged and affects nobody else.

use std::sync::Arc;
use tracing::Instrument;

use crate::domain::foundation::{Message, MessageKind};
use crate::ports::{EventHandler, EventPublisher};

use super::isolation::run_isolated;
use super::{CallContext, Registry};

type SharedHandler<E> = Arc<dyn EventHandler<E>>;

/// Collects event handlers before the bus is built.
pub struct EventBusBuilder<E: Message> {
    registry: Registry<E::Kind, SharedHandler<E>>,
}

impl<E: Message> EventBusBuilder<E> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Adds a handler for one event kind. Any number may share a kind.
    pub fn subscribe(mut self, kind: E::Kind, handler: SharedHandler<E>) -> Self {
        tracing::debug!(event = kind.name(), handler = handler.name(), "Event handler registered");
        self.registry.subscribe(kind, handler);
        self
    }

    /// Adds one handler for several kinds.
    pub fn subscribe_all(
        mut self,
        kinds: impl IntoIterator<Item = E::Kind>,
        handler: SharedHandler<E>,
    ) -> Self {
        for kind in kinds {
            self = self.subscribe(kind, Arc::clone(&handler));
        }
        self
    }

    pub fn build(self) -> EventBus<E> {
        tracing::info!(
            subscriptions = self.registry.handler_count(),
            "Event bus ready"
        );
        EventBus {
            registry: Arc::new(self.registry),
        }
    }
}

impl<E: Message> Default for EventBusBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers each event to every subscribed handler.
pub struct EventBus<E: Message> {
    registry: Arc<Registry<E::Kind, SharedHandler<E>>>,
}

impl<E: Message> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: Message + Clone> EventBus<E> {
    /// Number of handlers subscribed to a kind.
    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.registry.resolve(&kind).len()
    }

    fn schedule(&self, ctx: &CallContext, event: E) -> usize {
        let kind = event.kind();
        let handlers = self.registry.resolve(&kind);

        if handlers.is_empty() {
            tracing::trace!(event = kind.name(), "No subscribers for event");
            return 0;
        }

        for handler in handlers {
            let handler = Arc::clone(handler);
            let handler_ctx = ctx.clone();
            let event = event.clone();
            let span = tracing::info_span!(
                "event",
                event = kind.name(),
                handler = handler.name(),
                correlation_id = %ctx.correlation_id(),
            );

            tokio::spawn(
                async move {
                    match run_isolated(handler.handle(handler_ctx, event)).await {
                        Ok(Ok(())) => tracing::debug!("Event handled"),
                        Ok(Err(err)) => tracing::warn!(error = %err, "Event handler failed"),
                        Err(panic) => tracing::error!(panic = %panic, "Event handler panicked"),
                    }
                }
                .instrument(span),
            );
        }

        handlers.len()
    }
}

impl<E: Message + Clone> EventPublisher<E> for EventBus<E> {
    fn publish(&self, ctx: &CallContext, event: E) -> usize {
        self.schedule(ctx, event)
    }
}
