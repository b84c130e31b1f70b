//! Command bus: one handler per command kind, one outcome per dispatch.
//!
//! Handlers are registered on a [`CommandBusBuilder`] during start-up. The
//! built [`CommandBus`] is immutable and can be shared freely across tasks.
//!
//! Each dispatch runs its handler on a separate tokio task. The caller waits
//! for whichever comes first: the handler's outcome or the end of its
//! [`CallContext`]. A handler that outlives its caller keeps running to
//! completion and its outcome is discarded.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::Instrument;

use crate::domain::foundation::{Message, MessageKind};
use crate::ports::CommandHandler;

use super::isolation::run_isolated;
use super::{CallContext, DispatchError, Registry, RegistrationError};

type SharedHandler<C> = Arc<dyn CommandHandler<C>>;

/// Collects command handlers before the bus is built.
pub struct CommandBusBuilder<C: Message> {
    registry: Registry<C::Kind, SharedHandler<C>>,
}

impl<C: Message> CommandBusBuilder<C> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registers the handler for a command kind.
    ///
    /// Fails if the kind already has a handler; the registry is unchanged.
    pub fn subscribe(
        mut self,
        kind: C::Kind,
        handler: SharedHandler<C>,
    ) -> Result<Self, RegistrationError> {
        if let Some(existing) = self.registry.resolve(&kind).first() {
            return Err(RegistrationError::DuplicateHandler {
                kind: kind.name().to_string(),
                existing: existing.name(),
            });
        }

        tracing::debug!(command = kind.name(), handler = handler.name(), "Command handler registered");
        self.registry.subscribe(kind, handler);
        Ok(self)
    }

    /// Freezes the registrations into a bus.
    pub fn build(self) -> CommandBus<C> {
        tracing::info!(
            commands = self.registry.handler_count(),
            "Command bus ready"
        );
        CommandBus {
            registry: Arc::new(self.registry),
        }
    }
}

impl<C: Message> Default for CommandBusBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes each command to its single handler.
pub struct CommandBus<C: Message> {
    registry: Arc<Registry<C::Kind, SharedHandler<C>>>,
}

impl<C: Message> Clone for CommandBus<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<C: Message> CommandBus<C> {
    /// Dispatches a command and waits for its outcome or the end of `ctx`.
    ///
    /// Returns:
    /// - `Ok(())` when the handler succeeded
    /// - `Unhandled` when no handler is registered (nothing is spawned)
    /// - `Domain` / `Internal` for a handler error, `Internal` for a panic
    /// - `Cancelled` when the context finished first
    pub async fn publish(&self, ctx: &CallContext, command: C) -> Result<(), DispatchError> {
        let kind = command.kind();

        let handler = match self.registry.resolve(&kind).first() {
            Some(handler) => Arc::clone(handler),
            None => {
                tracing::warn!(command = kind.name(), "No handler registered for command");
                return Err(DispatchError::Unhandled(kind.name().to_string()));
            }
        };

        if let Some(reason) = ctx.err() {
            tracing::debug!(command = kind.name(), %reason, "Context already done, not dispatching");
            return Err(reason.into());
        }

        let span = tracing::info_span!(
            "command",
            command = kind.name(),
            handler = handler.name(),
            correlation_id = %ctx.correlation_id(),
            remaining = ?ctx.remaining(),
        );

        let (tx, rx) = oneshot::channel();
        let handler_ctx = ctx.clone();

        tokio::spawn(
            async move {
                let outcome = match run_isolated(handler.handle(handler_ctx, command)).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) => Err(DispatchError::from(err)),
                    Err(panic) => {
                        tracing::error!(panic = %panic, "Command handler panicked");
                        Err(DispatchError::Internal(format!(
                            "handler {} panicked: {}",
                            handler.name(),
                            panic
                        )))
                    }
                };

                if let Err(late) = tx.send(outcome) {
                    tracing::debug!(
                        outcome = ?late.err().map(|e| e.category()),
                        "Caller gone, discarding command outcome"
                    );
                }
            }
            .instrument(span.clone()),
        );

        let result = tokio::select! {
            received = rx => match received {
                Ok(outcome) => outcome,
                Err(_) => Err(DispatchError::Internal(
                    "command handler task ended without an outcome".to_string(),
                )),
            },
            reason = ctx.done() => Err(reason.into()),
        };

        span.in_scope(|| match &result {
            Ok(()) => tracing::debug!("Command handled"),
            Err(err) => tracing::debug!(error = %err, category = err.category(), "Command failed"),
        });

        result
    }

    /// Command kinds with a registered handler.
    pub fn kinds(&self) -> Vec<C::Kind> {
        self.registry.kinds()
    }

    /// Name of the handler registered for a kind.
    pub fn handler_name(&self, kind: C::Kind) -> Option<&'static str> {
        self.registry.resolve(&kind).first().map(|h| h.name())
    }
}
