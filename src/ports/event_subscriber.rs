//! EventHandler port - Interface for reacting to domain events.

use async_trait::async_trait;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, Message};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - Safe to call multiple times with same event
/// - **Isolated** - Errors don't affect other handlers
///
/// A returned error is logged by the event bus on the handler's behalf.
/// It is never delivered to the publisher.
///
/// # Example
///
/// ```ignore
/// struct UserProjection { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler<UserEvent> for UserProjection {
///     async fn handle(&self, ctx: CallContext, event: UserEvent) -> Result<(), DomainError> {
///         // Update read model...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "UserProjection"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler<E: Message>: Send + Sync {
    /// Process an event.
    async fn handle(&self, ctx: CallContext, event: E) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
