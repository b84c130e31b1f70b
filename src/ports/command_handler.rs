//! CommandHandler port - the single handler behind a command kind.

use async_trait::async_trait;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, Message};

/// Handler for one command kind.
///
/// The command bus runs `handle` on its own task. A returned
/// `DomainError` is delivered to the dispatching caller; a panic is caught
/// at the task boundary and delivered as an internal error.
///
/// The context is a read-only copy of the caller's. Handlers may inspect
/// `ctx.is_done()` between steps but are never forcibly stopped.
#[async_trait]
pub trait CommandHandler<C: Message>: Send + Sync {
    /// Execute the command.
    async fn handle(&self, ctx: CallContext, command: C) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
