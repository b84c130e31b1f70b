//! ChangeEmailAddressHandler - moves a user to a new email address.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::user::{UserCommand, UserEvent};
use crate::ports::{CommandHandler, EventPublisher, UserRepository};

use super::{ensure_email_available, unexpected_command};

/// Handler for `change-email-address`.
///
/// Only the user themself may change their address.
pub struct ChangeEmailAddressHandler {
    repository: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher<UserEvent>>,
}

impl ChangeEmailAddressHandler {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        publisher: Arc<dyn EventPublisher<UserEvent>>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl CommandHandler<UserCommand> for ChangeEmailAddressHandler {
    async fn handle(&self, ctx: CallContext, command: UserCommand) -> Result<(), DomainError> {
        let cmd = match command {
            UserCommand::ChangeEmailAddress(cmd) => cmd,
            other => return Err(unexpected_command(self.name(), &other)),
        };

        // 1. Authorize
        let identity = ctx.identity().ok_or_else(|| {
            DomainError::new(ErrorCode::Unauthorized, "Authentication required")
        })?;
        if !identity.is(&cmd.id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Cannot change another user's email address",
            ));
        }

        // 2. Load aggregate
        let mut user = self.repository.load(cmd.id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, "User not found")
                .with_detail("user_id", cmd.id.to_string())
        })?;

        // 3. Email must not belong to someone else
        ensure_email_available(self.repository.as_ref(), &cmd.email, Some(cmd.id)).await?;

        // 4. Apply, persist, publish
        user.change_email_address(cmd.email)?;
        let events = self.repository.save(&mut user).await?;
        let scheduled = self.publisher.publish_all(&ctx, events);

        tracing::info!(user_id = %cmd.id, scheduled, "Email address changed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ChangeEmailAddressHandler"
    }
}
