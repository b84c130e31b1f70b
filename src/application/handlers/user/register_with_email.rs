//! RegisterWithEmailHandler - registers a user identified by email alone.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{User, UserCommand, UserEvent};
use crate::ports::{CommandHandler, EventPublisher, UserRepository};

use super::{ensure_email_available, unexpected_command};

/// Handler for `register-with-email`.
pub struct RegisterWithEmailHandler {
    repository: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher<UserEvent>>,
}

impl RegisterWithEmailHandler {
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
impl CommandHandler<UserCommand> for RegisterWithEmailHandler {
    async fn handle(&self, ctx: CallContext, command: UserCommand) -> Result<(), DomainError> {
        let cmd = match command {
            UserCommand::RegisterWithEmail(cmd) => cmd,
            other => return Err(unexpected_command(self.name(), &other)),
        };

        // 1. Email must be free
        ensure_email_available(self.repository.as_ref(), &cmd.email, None).await?;

        // 2. Create aggregate
        let mut user = User::register_with_email(UserId::new(), cmd.email);

        // 3. Persist, then publish what was committed
        let events = self.repository.save(&mut user).await?;
        let scheduled = self.publisher.publish_all(&ctx, events);

        tracing::info!(
            user_id = %user.id(),
            scheduled,
            "User registered with email"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RegisterWithEmailHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::user::test_support::{RecordingPublisher, StubRepository};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::{ChangeEmailAddress, EmailAddress, RegisterWithEmail};

    fn command(email: &str) -> UserCommand {
        RegisterWithEmail {
            email: EmailAddress::new(email).unwrap(),
        }
        .into()
    }

    #[tokio::test]
    async fn registers_and_publishes_committed_event() {
        let repository = Arc::new(StubRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = RegisterWithEmailHandler::new(repository.clone(), publisher.clone());

        handler
            .handle(CallContext::background(), command("ada@example.com"))
            .await
            .unwrap();

        let saved = repository.saved_events();
        assert_eq!(saved.len(), 1);
        assert!(matches!(saved[0], UserEvent::WasRegisteredWithEmail { .. }));
        assert_eq!(publisher.published(), saved);
    }

    #[tokio::test]
    async fn taken_email_is_a_conflict() {
        let repository = Arc::new(StubRepository::with_email("ada@example.com"));
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = RegisterWithEmailHandler::new(repository.clone(), publisher.clone());

        let err = handler
            .handle(CallContext::background(), command("ada@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(repository.saved_events().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_publishes_nothing() {
        let repository = Arc::new(StubRepository::failing());
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = RegisterWithEmailHandler::new(repository, publisher.clone());

        let err = handler
            .handle(CallContext::background(), command("ada@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn foreign_command_is_an_internal_error() {
        let handler = RegisterWithEmailHandler::new(
            Arc::new(StubRepository::default()),
            Arc::new(RecordingPublisher::default()),
        );
        let foreign = ChangeEmailAddress {
            id: UserId::new(),
            email: EmailAddress::new("ada@example.com").unwrap(),
        };

        let err = handler
            .handle(CallContext::background(), foreign.into())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
