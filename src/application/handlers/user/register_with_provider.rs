//! RegisterWithProviderHandler - registration through an external identity
//! provider (Google or Facebook).
//!
//! The provider access token travels with the command as a secret and is
//! never logged.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{AuthProvider, User, UserCommand, UserEvent};
use crate::ports::{CommandHandler, EventPublisher, UserRepository};

use super::{ensure_email_available, unexpected_command};

/// Handler for `register-with-google` and `register-with-facebook`.
pub struct RegisterWithProviderHandler {
    repository: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher<UserEvent>>,
}

impl RegisterWithProviderHandler {
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
impl CommandHandler<UserCommand> for RegisterWithProviderHandler {
    async fn handle(&self, ctx: CallContext, command: UserCommand) -> Result<(), DomainError> {
        let id = UserId::new();
        let (provider, mut user) = match command {
            UserCommand::RegisterWithGoogle(cmd) => {
                ensure_email_available(self.repository.as_ref(), &cmd.email, None).await?;
                (
                    AuthProvider::Google,
                    User::register_with_google(id, cmd.email, cmd.google_id),
                )
            }
            UserCommand::RegisterWithFacebook(cmd) => {
                ensure_email_available(self.repository.as_ref(), &cmd.email, None).await?;
                (
                    AuthProvider::Facebook,
                    User::register_with_facebook(id, cmd.email, cmd.facebook_id),
                )
            }
            other => return Err(unexpected_command(self.name(), &other)),
        };

        let events = self.repository.save(&mut user).await?;
        let scheduled = self.publisher.publish_all(&ctx, events);

        tracing::info!(
            user_id = %user.id(),
            provider = ?provider,
            scheduled,
            "User registered with identity provider"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RegisterWithProviderHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::user::test_support::{RecordingPublisher, StubRepository};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::{EmailAddress, RegisterWithFacebook, RegisterWithGoogle};
    use secrecy::SecretString;

    fn handler(
        repository: Arc<StubRepository>,
        publisher: Arc<RecordingPublisher>,
    ) -> RegisterWithProviderHandler {
        RegisterWithProviderHandler::new(repository, publisher)
    }

    #[tokio::test]
    async fn google_registration_records_provider_id() {
        let repository = Arc::new(StubRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let command = RegisterWithGoogle {
            email: EmailAddress::new("ada@example.com").unwrap(),
            google_id: "g-42".to_string(),
            access_token: SecretString::new("token".to_string()),
        };

        handler(repository.clone(), publisher.clone())
            .handle(CallContext::background(), command.into())
            .await
            .unwrap();

        match publisher.published().as_slice() {
            [UserEvent::WasRegisteredWithGoogle { google_id, .. }] => assert_eq!(google_id, "g-42"),
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[tokio::test]
    async fn facebook_registration_with_taken_email_conflicts() {
        let repository = Arc::new(StubRepository::with_email("ada@example.com"));
        let publisher = Arc::new(RecordingPublisher::default());
        let command = RegisterWithFacebook {
            email: EmailAddress::new("ADA@example.com").unwrap(),
            facebook_id: "f-7".to_string(),
            access_token: SecretString::new("token".to_string()),
        };

        let err = handler(repository, publisher.clone())
            .handle(CallContext::background(), command.into())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(publisher.published().is_empty());
    }
}
