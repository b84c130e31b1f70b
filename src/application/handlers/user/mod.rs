//! User application handlers.
//!
//! One command handler per user command kind, plus the projection that
//! maintains the user read model. Wiring happens once, at start-up, through
//! [`register_command_handlers`] and [`register_event_handlers`].

mod build;
mod change_email_address;
mod register_with_email;
mod register_with_provider;
mod user_projection;

#[cfg(test)]
pub(crate) mod test_support;

pub use change_email_address::ChangeEmailAddressHandler;
pub use register_with_email::RegisterWithEmailHandler;
pub use register_with_provider::RegisterWithProviderHandler;
pub use user_projection::UserProjection;

use std::sync::Arc;

use crate::bus::{CommandBusBuilder, EventBusBuilder, RegistrationError};
use crate::domain::foundation::{DomainError, ErrorCode, Message, MessageKind, UserId};
use crate::domain::user::{CommandKind, EmailAddress, EventKind, UserCommand, UserEvent};
use crate::ports::{EventPublisher, UserReadModel, UserRepository};

/// Registers the handler for every user command kind.
pub fn register_command_handlers(
    builder: CommandBusBuilder<UserCommand>,
    repository: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher<UserEvent>>,
) -> Result<CommandBusBuilder<UserCommand>, RegistrationError> {
    let provider = Arc::new(RegisterWithProviderHandler::new(
        repository.clone(),
        publisher.clone(),
    ));

    builder
        .subscribe(
            CommandKind::RegisterWithEmail,
            Arc::new(RegisterWithEmailHandler::new(
                repository.clone(),
                publisher.clone(),
            )),
        )?
        .subscribe(CommandKind::RegisterWithGoogle, provider.clone())?
        .subscribe(CommandKind::RegisterWithFacebook, provider)?
        .subscribe(
            CommandKind::ChangeEmailAddress,
            Arc::new(ChangeEmailAddressHandler::new(repository, publisher)),
        )
}

/// Subscribes the user projection to every user event kind.
pub fn register_event_handlers(
    builder: EventBusBuilder<UserEvent>,
    repository: Arc<dyn UserRepository>,
    read_model: Arc<dyn UserReadModel>,
) -> EventBusBuilder<UserEvent> {
    builder.subscribe_all(
        EventKind::ALL,
        Arc::new(UserProjection::new(repository, read_model)),
    )
}

/// Fails with `Conflict` if `email` belongs to a user other than `owner`.
async fn ensure_email_available(
    repository: &dyn UserRepository,
    email: &EmailAddress,
    owner: Option<UserId>,
) -> Result<(), DomainError> {
    match repository.find_id_by_email(email).await? {
        Some(holder) if Some(holder) != owner => Err(DomainError::new(
            ErrorCode::Conflict,
            "Email address is already in use",
        )
        .with_detail("email", email.as_str())),
        _ => Ok(()),
    }
}

/// A handler was given a command kind it is not registered for.
fn unexpected_command(handler: &str, command: &UserCommand) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("{} cannot handle {}", handler, command.kind().name()),
    )
}
