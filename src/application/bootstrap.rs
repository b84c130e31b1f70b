//! Start-up wiring.
//!
//! Builds the event bus first (command handlers publish on it), then the
//! command bus, and freezes both. Nothing can subscribe afterwards.

use std::sync::Arc;

use crate::adapters::memory::{InMemoryUserReadModel, InMemoryUserRepository};
use crate::bus::{CommandBusBuilder, EventBus, EventBusBuilder, RegistrationError};
use crate::domain::foundation::MessageKind;
use crate::domain::user::{EventKind, UserCommand, UserEvent};
use crate::ports::{UserReadModel, UserRepository};

use super::gateway::DispatchGateway;
use super::handlers::user::{register_command_handlers, register_event_handlers};

/// Everything a transport needs to serve user commands.
#[derive(Clone)]
pub struct Application {
    pub gateway: DispatchGateway<UserCommand>,
    pub events: EventBus<UserEvent>,
    pub repository: Arc<dyn UserRepository>,
    pub read_model: Arc<dyn UserReadModel>,
}

/// Wires the user module against in-memory storage.
pub fn bootstrap() -> Result<Application, RegistrationError> {
    bootstrap_with(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryUserReadModel::new()),
    )
}

/// Wires the user module against the given storage.
pub fn bootstrap_with(
    repository: Arc<dyn UserRepository>,
    read_model: Arc<dyn UserReadModel>,
) -> Result<Application, RegistrationError> {
    let events =
        register_event_handlers(EventBusBuilder::new(), repository.clone(), read_model.clone())
            .build();

    let commands = register_command_handlers(
        CommandBusBuilder::new(),
        repository.clone(),
        Arc::new(events.clone()),
    )?
    .build();

    for kind in EventKind::ALL {
        tracing::info!(
            event = kind.name(),
            subscribers = events.subscriber_count(kind),
            "Event route"
        );
    }

    for kind in commands.kinds() {
        tracing::info!(
            command = kind.name(),
            handler = commands.handler_name(kind).unwrap_or("-"),
            "Command route"
        );
    }

    Ok(Application {
        gateway: DispatchGateway::new(commands),
        events,
        repository,
        read_model,
    })
}
