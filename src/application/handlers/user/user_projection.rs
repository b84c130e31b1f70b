//! UserProjection - keeps the user read model in step with the event log.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::user::UserEvent;
use crate::ports::{EventHandler, UserReadModel, UserRepository, UserView};

/// Rebuilds a user's row from its event log whenever one of its events is
/// published.
///
/// Reading the aggregate back instead of patching the row from the event
/// makes the projection indifferent to delivery order: the read model keeps
/// whichever row carries the highest version.
pub struct UserProjection {
    repository: Arc<dyn UserRepository>,
    read_model: Arc<dyn UserReadModel>,
}

impl UserProjection {
    pub fn new(repository: Arc<dyn UserRepository>, read_model: Arc<dyn UserReadModel>) -> Self {
        Self {
            repository,
            read_model,
        }
    }
}

#[async_trait]
impl EventHandler<UserEvent> for UserProjection {
    async fn handle(&self, _ctx: CallContext, event: UserEvent) -> Result<(), DomainError> {
        let user_id = event.user_id();
        let user = self.repository.load(user_id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, "Projected user has no history")
                .with_detail("user_id", user_id.to_string())
        })?;

        let view = UserView {
            id: user.id(),
            email: user.email().clone(),
            provider: user.provider(),
            version: user.version(),
        };
        tracing::debug!(user_id = %view.id, version = view.version, "Projecting user");

        self.read_model.upsert(view).await
    }

    fn name(&self) -> &'static str {
        "UserProjection"
    }
}
