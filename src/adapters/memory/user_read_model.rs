//! In-memory user read model.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::EmailAddress;
use crate::ports::{UserReadModel, UserView};

/// Rows keyed by user ID.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserReadModel {
    rows: Arc<RwLock<HashMap<UserId, UserView>>>,
}

impl InMemoryUserReadModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UserReadModel for InMemoryUserReadModel {
    async fn upsert(&self, view: UserView) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        match rows.get(&view.id) {
            Some(existing) if existing.version > view.version => {
                tracing::debug!(
                    user_id = %view.id,
                    stored = existing.version,
                    incoming = view.version,
                    "Ignoring stale user row"
                );
            }
            _ => {
                rows.insert(view.id, view);
            }
        }
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<UserView>, DomainError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserView>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|row| &row.email == email)
            .cloned())
    }
}
