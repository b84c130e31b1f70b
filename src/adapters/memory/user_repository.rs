//! In-memory event log for users.
//!
//! Keeps one append-only history per user and an email index, both behind
//! a single lock so that version checks and email claims are atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{EmailAddress, User, UserEvent};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
struct EventLog {
    histories: HashMap<UserId, Vec<UserEvent>>,
    emails: HashMap<EmailAddress, UserId>,
}

/// In-memory [`UserRepository`] with optimistic concurrency.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    log: Arc<RwLock<EventLog>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn load(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let log = self.log.read().await;
        match log.histories.get(&id) {
            Some(history) => User::from_history(history).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &mut User) -> Result<Vec<UserEvent>, DomainError> {
        let pending = user.pending_changes().len() as u64;
        if pending == 0 {
            return Ok(Vec::new());
        }
        let expected = user.version() - pending;

        let mut log = self.log.write().await;

        let committed = log.histories.get(&user.id()).map_or(0, |h| h.len() as u64);
        if committed != expected {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "User was modified concurrently",
            )
            .with_detail("expected_version", expected.to_string())
            .with_detail("actual_version", committed.to_string()));
        }

        if let Some(holder) = log.emails.get(user.email()) {
            if *holder != user.id() {
                return Err(DomainError::new(
                    ErrorCode::Conflict,
                    "Email address is already in use",
                )
                .with_detail("email", user.email().as_str()));
            }
        }

        let events = user.take_changes();
        log.emails.retain(|_, holder| *holder != user.id());
        log.emails.insert(user.email().clone(), user.id());
        log.histories
            .entry(user.id())
            .or_default()
            .extend(events.iter().cloned());

        tracing::debug!(user_id = %user.id(), version = user.version(), "User events appended");
        Ok(events)
    }

    async fn find_id_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, DomainError> {
        Ok(self.log.read().await.emails.get(email).copied())
    }
}
