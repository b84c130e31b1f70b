//! Test doubles shared by the user handler tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::bus::CallContext;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{EmailAddress, User, UserEvent};
use crate::ports::{EventPublisher, UserRepository};

#[derive(Default)]
struct StubState {
    logs: HashMap<UserId, Vec<UserEvent>>,
    emails: HashMap<EmailAddress, UserId>,
    saved: Vec<UserEvent>,
}

/// Repository keeping histories in a map, with no concurrency checks.
#[derive(Default)]
pub struct StubRepository {
    state: Mutex<StubState>,
    fail_save: bool,
}

impl StubRepository {
    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    /// A repository where some other user already holds `email`.
    pub fn with_email(email: &str) -> Self {
        let repository = Self::default();
        repository.claim_email(email, UserId::new());
        repository
    }

    /// A repository already holding `user`'s history.
    pub fn with_user(mut user: User) -> Self {
        let repository = Self::default();
        {
            let mut state = repository.state.lock().unwrap();
            state.emails.insert(user.email().clone(), user.id());
            state.logs.insert(user.id(), user.take_changes());
        }
        repository
    }

    pub fn claim_email(&self, email: &str, id: UserId) {
        self.state
            .lock()
            .unwrap()
            .emails
            .insert(EmailAddress::new(email).unwrap(), id);
    }

    /// Events appended through `save`, in order.
    pub fn saved_events(&self) -> Vec<UserEvent> {
        self.state.lock().unwrap().saved.clone()
    }
}

#[async_trait]
impl UserRepository for StubRepository {
    async fn load(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let state = self.state.lock().unwrap();
        state
            .logs
            .get(&id)
            .map(Vec::as_slice)
            .map(User::from_history)
            .transpose()
    }

    async fn save(&self, user: &mut User) -> Result<Vec<UserEvent>, DomainError> {
        if self.fail_save {
            return Err(DomainError::new(ErrorCode::StorageError, "Simulated save failure"));
        }

        let events = user.take_changes();
        let mut state = self.state.lock().unwrap();
        state.emails.retain(|_, holder| *holder != user.id());
        state.emails.insert(user.email().clone(), user.id());
        state
            .logs
            .entry(user.id())
            .or_default()
            .extend(events.iter().cloned());
        state.saved.extend(events.iter().cloned());
        Ok(events)
    }

    async fn find_id_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, DomainError> {
        Ok(self.state.lock().unwrap().emails.get(email).copied())
    }
}

/// Publisher that records events instead of delivering them.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<UserEvent>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<UserEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher<UserEvent> for RecordingPublisher {
    fn publish(&self, _ctx: &CallContext, event: UserEvent) -> usize {
        self.events.lock().unwrap().push(event);
        1
    }
}
