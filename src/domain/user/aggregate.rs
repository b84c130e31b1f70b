//! User aggregate, rebuilt from and persisted as its event history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};

use super::{EmailAddress, UserEvent};

/// How a user originally signed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    Facebook,
}

/// Event-sourced user aggregate.
///
/// State changes are recorded as pending [`UserEvent`]s; the repository
/// appends them to the log and hands them back for publication.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    provider: AuthProvider,
    version: u64,
    changes: Vec<UserEvent>,
}

impl User {
    /// Registers a new user with an email address.
    pub fn register_with_email(id: UserId, email: EmailAddress) -> Self {
        Self::record_registration(AuthProvider::Email, UserEvent::WasRegisteredWithEmail {
            user_id: id,
            email,
            occurred_at: Timestamp::now(),
        })
    }

    /// Registers a new user through Google sign-in.
    pub fn register_with_google(id: UserId, email: EmailAddress, google_id: String) -> Self {
        Self::record_registration(AuthProvider::Google, UserEvent::WasRegisteredWithGoogle {
            user_id: id,
            email,
            google_id,
            occurred_at: Timestamp::now(),
        })
    }

    /// Registers a new user through Facebook sign-in.
    pub fn register_with_facebook(id: UserId, email: EmailAddress, facebook_id: String) -> Self {
        Self::record_registration(AuthProvider::Facebook, UserEvent::WasRegisteredWithFacebook {
            user_id: id,
            email,
            facebook_id,
            occurred_at: Timestamp::now(),
        })
    }

    /// Rebuilds a user from its committed history.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the history is empty
    /// - `InternalError` if the history does not start with a registration
    pub fn from_history(events: &[UserEvent]) -> Result<Self, DomainError> {
        let (first, rest) = events
            .split_first()
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User has no history"))?;

        let mut user = Self::initial_state(first).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                "User history does not start with a registration",
            )
            .with_detail("user_id", first.user_id().to_string())
        })?;

        for event in rest {
            user.apply(event);
        }
        Ok(user)
    }

    /// Changes the user's email address.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the address is the current one.
    pub fn change_email_address(&mut self, email: EmailAddress) -> Result<(), DomainError> {
        if email == self.email {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "New email address matches the current one",
            ));
        }

        self.record(UserEvent::EmailAddressWasChanged {
            user_id: self.id,
            email,
            occurred_at: Timestamp::now(),
        });
        Ok(())
    }

    /// Drains the events recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<UserEvent> {
        std::mem::take(&mut self.changes)
    }

    /// Events recorded but not yet taken.
    pub fn pending_changes(&self) -> &[UserEvent] {
        &self.changes
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn provider(&self) -> AuthProvider {
        self.provider
    }

    /// Number of events applied, committed or pending.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn record_registration(provider: AuthProvider, event: UserEvent) -> Self {
        let mut user = Self::registered(provider, &event);
        user.changes.push(event);
        user
    }

    fn initial_state(event: &UserEvent) -> Option<Self> {
        let provider = match event {
            UserEvent::WasRegisteredWithEmail { .. } => AuthProvider::Email,
            UserEvent::WasRegisteredWithGoogle { .. } => AuthProvider::Google,
            UserEvent::WasRegisteredWithFacebook { .. } => AuthProvider::Facebook,
            UserEvent::EmailAddressWasChanged { .. } => return None,
        };
        Some(Self::registered(provider, event))
    }

    fn registered(provider: AuthProvider, event: &UserEvent) -> Self {
        Self {
            id: event.user_id(),
            email: event.email().clone(),
            provider,
            version: 1,
            changes: Vec::new(),
        }
    }

    fn record(&mut self, event: UserEvent) {
        self.apply(&event);
        self.changes.push(event);
    }

    fn apply(&mut self, event: &UserEvent) {
        if let UserEvent::EmailAddressWasChanged { email, .. } = event {
            self.email = email.clone();
        }
        self.version += 1;
    }
}
