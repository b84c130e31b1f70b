//! Domain events raised by the user aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Message, MessageKind, Timestamp, UserId};

use super::EmailAddress;

/// Routing tag for [`UserEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WasRegisteredWithEmail,
    WasRegisteredWithGoogle,
    WasRegisteredWithFacebook,
    EmailAddressWasChanged,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 4] = [
        EventKind::WasRegisteredWithEmail,
        EventKind::WasRegisteredWithGoogle,
        EventKind::WasRegisteredWithFacebook,
        EventKind::EmailAddressWasChanged,
    ];
}

impl MessageKind for EventKind {
    fn name(&self) -> &'static str {
        match self {
            EventKind::WasRegisteredWithEmail => "user-was-registered-with-email",
            EventKind::WasRegisteredWithGoogle => "user-was-registered-with-google",
            EventKind::WasRegisteredWithFacebook => "user-was-registered-with-facebook",
            EventKind::EmailAddressWasChanged => "email-address-was-changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain events for the user aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    /// User registered with an email address.
    WasRegisteredWithEmail {
        user_id: UserId,
        email: EmailAddress,
        occurred_at: Timestamp,
    },

    /// User registered through Google sign-in.
    WasRegisteredWithGoogle {
        user_id: UserId,
        email: EmailAddress,
        google_id: String,
        occurred_at: Timestamp,
    },

    /// User registered through Facebook sign-in.
    WasRegisteredWithFacebook {
        user_id: UserId,
        email: EmailAddress,
        facebook_id: String,
        occurred_at: Timestamp,
    },

    /// User's email address changed.
    EmailAddressWasChanged {
        user_id: UserId,
        email: EmailAddress,
        occurred_at: Timestamp,
    },
}

impl UserEvent {
    /// The user this event belongs to.
    pub fn user_id(&self) -> UserId {
        match self {
            UserEvent::WasRegisteredWithEmail { user_id, .. }
            | UserEvent::WasRegisteredWithGoogle { user_id, .. }
            | UserEvent::WasRegisteredWithFacebook { user_id, .. }
            | UserEvent::EmailAddressWasChanged { user_id, .. } => *user_id,
        }
    }

    /// The email address carried by this event.
    pub fn email(&self) -> &EmailAddress {
        match self {
            UserEvent::WasRegisteredWithEmail { email, .. }
            | UserEvent::WasRegisteredWithGoogle { email, .. }
            | UserEvent::WasRegisteredWithFacebook { email, .. }
            | UserEvent::EmailAddressWasChanged { email, .. } => email,
        }
    }
}

impl Message for UserEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            UserEvent::WasRegisteredWithEmail { .. } => EventKind::WasRegisteredWithEmail,
            UserEvent::WasRegisteredWithGoogle { .. } => EventKind::WasRegisteredWithGoogle,
            UserEvent::WasRegisteredWithFacebook { .. } => EventKind::WasRegisteredWithFacebook,
            UserEvent::EmailAddressWasChanged { .. } => EventKind::EmailAddressWasChanged,
        }
    }
}
