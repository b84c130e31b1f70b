//! Caller identity carried alongside a command.
//!
//! The transport boundary is responsible for establishing who the caller
//! is. By the time a command reaches a handler the identity is a plain
//! value with no provider dependencies.

use super::UserId;

/// Identity and claims of the caller that issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The caller's user identifier.
    pub user_id: UserId,

    /// Email claim, when the upstream authenticator provided one.
    pub email: Option<String>,
}

impl Identity {
    /// Creates an identity for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }

    /// Builder: attach an email claim.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns true if this identity acts for the given user.
    pub fn is(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matches_own_user_only() {
        let me = UserId::new();
        let identity = Identity::new(me).with_email("me@example.com");

        assert!(identity.is(&me));
        assert!(!identity.is(&UserId::new()));
        assert_eq!(identity.email.as_deref(), Some("me@example.com"));
    }
}
