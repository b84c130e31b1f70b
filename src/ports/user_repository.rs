//! UserRepository port - the append-only event log behind the user aggregate.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{EmailAddress, User, UserEvent};

/// Event-sourced persistence for users.
///
/// Implementations must ensure:
/// - `save` appends the aggregate's pending events atomically
/// - a concurrent writer that appended first causes `Conflict`
/// - an email address maps to at most one user
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load a user by replaying its history. `None` if unknown.
    async fn load(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Append the user's pending events and return them for publication.
    async fn save(&self, user: &mut User) -> Result<Vec<UserEvent>, DomainError>;

    /// Find the user currently holding an email address.
    async fn find_id_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, DomainError>;
}
