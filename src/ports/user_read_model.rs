//! UserReadModel port - query-side storage maintained by projections.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{AuthProvider, EmailAddress};

/// Denormalized user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: EmailAddress,
    pub provider: AuthProvider,
    /// Number of events folded into this row.
    pub version: u64,
}

/// Storage for user rows. Eventually consistent with the event log.
#[async_trait]
pub trait UserReadModel: Send + Sync {
    /// Insert or replace a row.
    ///
    /// A row older (lower version) than the stored one is ignored, so
    /// projections may deliver out of order.
    async fn upsert(&self, view: UserView) -> Result<(), DomainError>;

    /// Fetch a row by user ID.
    async fn get(&self, id: UserId) -> Result<Option<UserView>, DomainError>;

    /// Fetch a row by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserView>, DomainError>;
}
