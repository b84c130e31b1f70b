//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, message identity and error types
//! that form the vocabulary of the gateway's domain.

mod auth;
mod errors;
mod ids;
mod message;
mod timestamp;

pub use auth::Identity;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use message::{Message, MessageKind};
pub use timestamp::Timestamp;
