//! User module - registration and email management.
//!
//! # Domain Invariants
//!
//! 1. A user's history always starts with exactly one registration event
//! 2. Email addresses are stored normalized (trimmed, lower-cased)
//! 3. Changing to the current email address is rejected

pub mod aggregate;
pub mod commands;
pub mod email;
pub mod events;

pub use aggregate::{AuthProvider, User};
pub use commands::{
    ChangeEmailAddress, CommandKind, RegisterWithEmail, RegisterWithFacebook, RegisterWithGoogle,
    UserCommand,
};
pub use email::EmailAddress;
pub use events::{EventKind, UserEvent};
