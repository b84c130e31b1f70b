//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, message identity, errors)
//! - `user` - User commands, events and the event-sourced user aggregate

pub mod foundation;
pub mod user;
