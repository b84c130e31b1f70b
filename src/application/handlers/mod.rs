//! Application handlers.
//!
//! Command handlers and projections that orchestrate domain operations.

pub mod user;
