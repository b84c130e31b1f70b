//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to the outside world:
//! - `http` - axum transport in front of the dispatch gateway
//! - `memory` - in-memory user storage

pub mod http;
pub mod memory;
