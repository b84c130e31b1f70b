//! Application layer - gateway, handlers and start-up wiring.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Transports only ever talk to the [`DispatchGateway`].

pub mod bootstrap;
pub mod gateway;
pub mod handlers;

pub use bootstrap::{bootstrap, bootstrap_with, Application};
pub use gateway::{BuildCommand, DispatchGateway, DispatchRequest, DispatchState};
