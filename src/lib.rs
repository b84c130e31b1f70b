//! Command Gateway - typed command dispatch over in-process buses
//!
//! Transports hand raw requests to the [`application::DispatchGateway`],
//! which builds a typed command and routes it through the
//! [`bus::CommandBus`] to exactly one handler. Handlers publish the events
//! they commit on the [`bus::EventBus`], which fans them out to projections.

pub mod adapters;
pub mod application;
pub mod bus;
pub mod config;
pub mod domain;
pub mod ports;
