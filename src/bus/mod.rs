//! In-process message buses.
//!
//! - [`CommandBus`] routes a command to exactly one handler and returns its
//!   outcome, racing the caller's [`CallContext`]
//! - [`EventBus`] fans an event out to every subscriber without waiting
//!
//! Both are assembled through builders at start-up and are read-only
//! afterwards.

mod command_bus;
mod context;
mod error;
mod event_bus;
mod isolation;
mod registry;

pub use command_bus::{CommandBus, CommandBusBuilder};
pub use context::{CallContext, CancelHandle, CancellationError};
pub use error::{DispatchError, RegistrationError};
pub use event_bus::{EventBus, EventBusBuilder};
pub use registry::Registry;
