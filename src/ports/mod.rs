//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Messaging Ports
//!
//! - `CommandHandler` - The single handler behind a command kind
//! - `EventHandler` - Handler that processes published events
//! - `EventPublisher` - Port for publishing domain events
//!
//! ## Storage Ports
//!
//! - `UserRepository` - Event log for the user aggregate
//! - `UserReadModel` - Query-side user rows

mod command_handler;
mod event_publisher;
mod event_subscriber;
mod user_read_model;
mod user_repository;

pub use command_handler::CommandHandler;
pub use event_publisher::EventPublisher;
pub use event_subscriber::EventHandler;
pub use user_read_model::{UserReadModel, UserView};
pub use user_repository::UserRepository;
