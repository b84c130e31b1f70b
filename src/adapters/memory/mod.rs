//! In-memory storage adapters.
//!
//! Back the user ports for development, tests and single-process
//! deployments. State is lost on restart.

mod user_read_model;
mod user_repository;

pub use user_read_model::InMemoryUserReadModel;
pub use user_repository::InMemoryUserRepository;
