//! HTTP adapter for the command gateway.

mod dto;
mod handlers;
mod routes;

pub use dto::ErrorResponse;
pub use handlers::{
    dispatch_command, CommandAppState, CORRELATION_ID_HEADER, TIMEOUT_HEADER, USER_EMAIL_HEADER,
    USER_ID_HEADER,
};
pub use routes::command_routes;
