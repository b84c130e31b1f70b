//! HTTP routes for command dispatch.

use axum::{routing::post, Router};

use super::handlers::{dispatch_command, CommandAppState};

/// Creates the command router.
pub fn command_routes(state: CommandAppState) -> Router {
    Router::new()
        .route("/commands/:name", post(dispatch_command))
        .with_state(state)
}
