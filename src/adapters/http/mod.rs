//! HTTP adapters - REST API implementations.

pub mod commands;

pub use commands::{command_routes, CommandAppState};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// The full HTTP application: command routes, a liveness probe and request
/// tracing.
pub fn app_router(state: CommandAppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(command_routes(state))
        .layer(TraceLayer::new_for_http())
}
