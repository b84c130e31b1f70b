//! Command gateway server.
//!
//! Loads configuration, installs logging, wires the buses and serves the
//! HTTP adapter until Ctrl-C.

use tracing_subscriber::EnvFilter;

use command_gateway::adapters::http::{app_router, CommandAppState};
use command_gateway::application::bootstrap;
use command_gateway::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let application = bootstrap()?;
    let router = app_router(CommandAppState::new(
        application.gateway,
        config.dispatch.clone(),
    ));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        default_timeout_ms = config.dispatch.default_timeout_ms,
        max_timeout_ms = config.dispatch.max_timeout_ms,
        "Command gateway listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Command gateway stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
