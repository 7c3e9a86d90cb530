//! Ingredient Expiry Prediction Server
//!
//! Loads a trained expiry model once at startup and serves `/predict`,
//! `/health` and `/` over HTTP. A missing or broken model artifact does not
//! stop the server: it runs degraded and reports `model_loaded: false`.

use shelflife_server::config::resolve_config;
use shelflife_server::logging::init_tracing;
use shelflife_server::{build_app_state, build_router, shutdown_signal, ShutdownCoordinator};
use std::future::IntoFuture;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: from CLI arg, env var, or default
    let (config, source) = resolve_config(std::env::args().nth(1), |key| std::env::var(key).ok())?;

    init_tracing(&config.logging)?;

    info!(
        config_source = %source,
        listen_addr = %config.listen_addr,
        model_path = %config.model_path,
        "Starting expiry prediction server"
    );

    let listen_addr = config.listen_addr.clone();
    let coordinator = ShutdownCoordinator::new(config.shutdown.timeout_seconds);

    // Build shared application state (loads the model exactly once)
    let state = build_app_state(config);
    if !state.model_loaded() {
        warn!("Serving without a model; /predict will answer \"Model not loaded\"");
    }

    let app = build_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "Prediction server listening");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(coordinator.clone()))
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = coordinator.drain_deadline() => {
            warn!("Shutdown timeout elapsed with requests still in flight; exiting");
        }
    }

    info!("Server stopped");
    Ok(())
}
