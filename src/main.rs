//! Kho Clock - Live match timer for tournament viewers
//!
//! This is the main entry point for the kho-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use kho_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    store::InMemoryStore,
    timer::SystemClock,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("kho_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting kho-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let store = match &config.seed {
        Some(path) => InMemoryStore::load_seed(path)?,
        None => InMemoryStore::new(),
    };

    // Create application state
    let state = Arc::new(AppState::new(
        Arc::new(store),
        Arc::new(SystemClock),
        config.port,
        config.host.clone(),
        config.tick_interval(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /matches/:id/viewer - Mount a live viewer for a match");
    info!("  DELETE /matches/:id/viewer - Tear down a viewer");
    info!("  GET    /matches/:id/timer  - Current projected clock");
    info!("  POST   /changes            - Backend change notifications");
    info!("  GET    /status             - Server status and mounted viewers");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
