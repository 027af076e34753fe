//! Study Timer - a study-session stopwatch backed by a study-tracking service
//!
//! This is the main entry point for the study-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use study_timer::{
    api::create_router,
    config::Config,
    services::BackendClient,
    state::{AppState, SystemClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, backend={}",
          config.host, config.port, config.backend_url);

    let backend = BackendClient::new(config.backend_url.clone(), config.backend_cookie.clone());
    let state = Arc::new(AppState::new(backend, Arc::new(SystemClock)));

    // Populate the topic selection; the page still works without it
    if let Err(e) = state.load_topics().await {
        warn!("Could not load topics from backend: {}", e);
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer           - Timer display and controls");
    info!("  GET  /timer/display   - Display updates (server-sent events)");
    info!("  POST /timer/start     - Start the timer");
    info!("  POST /timer/pause     - Pause or resume the timer");
    info!("  POST /timer/stop      - Stop the timer and record the session");
    info!("  PUT  /timer/form      - Set topic and description");
    info!("  GET  /topics          - Load topics");
    info!("  GET  /sessions/recent - Recent study sessions");
    info!("  GET  /health          - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
