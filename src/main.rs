//! Take Five - A state-managed HTTP server for a pomodoro focus timer
//!
//! This is the main entry point for the take-five application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use take_five::{
    api::create_router,
    config::Config,
    services::Notifier,
    state::AppState,
    tasks::session_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "take_five={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting take-five server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}min",
        config.host, config.port, config.work
    );

    // Notification permission is probed once here and never re-queried.
    let notifier = Notifier::request_permission(config.no_notify);
    info!("Notification permission: {}", notifier.permission().as_str());

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.work));

    // Start the session ticker background task
    let ticker_state = Arc::clone(&state);
    let ticker_notifier = notifier.clone();
    let mute = config.mute;
    tokio::spawn(async move {
        session_ticker_task(ticker_state, ticker_notifier, mute).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start the countdown (enters focus mode)");
    info!("  POST /pause    - Pause the countdown");
    info!("  POST /reset    - Reset to an idle work interval");
    info!("  POST /tap      - Tap the timer face (pauses in focus mode)");
    info!("  POST /duration - Set the work interval length");
    info!("  GET  /face     - Current timer face render model");
    info!("  GET  /status   - Session status and server info");
    info!("  GET  /health   - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
