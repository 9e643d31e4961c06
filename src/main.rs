//! Tomato Clock - A state-managed HTTP server for a work/break interval clock
//!
//! This is the main entry point for the tomato-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use tomato_clock::{
    config::Config,
    state::AppState,
    api::create_router,
    services::alert_sink_from,
    tasks::{alert_player_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tomato_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tomato-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, sound={}",
          config.host, config.port, config.tick_ms,
          if config.no_sound { "off".to_string() } else { format!("{} {}", config.alert_command, config.alert_sound) });

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.cadence()));

    // Subscribe before spawning so no alert is missed
    let alerts = state.subscribe_alerts();
    let sink = alert_sink_from(config.no_sound, &config.alert_command, &config.alert_sound);
    tokio::spawn(alert_player_task(alerts, sink));

    // Start the tick driver background task
    let driver_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(driver_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /session/increment - Lengthen the session by one minute");
    info!("  POST /session/decrement - Shorten the session by one minute");
    info!("  POST /break/increment   - Lengthen the break by one minute");
    info!("  POST /break/decrement   - Shorten the break by one minute");
    info!("  POST /start-pause       - Start or pause the countdown");
    info!("  POST /reset             - Restore defaults and stop the alert");
    info!("  GET  /status            - Current timer and server status");
    info!("  GET  /events            - Server-sent timer snapshots");
    info!("  GET  /health            - Health check");

    // Event streams never finish on their own, so shutdown does not wait on connections
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
