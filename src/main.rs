//! Pomodoro Timer - A focus/break interval timer
//!
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_timer::{
    api::create_router,
    config::Config,
    engine::{CommandRouter, TimerEngine},
    services::{CommandPresenter, LogPresenter},
    state::AppState,
    tasks::presenter_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, notifier={:?}",
          config.host, config.port, config.notify_command);

    // One engine per process, reachable by notification actions through the router
    let engine = TimerEngine::new();
    let router = CommandRouter::global();
    router.register(&engine);

    let snapshots = engine.subscribe();
    match config.notify_command.clone() {
        Some(program) => {
            let presenter = CommandPresenter::new(program);
            info!("Posting notifications via {}", presenter.program());
            tokio::spawn(presenter_task(snapshots, presenter));
        }
        None => {
            tokio::spawn(presenter_task(snapshots, LogPresenter));
        }
    }

    if config.autostart {
        engine.start_focus_session();
    }

    let state = Arc::new(AppState::new(
        Arc::clone(&engine),
        Arc::clone(&router),
        config.host.clone(),
        config.port,
    ));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /session/start   - Start a focus session");
    info!("  POST /timer/start     - Start or resume the countdown");
    info!("  POST /timer/pause     - Pause the countdown");
    info!("  POST /timer/toggle    - Pause or resume");
    info!("  POST /timer/reset     - Reset to idle focus");
    info!("  POST /action/:command - Notification action (TOGGLE_PAUSE_RESUME, STOP)");
    info!("  GET  /status          - Current timer status");
    info!("  GET  /health          - Health check");

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

    engine.reset_timer();
    router.unregister();
    info!("Server shutdown complete");
    Ok(())
}
