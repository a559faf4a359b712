//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::state::AppState;
use super::responses::{ActionResponse, ApiResponse, HealthResponse, StatusResponse, TimerView};

/// Handle POST /session/start - Begin a full focus session
pub async fn start_session_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Start session endpoint called");
    state.engine.start_focus_session();
    Json(ApiResponse::new("Focus session started", &state.engine.state()))
}

/// Handle POST /timer/start - Start or resume the current countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Start endpoint called");
    state.engine.start_timer();
    Json(ApiResponse::new("Timer running", &state.engine.state()))
}

/// Handle POST /timer/pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Pause endpoint called");
    state.engine.pause_timer();
    Json(ApiResponse::new("Pause requested", &state.engine.state()))
}

/// Handle POST /timer/toggle - Pause when running, resume when paused
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Toggle endpoint called");
    state.engine.toggle_pause_resume();
    Json(ApiResponse::new("Toggle requested", &state.engine.state()))
}

/// Handle POST /timer/reset - Return to idle focus
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Reset endpoint called");
    state.engine.reset_timer();
    Json(ApiResponse::new("Timer reset", &state.engine.state()))
}

/// Handle POST /action/:command - Notification action routed through the command router
pub async fn action_handler(
    State(state): State<Arc<AppState>>,
    Path(command): Path<String>,
) -> Json<ActionResponse> {
    let outcome = state.router.dispatch_str(&command);
    info!("Action {} dispatched: {:?}", command, outcome);

    let timer = state.router.engine().map(|engine| TimerView::from(&engine.state()));
    Json(ActionResponse {
        command,
        outcome,
        timestamp: chrono::Utc::now(),
        timer,
    })
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        timer: TimerView::from(&state.engine.state()),
        snapshot: state.engine.current_snapshot(),
        uptime: state.uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
