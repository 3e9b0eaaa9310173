//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use tracing::{error, info};

use crate::render::TimerFace;
use crate::state::AppState;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Request body for POST /duration
#[derive(Debug, Clone, Deserialize)]
pub struct DurationRequest {
    pub minutes: u64,
}

/// Handle POST /start - Start the countdown and enter focus mode
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_session("start", |session| session.start()) {
        Ok((session, ())) => {
            info!("Start endpoint called - countdown running, focus mode on");
            Ok(Json(ApiResponse::for_session(
                "Countdown started".to_string(),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_session("pause", |session| session.pause()) {
        Ok((session, ())) => {
            info!("Pause endpoint called - countdown paused");
            Ok(Json(ApiResponse::for_session(
                "Countdown paused".to_string(),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Reset to an idle work interval
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_session("reset", |session| session.reset()) {
        Ok((session, ())) => {
            info!("Reset endpoint called - session back to idle work");
            Ok(Json(ApiResponse::for_session(
                "Session reset".to_string(),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to reset session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /tap - Tap on the timer face (pauses while in focus mode)
pub async fn tap_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_session("tap", |session| session.focus_tap()) {
        Ok((session, true)) => {
            info!("Face tap paused the countdown");
            Ok(Json(ApiResponse::for_session(
                "Focus tap paused the countdown".to_string(),
                session,
            )))
        }
        Ok((session, false)) => Ok(Json(ApiResponse::for_session(
            "Tap ignored outside focus mode".to_string(),
            session,
        ))),
        Err(e) => {
            error!("Failed to apply face tap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /duration - Set the work interval length in minutes.
///
/// Out-of-range input is clamped rather than rejected; while the
/// countdown is running the request leaves the session untouched.
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_session("set-duration", |session| {
        session.set_work_duration(request.minutes)
    }) {
        Ok((session, true)) => {
            let minutes = session.work_duration_seconds() / 60;
            info!("Work duration set to {} minutes", minutes);
            Ok(Json(ApiResponse::for_session(
                format!("Work duration set to {} minutes", minutes),
                session,
            )))
        }
        Ok((session, false)) => {
            info!("Duration change ignored while countdown is running");
            Ok(Json(ApiResponse::for_session(
                "Countdown is running, duration unchanged".to_string(),
                session,
            )))
        }
        Err(e) => {
            error!("Failed to set work duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /face - Current timer face render model
pub async fn face_handler(State(state): State<Arc<AppState>>) -> Json<TimerFace> {
    Json(state.current_face())
}

/// Handle GET /status - Return current session status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let session = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get session state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        session,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
