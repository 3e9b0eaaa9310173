//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::SessionState;

/// API response structure for session operation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session: SessionState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session,
        }
    }

    /// Create a response whose status reflects the session's run state
    pub fn for_session(message: String, session: SessionState) -> Self {
        let status = if session.is_running() {
            "running"
        } else {
            "idle"
        };
        Self::new(status.to_string(), message, session)
    }
}

/// Status response with session and server information
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub session: SessionState,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
