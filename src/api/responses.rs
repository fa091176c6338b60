//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{store::ChangeKind, timer::MatchClockDisplay};

/// Response for viewer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerResponse {
    pub match_id: String,
    pub timestamp: DateTime<Utc>,
    pub display: MatchClockDisplay,
}

impl ViewerResponse {
    pub fn new(match_id: String, display: MatchClockDisplay) -> Self {
        Self {
            match_id,
            timestamp: Utc::now(),
            display,
        }
    }
}

/// Response for an accepted change notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAcceptedResponse {
    pub status: String,
    pub event_type: ChangeKind,
    pub match_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ChangeAcceptedResponse {
    pub fn accepted(event_type: ChangeKind, match_id: String) -> Self {
        Self {
            status: "accepted".to_string(),
            event_type,
            match_id,
            timestamp: Utc::now(),
        }
    }
}

/// Error body returned alongside a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Server status with mounted viewers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mounted_viewers: Vec<String>,
    pub feed_subscribers: usize,
    pub tick_interval_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
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
