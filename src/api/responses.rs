//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{StopReport, TimerSnapshot};

/// Response of POST /timer/stop
#[derive(Debug, Clone, Serialize)]
pub struct StopResponse {
    /// False when the timer was already idle
    pub stopped: bool,
    pub elapsed_ms: u64,
    pub duration_minutes: u64,
    /// Whether a session is being sent to the backend
    pub submitted: bool,
    pub timer: TimerSnapshot,
}

impl StopResponse {
    pub fn new(report: Option<StopReport>, timer: TimerSnapshot) -> Self {
        match report {
            Some(report) => Self {
                stopped: true,
                elapsed_ms: report.elapsed_ms,
                duration_minutes: report.duration_minutes,
                submitted: report.should_record(),
                timer,
            },
            None => Self {
                stopped: false,
                elapsed_ms: 0,
                duration_minutes: 0,
                submitted: false,
                timer,
            },
        }
    }
}

/// Query string of GET /sessions/recent
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl HealthResponse {
    pub fn ok(uptime: String, last_action: Option<String>, last_action_time: Option<DateTime<Utc>>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            last_action,
            last_action_time,
        }
    }
}
