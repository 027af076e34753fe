//! Session form, submission outcomes and the timer view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Controls, Phase};
use crate::services::RecentSession;

/// Topic selection and description attached to the next recorded session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionForm {
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Saved { duration_minutes: u64 },
    Failed { message: String },
}

/// Result of delivering a session to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    #[serde(flatten)]
    pub status: SubmissionStatus,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionOutcome {
    pub fn saved(duration_minutes: u64) -> Self {
        Self {
            status: SubmissionStatus::Saved { duration_minutes },
            timestamp: Utc::now(),
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            status: SubmissionStatus::Failed { message },
            timestamp: Utc::now(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.status, SubmissionStatus::Saved { .. })
    }

    /// Text for the user-facing notice
    pub fn message(&self) -> String {
        match &self.status {
            SubmissionStatus::Saved { duration_minutes } => {
                format!("Study session saved! Duration: {} minutes", duration_minutes)
            }
            SubmissionStatus::Failed { message } => message.clone(),
        }
    }
}

/// Everything the timer page needs to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub display: String,
    pub controls: Controls,
    pub form: SessionForm,
    pub last_submission: Option<SubmissionOutcome>,
    /// User-facing text for `last_submission`
    pub notice: Option<String>,
    /// Sessions fetched by the latest refresh, newest first
    pub recent_sessions: Vec<RecentSession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(SubmissionOutcome::failed("Usuário não autenticado".into())).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["message"], "Usuário não autenticado");
        assert!(value["timestamp"].is_string());

        let saved = SubmissionOutcome::saved(25);
        assert!(saved.is_saved());
        assert_eq!(saved.message(), "Study session saved! Duration: 25 minutes");
    }

    #[test]
    fn failure_notice_is_the_reported_message() {
        let generic = SubmissionOutcome::failed("Failed to save study session".to_string());
        assert_eq!(generic.message(), "Failed to save study session");

        let rejected = SubmissionOutcome::failed("Dados incompletos".to_string());
        assert_eq!(rejected.message(), "Dados incompletos");
    }
}
