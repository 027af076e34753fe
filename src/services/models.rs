//! Wire types exchanged with the study-tracking backend

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;

/// Body of a session-recording request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub duration_minutes: u64,
    pub topic_id: Option<i64>,
    pub description: String,
}

/// A study topic as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TopicList {
    pub topics: Vec<Topic>,
}

/// A stored study session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySession {
    pub id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<u64>,
    pub topic_id: Option<i64>,
    pub topic_name: Option<String>,
    pub description: Option<String>,
}

impl StudySession {
    /// Duration as `"1h 5min"`, or `"45min"` under an hour
    pub fn duration_text(&self) -> String {
        let duration = self.duration_minutes.unwrap_or(0);
        let hours = duration / 60;
        let minutes = duration % 60;
        if hours > 0 {
            format!("{}h {}min", hours, minutes)
        } else {
            format!("{}min", minutes)
        }
    }
}

/// A session with its human-readable duration, as shown in the recent list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSession {
    #[serde(flatten)]
    pub session: StudySession,
    pub duration_text: String,
}

impl From<StudySession> for RecentSession {
    fn from(session: StudySession) -> Self {
        let duration_text = session.duration_text();
        Self { session, duration_text }
    }
}

/// Read a session-recording reply. Anything without a truthy `error` is an
/// acknowledgement; the stored session is decoded only when it fits.
pub(crate) fn read_acknowledgement(reply: Value) -> Result<Option<StudySession>, BackendError> {
    if let Some(error) = reply.get("error").and_then(error_text) {
        return Err(BackendError::Rejected(error));
    }
    Ok(serde_json::from_value(reply).ok())
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Backend replies carry either the requested data or an `error` string,
/// whatever the HTTP status
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Reply<T> {
    Rejected { error: String },
    Accepted(T),
}

impl<T> Reply<T> {
    pub fn into_result(self) -> Result<T, BackendError> {
        match self {
            Reply::Rejected { error } => Err(BackendError::Rejected(error)),
            Reply::Accepted(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duration_text_splits_hours() {
        let mut session = StudySession {
            duration_minutes: Some(125),
            ..Default::default()
        };
        assert_eq!(session.duration_text(), "2h 5min");

        session.duration_minutes = Some(45);
        assert_eq!(session.duration_text(), "45min");

        session.duration_minutes = None;
        assert_eq!(session.duration_text(), "0min");
    }

    #[test]
    fn error_reply_is_rejected() {
        let reply: Reply<StudySession> =
            serde_json::from_str(r#"{"error": "Dados incompletos"}"#).unwrap();
        match reply.into_result() {
            Err(BackendError::Rejected(message)) => assert_eq!(message, "Dados incompletos"),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn stored_session_is_accepted() {
        let body = r#"{
            "id": 7,
            "user_id": 1,
            "start_time": "2024-03-01T10:00:00.123456",
            "end_time": null,
            "duration_minutes": 25,
            "topic_id": null,
            "description": "Direito administrativo"
        }"#;
        let session = serde_json::from_str::<Reply<StudySession>>(body)
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(session.id, Some(7));
        assert_eq!(session.duration_minutes, Some(25));
        assert!(session.start_time.is_some());
        assert_eq!(session.topic_name, None);
    }

    #[test]
    fn loosely_typed_acknowledgement_still_counts_as_saved() {
        let offset_time = serde_json::json!({
            "id": 7,
            "start_time": "2024-03-01T10:00:00+00:00",
            "duration_minutes": 2
        });
        assert_eq!(read_acknowledgement(offset_time).unwrap(), None);

        let string_id = serde_json::json!({ "id": "7", "message": "ok" });
        assert!(read_acknowledgement(string_id).is_ok());

        let empty_error = serde_json::json!({ "error": null, "duration_minutes": 2 });
        let session = read_acknowledgement(empty_error).unwrap().unwrap();
        assert_eq!(session.duration_minutes, Some(2));

        assert!(read_acknowledgement(serde_json::json!(true)).is_ok());
    }

    #[test]
    fn acknowledgement_with_error_is_rejected() {
        let reply = serde_json::json!({ "error": "Dados incompletos" });
        match read_acknowledgement(reply) {
            Err(BackendError::Rejected(message)) => assert_eq!(message, "Dados incompletos"),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn recent_session_carries_duration_text() {
        let recent = RecentSession::from(StudySession {
            duration_minutes: Some(61),
            ..Default::default()
        });
        assert_eq!(recent.duration_text, "1h 1min");
        let value = serde_json::to_value(&recent).unwrap();
        assert_eq!(value["duration_minutes"], 61);
        assert_eq!(value["duration_text"], "1h 1min");
    }

    #[test]
    fn payload_serializes_missing_topic_as_null() {
        let payload = SessionPayload {
            duration_minutes: 2,
            topic_id: None,
            description: String::new(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "duration_minutes": 2, "topic_id": null, "description": "" })
        );
    }
}
