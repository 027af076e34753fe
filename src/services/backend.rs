//! HTTP client for the study-tracking backend

use reqwest::{header, Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::models::{read_acknowledgement, Reply, SessionPayload, StudySession, Topic, TopicList};
use crate::error::BackendError;

/// Number of sessions shown in the recent sessions list
pub const RECENT_SESSIONS_LIMIT: usize = 5;

/// JSON client for the session-recording, topic and session list endpoints
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    cookie: Option<String>,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`, optionally sending a session cookie
    pub fn new(base_url: impl Into<String>, cookie: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            cookie,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_cookie(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }

    /// Persist a completed study session. The stored session is returned when
    /// the acknowledgement decodes as one.
    pub async fn record_session(
        &self,
        payload: &SessionPayload,
    ) -> Result<Option<StudySession>, BackendError> {
        debug!("Recording study session: {:?}", payload);

        let request = self.with_cookie(self.http.post(self.url("/api/study/sessions")).json(payload));
        let reply: Value = request.send().await?.json().await?;

        match read_acknowledgement(reply) {
            Ok(session) => {
                info!("Study session recorded ({} min)", payload.duration_minutes);
                Ok(session)
            }
            Err(e) => {
                warn!("Study session rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the topics available for selection
    pub async fn list_topics(&self) -> Result<Vec<Topic>, BackendError> {
        debug!("Fetching topic list");

        let request = self.with_cookie(self.http.get(self.url("/api/topics")));
        let reply: Reply<TopicList> = request.send().await?.json().await?;
        let topics = reply.into_result()?.topics;

        debug!("Loaded {} topics", topics.len());
        Ok(topics)
    }

    /// Fetch the most recent study sessions, newest first
    pub async fn recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, BackendError> {
        debug!("Fetching {} recent sessions", limit);

        let request = self.with_cookie(
            self.http
                .get(self.url("/api/study/sessions"))
                .query(&[("limit", limit)]),
        );
        let reply: Reply<Vec<StudySession>> = request.send().await?.json().await?;
        let mut sessions = reply.into_result()?;
        sessions.truncate(limit);

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = BackendClient::new("http://localhost:5000/", None);
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/topics"), "http://localhost:5000/api/topics");
    }
}
