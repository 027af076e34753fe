//! Page-level controller owning the study timer and its session form

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{
    Clock, SessionForm, StopReport, StudyTimer, SubmissionOutcome, TimerSnapshot,
};
use crate::{
    error::ApiError,
    services::{
        BackendClient, RecentSession, SessionPayload, StudySession, Topic, RECENT_SESSIONS_LIMIT,
    },
    tasks::spawn_session_submission,
};

/// Controller state shared by the HTTP handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    /// The study timer; transitions run to completion under this lock
    pub timer: Mutex<StudyTimer>,
    /// Topic selection and description consulted on stop
    pub form: Mutex<SessionForm>,
    /// Topics loaded from the backend, if any
    pub topics: Mutex<Option<Vec<Topic>>>,
    /// Most recently fetched sessions
    pub recent_sessions: Mutex<Vec<StudySession>>,
    /// Outcome of the latest session submission
    pub last_submission: Mutex<Option<SubmissionOutcome>>,
    pub backend: BackendClient,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for submission outcomes
    pub submission_tx: broadcast::Sender<SubmissionOutcome>,
    /// Latest formatted elapsed time
    pub display_rx: watch::Receiver<String>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, ApiError> {
    mutex
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to lock {}: {}", what, e)))
}

impl AppState {
    /// Create a controller with an idle timer
    pub fn new(backend: BackendClient, clock: Arc<dyn Clock>) -> Self {
        let (submission_tx, _) = broadcast::channel(16);
        let (display_tx, display_rx) = watch::channel(String::new());

        Self {
            timer: Mutex::new(StudyTimer::new(clock, Arc::new(display_tx))),
            form: Mutex::new(SessionForm::default()),
            topics: Mutex::new(None),
            recent_sessions: Mutex::new(Vec::new()),
            last_submission: Mutex::new(None),
            backend,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            submission_tx,
            display_rx,
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start the timer if idle
    pub fn start_timer(&self) -> Result<TimerSnapshot, ApiError> {
        lock(&self.timer, "timer")?.start();
        self.record_action("start");
        self.snapshot()
    }

    /// Pause a running timer or resume a paused one
    pub fn pause_timer(&self) -> Result<TimerSnapshot, ApiError> {
        lock(&self.timer, "timer")?.pause();
        self.record_action("pause");
        self.snapshot()
    }

    /// Stop the timer and submit the session in the background when it lasted a minute or more.
    /// Returns `None` when the timer was idle.
    pub fn stop_timer(self: &Arc<Self>) -> Result<Option<StopReport>, ApiError> {
        let report = match lock(&self.timer, "timer")?.stop() {
            Some(report) => report,
            None => return Ok(None),
        };
        self.record_action("stop");

        if report.should_record() {
            let form = lock(&self.form, "session form")?.clone();
            let payload = SessionPayload {
                duration_minutes: report.duration_minutes,
                topic_id: form.topic_id,
                description: form.description,
            };
            spawn_session_submission(Arc::clone(self), payload);
        } else {
            info!("Session under a minute, not recording");
        }

        Ok(Some(report))
    }

    /// Update the topic selection and description
    pub fn set_form(&self, form: SessionForm) -> Result<SessionForm, ApiError> {
        if let Some(topic_id) = form.topic_id {
            let topics = lock(&self.topics, "topics")?;
            if let Some(topics) = topics.as_ref() {
                if !topics.iter().any(|topic| topic.id == topic_id) {
                    warn!("Rejecting unknown topic {}", topic_id);
                    return Err(ApiError::UnknownTopic(topic_id));
                }
            }
        }

        let mut current = lock(&self.form, "session form")?;
        *current = form;
        Ok(current.clone())
    }

    /// Reset the form after a session was saved
    pub fn clear_form(&self) -> Result<(), ApiError> {
        *lock(&self.form, "session form")? = SessionForm::default();
        Ok(())
    }

    /// Load the topic list from the backend and cache it
    pub async fn load_topics(&self) -> Result<Vec<Topic>, ApiError> {
        let topics = self.backend.list_topics().await?;
        *lock(&self.topics, "topics")? = Some(topics.clone());
        Ok(topics)
    }

    /// Fetch recent sessions from the backend and cache them
    pub async fn refresh_recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, ApiError> {
        let sessions = self.backend.recent_sessions(limit).await?;
        if limit == RECENT_SESSIONS_LIMIT {
            *lock(&self.recent_sessions, "recent sessions")? = sessions.clone();
        }
        Ok(sessions)
    }

    /// Store and broadcast the outcome of a session submission
    pub fn publish_submission(&self, outcome: SubmissionOutcome) -> Result<(), ApiError> {
        *lock(&self.last_submission, "last submission")? = Some(outcome.clone());

        // No subscribers is fine; the outcome stays visible in the snapshot
        if self.submission_tx.send(outcome).is_err() {
            info!("No listeners for submission outcome");
        }
        Ok(())
    }

    /// Receive outcomes of future session submissions
    pub fn subscribe_submissions(&self) -> broadcast::Receiver<SubmissionOutcome> {
        self.submission_tx.subscribe()
    }

    /// Receive the display values published by the timer and its refresh task
    pub fn subscribe_display(&self) -> watch::Receiver<String> {
        self.display_rx.clone()
    }

    /// Current timer view with derived controls
    pub fn snapshot(&self) -> Result<TimerSnapshot, ApiError> {
        let (phase, display, controls) = {
            let timer = lock(&self.timer, "timer")?;
            (timer.phase(), timer.tick(), timer.controls())
        };

        let last_submission = lock(&self.last_submission, "last submission")?.clone();
        let recent_sessions = lock(&self.recent_sessions, "recent sessions")?
            .iter()
            .cloned()
            .map(RecentSession::from)
            .collect();

        Ok(TimerSnapshot {
            phase,
            display,
            controls,
            form: lock(&self.form, "session form")?.clone(),
            notice: last_submission.as_ref().map(SubmissionOutcome::message),
            last_submission,
            recent_sessions,
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ManualClock, Phase};
    use pretty_assertions::assert_eq;

    fn controller() -> (Arc<AppState>, ManualClock) {
        let clock = ManualClock::new(0);
        // Nothing listens here; these tests never reach the backend
        let backend = BackendClient::new("http://127.0.0.1:9", None);
        (Arc::new(AppState::new(backend, Arc::new(clock.clone()))), clock)
    }

    #[tokio::test]
    async fn snapshot_reflects_transitions() {
        let (state, clock) = controller();

        let idle = state.snapshot().unwrap();
        assert_eq!(idle.phase, Phase::Idle);
        assert_eq!(idle.display, "00:00:00");
        assert!(idle.controls.start_enabled);

        state.start_timer().unwrap();
        clock.set(61_000);
        let paused = state.pause_timer().unwrap();
        assert_eq!(paused.phase, Phase::Paused);
        assert_eq!(paused.display, "00:01:01");
        assert_eq!(paused.controls.pause_label, "Resume");
        assert_eq!(*state.subscribe_display().borrow(), "00:01:01");
        assert_eq!(state.get_last_action().0.as_deref(), Some("pause"));
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_no_op() {
        let (state, _clock) = controller();
        let mut outcomes = state.subscribe_submissions();

        assert_eq!(state.stop_timer().unwrap(), None);
        assert_eq!(state.snapshot().unwrap().phase, Phase::Idle);
        assert!(outcomes.try_recv().is_err());
        assert_eq!(state.get_last_action().0, None);
    }

    #[tokio::test]
    async fn short_session_is_not_submitted() {
        let (state, clock) = controller();
        let mut outcomes = state.subscribe_submissions();

        state.start_timer().unwrap();
        clock.set(59_000);
        let report = state.stop_timer().unwrap().unwrap();

        assert_eq!(report.duration_minutes, 0);
        tokio::task::yield_now().await;
        assert!(outcomes.try_recv().is_err());
        assert_eq!(state.snapshot().unwrap().last_submission, None);
    }

    #[tokio::test]
    async fn form_rejects_topics_missing_from_loaded_list() {
        let (state, _clock) = controller();

        // Before topics are loaded any id is accepted
        let form = SessionForm { topic_id: Some(3), description: "Leitura".to_string() };
        assert_eq!(state.set_form(form.clone()).unwrap(), form);

        *state.topics.lock().unwrap() = Some(vec![Topic { id: 1, name: "Português".to_string() }]);
        assert!(matches!(
            state.set_form(SessionForm { topic_id: Some(3), description: String::new() }),
            Err(ApiError::UnknownTopic(3))
        ));

        let accepted = state
            .set_form(SessionForm { topic_id: Some(1), description: String::new() })
            .unwrap();
        assert_eq!(accepted.topic_id, Some(1));

        state.clear_form().unwrap();
        assert_eq!(state.snapshot().unwrap().form, SessionForm::default());
    }
}
