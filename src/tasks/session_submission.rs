//! Background delivery of a completed study session

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    services::{SessionPayload, RECENT_SESSIONS_LIMIT},
    state::{AppState, SubmissionOutcome},
};

/// Submit `payload` without blocking the caller. The outcome is published on
/// the controller's submission channel; the timer itself is never touched.
pub fn spawn_session_submission(state: Arc<AppState>, payload: SessionPayload) -> JoinHandle<()> {
    tokio::spawn(async move {
        submit_session(state, payload).await;
    })
}

async fn submit_session(state: Arc<AppState>, payload: SessionPayload) {
    let outcome = match state.backend.record_session(&payload).await {
        Ok(_) => {
            info!("Saved study session of {} minutes", payload.duration_minutes);

            if let Err(e) = state.clear_form() {
                error!("Failed to clear session form: {}", e);
            }
            if let Err(e) = state.refresh_recent_sessions(RECENT_SESSIONS_LIMIT).await {
                warn!("Failed to refresh recent sessions: {}", e);
            }

            SubmissionOutcome::saved(payload.duration_minutes)
        }
        Err(e) => {
            error!("Failed to save study session: {}", e);
            SubmissionOutcome::failed(e.user_message())
        }
    };

    if let Err(e) = state.publish_submission(outcome) {
        error!("Failed to publish submission outcome: {}", e);
    }
}
