//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info};

use crate::{
    error::ApiError,
    services::{RecentSession, Topic, RECENT_SESSIONS_LIMIT},
    state::{AppState, SessionForm, TimerSnapshot},
};
use super::responses::{HealthResponse, RecentQuery, StopResponse};

/// Handle POST /timer/start - Start the timer if idle
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = state.start_timer()?;
    info!("Start endpoint called - timer {}", snapshot.phase);
    Ok(Json(snapshot))
}

/// Handle POST /timer/pause - Pause or resume the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = state.pause_timer()?;
    info!("Pause endpoint called - timer {}", snapshot.phase);
    Ok(Json(snapshot))
}

/// Handle POST /timer/stop - Stop the timer and record the session
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>, ApiError> {
    let report = state.stop_timer()?;
    info!("Stop endpoint called - report {:?}", report);
    Ok(Json(StopResponse::new(report, state.snapshot()?)))
}

/// Handle GET /timer - Current timer view
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerSnapshot>, ApiError> {
    Ok(Json(state.snapshot()?))
}

/// Handle GET /timer/display - Stream the display as it refreshes.
/// Sends the current value first, then every change.
pub async fn display_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let display_rx = state.subscribe_display();

    let events = stream::unfold((display_rx, true), |(mut display_rx, first)| async move {
        if !first && display_rx.changed().await.is_err() {
            return None;
        }
        let shown = display_rx.borrow_and_update().clone();
        Some((Ok(Event::default().event("display").data(shown)), (display_rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle PUT /timer/form - Set topic selection and description
pub async fn form_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SessionForm>,
) -> Result<Json<SessionForm>, ApiError> {
    Ok(Json(state.set_form(form)?))
}

/// Handle GET /topics - Load the topic list from the backend
pub async fn topics_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Topic>>, ApiError> {
    state.load_topics().await.map(Json).map_err(|e| {
        error!("Failed to load topics: {}", e);
        e
    })
}

/// Handle GET /sessions/recent - Most recent study sessions
pub async fn recent_sessions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<RecentSession>>, ApiError> {
    let limit = query.limit.unwrap_or(RECENT_SESSIONS_LIMIT);
    let sessions = state.refresh_recent_sessions(limit).await.map_err(|e| {
        error!("Failed to load recent sessions: {}", e);
        e
    })?;

    Ok(Json(sessions.into_iter().map(RecentSession::from).collect()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    Json(HealthResponse::ok(state.get_uptime(), last_action, last_action_time))
}
