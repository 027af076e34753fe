//! External service module
//!
//! This module contains the client for the study-tracking backend and the
//! wire types it exchanges.

pub mod backend;
pub mod models;

// Re-export main items
pub use backend::{BackendClient, RECENT_SESSIONS_LIMIT};
pub use models::{RecentSession, SessionPayload, StudySession, Topic};
