//! Study Timer - a study-session stopwatch backed by a study-tracking service
//!
//! This library provides the pausable study timer state machine, the client
//! for the backend that records completed sessions, and an HTTP controller
//! exposing both to a front end.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{ApiError, BackendError};
pub use services::BackendClient;
pub use state::{AppState, StudyTimer};
pub use utils::signals::shutdown_signal;
