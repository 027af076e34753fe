//! Background tasks module
//!
//! This module contains the tasks that run alongside the timer: the display
//! refresh while running and the delivery of completed sessions.

pub mod display_ticker;
pub mod session_submission;

// Re-export main items
pub use display_ticker::{TickHandle, TICK_INTERVAL};
pub use session_submission::spawn_session_submission;
