//! State management module
//!
//! This module contains the study timer state machine, its time source and
//! the page-level controller that owns it.

pub mod app_state;
pub mod clock;
pub mod session_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use session_state::{SessionForm, SubmissionOutcome, SubmissionStatus, TimerSnapshot};
pub use timer_state::{format_elapsed, Controls, Phase, StopReport, StudyTimer};
