//! Study timer state machine

use std::{fmt, sync::Arc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::Clock;
use crate::tasks::TickHandle;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Discrete timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

impl Phase {
    /// Control affordances for this phase
    pub fn controls(self) -> Controls {
        match self {
            Phase::Idle => Controls {
                start_enabled: true,
                pause_label: "Pause",
                pause_enabled: false,
                stop_enabled: false,
            },
            Phase::Running => Controls {
                start_enabled: false,
                pause_label: "Pause",
                pause_enabled: true,
                stop_enabled: true,
            },
            Phase::Paused => Controls {
                start_enabled: false,
                pause_label: "Resume",
                pause_enabled: true,
                stop_enabled: true,
            },
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Running => write!(f, "running"),
            Phase::Paused => write!(f, "paused"),
        }
    }
}

/// Enabled state and labels of the timer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub pause_label: &'static str,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
}

/// Result of stopping a running or paused timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopReport {
    pub elapsed_ms: u64,
    pub duration_minutes: u64,
}

impl StopReport {
    fn from_elapsed(elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            duration_minutes: elapsed_ms / MS_PER_MINUTE,
        }
    }

    /// Only whole, non-zero minutes are worth recording
    pub fn should_record(&self) -> bool {
        self.duration_minutes > 0
    }
}

/// Format elapsed milliseconds as `HH:MM:SS`, truncating partial seconds
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let hours = elapsed_ms / MS_PER_HOUR;
    let minutes = (elapsed_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (elapsed_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Stopwatch with pause/resume that owns its display refresh task while running
#[derive(Debug)]
pub struct StudyTimer {
    phase: Phase,
    start_epoch_ms: i64,
    accumulated_ms: u64,
    tick_task: Option<TickHandle>,
    clock: Arc<dyn Clock>,
    display_tx: Arc<watch::Sender<String>>,
}

impl StudyTimer {
    /// Create an idle timer publishing its display on `display_tx`
    pub fn new(clock: Arc<dyn Clock>, display_tx: Arc<watch::Sender<String>>) -> Self {
        let timer = Self {
            phase: Phase::Idle,
            start_epoch_ms: 0,
            accumulated_ms: 0,
            tick_task: None,
            clock,
            display_tx,
        };
        timer.publish_display();
        timer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn controls(&self) -> Controls {
        self.phase.controls()
    }

    /// Whether a display refresh task is currently owned
    pub fn has_tick_task(&self) -> bool {
        self.tick_task.is_some()
    }

    /// Start timing. Ignored unless idle.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            debug!("Ignoring start while {}", self.phase);
            return;
        }

        self.start_epoch_ms = self.clock.now_ms();
        self.accumulated_ms = 0;
        self.phase = Phase::Running;
        self.spawn_tick();
        self.publish_display();
        info!("Study timer started");
    }

    /// Pause when running, resume when paused. Ignored when idle.
    pub fn pause(&mut self) {
        match self.phase {
            Phase::Running => {
                self.accumulated_ms = self.live_elapsed_ms();
                self.tick_task = None;
                self.phase = Phase::Paused;
                self.publish_display();
                info!("Study timer paused at {}", format_elapsed(self.accumulated_ms));
            }
            Phase::Paused => {
                self.start_epoch_ms = self.clock.now_ms() - self.accumulated_ms as i64;
                self.phase = Phase::Running;
                self.spawn_tick();
                self.publish_display();
                info!("Study timer resumed at {}", format_elapsed(self.accumulated_ms));
            }
            Phase::Idle => debug!("Ignoring pause while idle"),
        }
    }

    /// Stop timing and reset to idle. Returns `None` when already idle.
    pub fn stop(&mut self) -> Option<StopReport> {
        let elapsed_ms = match self.phase {
            Phase::Idle => {
                debug!("Ignoring stop while idle");
                return None;
            }
            Phase::Paused => self.accumulated_ms,
            Phase::Running => self.live_elapsed_ms(),
        };

        self.tick_task = None;
        let report = StopReport::from_elapsed(elapsed_ms);
        info!(
            "Study timer stopped after {} ({} min)",
            format_elapsed(elapsed_ms),
            report.duration_minutes
        );

        self.reset();
        Some(report)
    }

    /// Current display string
    pub fn tick(&self) -> String {
        format_elapsed(self.elapsed_ms())
    }

    /// Elapsed time excluding paused intervals
    pub fn elapsed_ms(&self) -> u64 {
        match self.phase {
            Phase::Idle => 0,
            Phase::Running => self.live_elapsed_ms(),
            Phase::Paused => self.accumulated_ms,
        }
    }

    fn live_elapsed_ms(&self) -> u64 {
        (self.clock.now_ms() - self.start_epoch_ms).max(0) as u64
    }

    fn spawn_tick(&mut self) {
        self.tick_task = Some(TickHandle::spawn(
            Arc::clone(&self.clock),
            self.start_epoch_ms,
            Arc::clone(&self.display_tx),
        ));
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.start_epoch_ms = 0;
        self.accumulated_ms = 0;
        self.tick_task = None;
        self.publish_display();
    }

    fn publish_display(&self) {
        self.display_tx.send_replace(self.tick());
    }
}
