//! Periodic display refresh for a running study timer

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::state::{timer_state::format_elapsed, Clock};

/// How often the display is refreshed while the timer runs
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Ownership token for the refresh task. Dropping it cancels the task.
///
/// A tick already executing on another worker cannot be interrupted by
/// `abort`, so every write is also gated on the `cancelled` flag under the
/// watch channel's lock. Once `drop` returns, the task can no longer publish.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    /// Spawn the refresh task for a running interval that began at `start_epoch_ms`
    pub fn spawn(
        clock: Arc<dyn Clock>,
        start_epoch_ms: i64,
        display_tx: Arc<watch::Sender<String>>,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let task_cancelled = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let elapsed_ms = (clock.now_ms() - start_epoch_ms).max(0) as u64;
                let shown = format_elapsed(elapsed_ms);
                debug!("Timer tick: {}", shown);

                let published = display_tx.send_if_modified(|current| {
                    if task_cancelled.load(Ordering::SeqCst) {
                        return false;
                    }
                    *current = shown;
                    true
                });
                if !published && task_cancelled.load(Ordering::SeqCst) {
                    break;
                }
            }
        });

        Self { task, cancelled }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}
