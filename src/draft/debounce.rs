//! Single-slot delayed execution

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Aborts the spawned task when dropped.
#[derive(Debug)]
struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Coalesces bursts of requests into one run after a quiet period.
///
/// Only the most recent `schedule` survives; earlier pending runs are
/// discarded. Dropping the scheduler cancels whatever is pending.
///
/// Scheduling spawns onto the current Tokio runtime.
#[derive(Debug)]
pub struct DebounceScheduler {
    delay: Duration,
    pending: Option<ScheduledTask>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period unless rescheduled or cancelled first.
    pub fn schedule<F, Fut>(&mut self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task().await;
        });
        // replacing the slot aborts the previous task
        self.pending = Some(ScheduledTask { handle });
    }

    /// Drop the pending run, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.pending = None;
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }
}
