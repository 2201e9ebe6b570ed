//! # Debounce Timer
//!
//! A restartable one-shot timer: each `start` cancels the previous timer, so
//! only the most recently started timer can fire.
//!
//! ## Keystroke Timeline (500ms window)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  t=0    "di"      start() ─┐                                           │
//! │  t=120  "dio"     start() ─┼─ cancels t=0 timer                        │
//! │  t=260  "dior"    start() ─┼─ cancels t=120 timer                      │
//! │  t=760            ◄────────┘ fires ONCE with "dior"                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Firing runs the action synchronously on the timer task. Long work (an HTTP
//! request) should be spawned by the action so a later `start` cannot abort
//! it halfway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Restartable one-shot timer.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    /// Generation of the most recent `start`/`cancel`.
    generation: Arc<AtomicU64>,
    /// Sleeping task of the armed timer.
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer, replacing any pending one. `action` runs after
    /// `delay` unless the timer is started again or cancelled first.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// of the new timer.
    pub fn start<F>(&mut self, delay: Duration, action: F) -> u64
    where
        F: FnOnce() + Send + 'static,
    {
        let ticket = self.invalidate();
        let generation = Arc::clone(&self.generation);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == ticket {
                trace!(ticket, "Debounce timer fired");
                action();
            }
        }));

        ticket
    }

    /// Disarms the timer without firing.
    pub fn cancel(&mut self) {
        self.invalidate();
    }

    /// True while a started timer has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Bumps the generation and aborts the sleeping task.
    fn invalidate(&mut self) -> u64 {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        ticket
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.invalidate();
    }
}
