//! Resize coordination
//!
//! Turns bursts of viewport signals into single re-render triggers. A resize
//! restarts the debounce window; an orientation change waits out its own
//! deferral and then counts as a resize.

use crate::settings::TimingSettings;
use crate::timers::{TimerId, TimerQueue};
use std::time::Duration;
use tracing::debug;

/// Viewport change reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportSignal {
    Resize,
    OrientationChange,
}

/// Timer payloads owned by the coordinator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeTask {
    /// The debounce window closed with no newer resize
    Debounced,
    /// An orientation deferral elapsed
    OrientationSettled,
}

/// Debounce state; timers live in the owner's queue.
#[derive(Debug)]
pub struct ResizeCoordinator {
    debounce: Duration,
    orientation_delay: Duration,
    pending: Option<TimerId>,
}

impl ResizeCoordinator {
    pub fn new(debounce: Duration, orientation_delay: Duration) -> Self {
        Self {
            debounce,
            orientation_delay,
            pending: None,
        }
    }

    pub fn from_timing(timing: &TimingSettings) -> Self {
        Self::new(timing.resize_debounce(), timing.orientation_delay())
    }

    /// Feed a viewport signal.
    pub fn signal<T: From<ResizeTask>>(&mut self, signal: ViewportSignal, timers: &mut TimerQueue<T>) {
        match signal {
            ViewportSignal::Resize => self.restart_debounce(timers),
            ViewportSignal::OrientationChange => {
                debug!(delay_ms = self.orientation_delay.as_millis() as u64, "Orientation change deferred");
                timers.schedule(self.orientation_delay, ResizeTask::OrientationSettled.into());
            }
        }
    }

    /// Handle a fired coordinator timer. Returns true when a re-render is due.
    pub fn on_fired<T: From<ResizeTask>>(&mut self, task: ResizeTask, timers: &mut TimerQueue<T>) -> bool {
        match task {
            ResizeTask::Debounced => {
                self.pending = None;
                true
            }
            ResizeTask::OrientationSettled => {
                self.restart_debounce(timers);
                false
            }
        }
    }

    /// Whether a debounce window is open
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending debounce; the owner clears its queue separately.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    fn restart_debounce<T: From<ResizeTask>>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        self.pending = Some(timers.schedule(self.debounce, ResizeTask::Debounced.into()));
    }
}
