//! Scheduler port for the recurring tick.
//!
//! The host's repeating-timer primitive sits behind [`TickScheduler`] so
//! the tick cadence is injectable: the runtime arms one schedule while a
//! session runs and cancels it on any transition out of running. A
//! callback returns [`ControlFlow::Break`] to disarm its own schedule,
//! which is how an expired session stops ticking without a round trip to
//! the runtime.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

/// Callback fired on each scheduled tick. Return `Break` to disarm.
pub type TickFn = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

/// Port over the host's repeating-timer primitive.
pub trait TickScheduler {
    type Handle;

    /// Arm a recurring callback every `interval_ms`.
    fn schedule(&mut self, interval_ms: u64, tick: TickFn) -> Self::Handle;

    /// Disarm a previously armed schedule. Cancelling a schedule that has
    /// already disarmed itself is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Tokio-backed scheduler: each schedule is a spawned interval task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTickScheduler;

impl TokioTickScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl TickScheduler for TokioTickScheduler {
    type Handle = tokio::task::AbortHandle;

    fn schedule(&mut self, interval_ms: u64, mut tick: TickFn) -> Self::Handle {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick resolves immediately; the countdown
            // starts one full period after arming.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tick().is_break() {
                    break;
                }
            }
        });
        task.abort_handle()
    }

    fn cancel(&mut self, handle: Self::Handle) {
        handle.abort();
    }
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    armed: Vec<(u64, TickFn)>,
}

/// Deterministic scheduler: ticks fire only when the test says so.
///
/// Clones share state, so a test can keep a probe handle while the runtime
/// owns the scheduler.
#[derive(Clone, Default)]
pub struct ManualTicker {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently armed schedules.
    pub fn armed(&self) -> usize {
        self.lock().armed.len()
    }

    /// Fire every armed schedule once, dropping any that break.
    pub fn fire(&self) {
        let mut callbacks = std::mem::take(&mut self.lock().armed);
        callbacks.retain_mut(|(_, tick)| tick().is_continue());
        // Re-arm survivors ahead of anything scheduled during the ticks.
        let mut inner = self.lock();
        callbacks.append(&mut inner.armed);
        inner.armed = callbacks;
    }

    /// Fire `times` rounds of ticks.
    pub fn fire_n(&self, times: usize) {
        for _ in 0..times {
            self.fire();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickScheduler for ManualTicker {
    type Handle = u64;

    fn schedule(&mut self, _interval_ms: u64, tick: TickFn) -> Self::Handle {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.armed.push((id, tick));
        id
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.lock().armed.retain(|(id, _)| *id != handle);
    }
}
