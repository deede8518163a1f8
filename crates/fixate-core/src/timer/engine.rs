//! Session engine implementation.
//!
//! The engine is a tick-driven state machine. It has no internal clock --
//! the caller (normally [`crate::SessionRuntime`] through the scheduler
//! port) invokes `tick()` once per wall-clock second while running.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> Stopped
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(5);
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::SessionCompleted) on expiry
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day::DayKey;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Stopped,
    Running,
}

/// Core countdown engine.
///
/// Holds the selected duration and the remaining seconds of the current
/// run. Duration validation is the caller's contract: any positive minute
/// count is accepted here; the [`crate::Session`] facade enforces the
/// selectable range.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    selected_minutes: u32,
    remaining_secs: u32,
    state: EngineState,
}

impl SessionEngine {
    /// Create a stopped engine loaded with `selected_minutes`.
    pub fn new(selected_minutes: u32) -> Self {
        Self {
            selected_minutes,
            remaining_secs: selected_minutes.saturating_mul(60),
            state: EngineState::Stopped,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn selected_minutes(&self) -> u32 {
        self.selected_minutes
    }

    /// Full length of a session at the selected duration.
    ///
    /// Saturating so a pathological duration cannot overflow.
    pub fn session_secs(&self) -> u32 {
        self.selected_minutes.saturating_mul(60)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state != EngineState::Stopped || self.remaining_secs == 0 {
            return None;
        }
        self.state = EngineState::Running;
        debug!(remaining_secs = self.remaining_secs, "session started");
        Some(Event::SessionStarted {
            selected_minutes: self.selected_minutes,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != EngineState::Running {
            return None;
        }
        self.state = EngineState::Stopped;
        Some(Event::SessionPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.state = EngineState::Stopped;
        self.remaining_secs = self.session_secs();
        Event::SessionReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Switch to a new duration. Unconditionally stops: progress of an
    /// in-flight run is discarded, not rescaled.
    pub fn select_duration(&mut self, minutes: u32) -> Event {
        self.selected_minutes = minutes;
        self.state = EngineState::Stopped;
        self.remaining_secs = self.session_secs();
        Event::DurationSelected {
            selected_minutes: minutes,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown one second. Effective only while running.
    ///
    /// On reaching zero the engine stops, emits the completion event for
    /// the current UTC day, and reloads the full duration in the same call
    /// -- a zero remainder is never observable between ticks.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != EngineState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = EngineState::Stopped;
        self.remaining_secs = self.session_secs();
        let day = DayKey::today();
        debug!(%day, "session completed");
        Some(Event::SessionCompleted {
            day,
            at: Utc::now(),
        })
    }
}
