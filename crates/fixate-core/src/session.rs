//! Collaborator-facing surface.
//!
//! [`Session`] wires the engine, the completion tracker, and the explicit
//! first-start gate into the command/state surface a presentation layer
//! drives. [`SessionRuntime`] adds the scheduling contract: one recurring
//! tick while running, cancelled on every transition out.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::completion::{CompletionSet, CompletionTracker};
use crate::day::DayKey;
use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::store::PersistenceStore;
use crate::streak::compute_streak;
use crate::timer::{SessionEngine, TickFn, TickScheduler};
use crate::{HISTORY_WINDOW_DAYS, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES, TICK_INTERVAL_MS};

/// First-visit confirmation gate.
///
/// Computed once at startup from whether the store held prior data. While
/// `Unconfirmed`, plain `start()` is refused; the collaborator shows its
/// introduction and calls `confirm_first_start()` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartGate {
    Unconfirmed,
    Confirmed,
}

/// One cell of the recent-history strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCell {
    pub day: DayKey,
    pub completed: bool,
    /// Single-letter weekday label.
    pub label: char,
}

/// Full state surface observed by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub remaining_secs: u32,
    pub is_running: bool,
    pub selected_minutes: u32,
    pub completed_days: Vec<DayKey>,
    pub streak: u32,
    pub requires_first_start_confirmation: bool,
    pub at: DateTime<Utc>,
}

/// The focus-session core: engine + completion tracking + start gate.
pub struct Session<P> {
    engine: SessionEngine,
    tracker: CompletionTracker<P>,
    gate: StartGate,
}

impl<P: PersistenceStore> Session<P> {
    /// Load completion history from `store` and build a stopped session at
    /// the smallest selectable duration.
    pub fn new(store: P) -> Self {
        let tracker = CompletionTracker::load(store);
        let gate = if tracker.had_stored_data() {
            StartGate::Confirmed
        } else {
            StartGate::Unconfirmed
        };
        Self {
            engine: SessionEngine::new(MIN_SESSION_MINUTES),
            tracker,
            gate,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn requires_first_start_confirmation(&self) -> bool {
        self.gate == StartGate::Unconfirmed
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.engine.remaining_secs()
    }

    pub fn selected_minutes(&self) -> u32 {
        self.engine.selected_minutes()
    }

    pub fn completed_days(&self) -> &CompletionSet {
        self.tracker.snapshot()
    }

    /// Current streak, derived on demand.
    pub fn streak(&self) -> u32 {
        compute_streak(self.tracker.snapshot(), DayKey::today())
    }

    /// Full state snapshot for the presentation layer.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            remaining_secs: self.engine.remaining_secs(),
            is_running: self.engine.is_running(),
            selected_minutes: self.engine.selected_minutes(),
            completed_days: self.tracker.snapshot().iter().collect(),
            streak: self.streak(),
            requires_first_start_confirmation: self.requires_first_start_confirmation(),
            at: Utc::now(),
        }
    }

    /// The last seven days, oldest first, with completion flags.
    pub fn week(&self) -> Vec<DayCell> {
        let completed = self.tracker.snapshot();
        DayKey::today()
            .recent_window(HISTORY_WINDOW_DAYS)
            .into_iter()
            .map(|day| DayCell {
                day,
                completed: completed.contains(day),
                label: day.weekday_letter(),
            })
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the countdown. Refused while the first-start gate is
    /// unconfirmed and when already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.requires_first_start_confirmation() {
            return None;
        }
        self.engine.start()
    }

    /// Confirm the first-visit gate, then start.
    pub fn confirm_first_start(&mut self) -> Option<Event> {
        self.gate = StartGate::Confirmed;
        self.engine.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset()
    }

    /// Select a session duration within the preset range.
    ///
    /// Out-of-range values are rejected, not clamped; the engine below
    /// this boundary stays unchecked.
    pub fn select_duration(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
            return Err(ValidationError::DurationOutOfRange {
                minutes,
                min: MIN_SESSION_MINUTES,
                max: MAX_SESSION_MINUTES,
            });
        }
        Ok(self.engine.select_duration(minutes))
    }

    /// Advance the countdown one second, recording a completion when the
    /// run expires.
    ///
    /// A failed write-through returns `Err`, but the day is already in the
    /// in-memory set and shows up in subsequent snapshots.
    pub fn tick(&mut self) -> Result<Option<Event>, CoreError> {
        let event = self.engine.tick();
        if let Some(Event::SessionCompleted { day, .. }) = &event {
            self.tracker.mark_complete(*day)?;
        }
        Ok(event)
    }
}

fn lock_session<P>(session: &Arc<Mutex<Session<P>>>) -> MutexGuard<'_, Session<P>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A [`Session`] behind one mutual-exclusion boundary, plus the scheduling
/// contract: entering `Running` arms a once-per-second tick; `pause`,
/// `reset`, `select_duration`, and expiry cancel it. `Option<Handle>`
/// makes "at most one live schedule" true by construction.
pub struct SessionRuntime<P, S: TickScheduler> {
    session: Arc<Mutex<Session<P>>>,
    scheduler: S,
    handle: Option<S::Handle>,
}

impl<P, S> SessionRuntime<P, S>
where
    P: PersistenceStore + Send + 'static,
    S: TickScheduler,
{
    pub fn new(session: Session<P>, scheduler: S) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            scheduler,
            handle: None,
        }
    }

    /// Shared handle to the session, for read-side observers.
    pub fn session(&self) -> Arc<Mutex<Session<P>>> {
        Arc::clone(&self.session)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        lock_session(&self.session).snapshot()
    }

    pub fn week(&self) -> Vec<DayCell> {
        lock_session(&self.session).week()
    }

    pub fn requires_first_start_confirmation(&self) -> bool {
        lock_session(&self.session).requires_first_start_confirmation()
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = lock_session(&self.session).start();
        if event.is_some() {
            self.arm();
        }
        event
    }

    pub fn confirm_first_start(&mut self) -> Option<Event> {
        let event = lock_session(&self.session).confirm_first_start();
        if event.is_some() {
            self.arm();
        }
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.disarm();
        lock_session(&self.session).pause()
    }

    pub fn reset(&mut self) -> Event {
        self.disarm();
        lock_session(&self.session).reset()
    }

    pub fn select_duration(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let event = lock_session(&self.session).select_duration(minutes)?;
        self.disarm();
        Ok(event)
    }

    fn arm(&mut self) {
        self.disarm();
        let session = Arc::clone(&self.session);
        let tick: TickFn = Box::new(move || {
            let mut session = lock_session(&session);
            match session.tick() {
                Ok(Some(Event::SessionCompleted { .. })) => std::ops::ControlFlow::Break(()),
                Ok(_) => std::ops::ControlFlow::Continue(()),
                Err(err) => {
                    // Completion reached the in-memory set but not the store.
                    warn!("completion not persisted: {err}");
                    std::ops::ControlFlow::Break(())
                }
            }
        });
        self.handle = Some(self.scheduler.schedule(TICK_INTERVAL_MS, tick));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<P, S: TickScheduler> Drop for SessionRuntime<P, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::store::MemoryStore;
    use crate::timer::ManualTicker;

    fn fresh_session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new())
    }

    fn returning_session() -> Session<MemoryStore> {
        Session::new(MemoryStore::with_record(r#"["2024-01-10"]"#))
    }

    #[test]
    fn fresh_store_requires_first_start_confirmation() {
        let mut session = fresh_session();
        assert!(session.requires_first_start_confirmation());
        assert!(session.start().is_none());
        assert!(!session.is_running());
    }

    #[test]
    fn confirm_first_start_opens_the_gate_and_starts() {
        let mut session = fresh_session();
        assert!(session.confirm_first_start().is_some());
        assert!(session.is_running());
        assert!(!session.requires_first_start_confirmation());
    }

    #[test]
    fn prior_history_skips_the_gate() {
        let mut session = returning_session();
        assert!(!session.requires_first_start_confirmation());
        assert!(session.start().is_some());
    }

    #[test]
    fn malformed_history_behaves_like_a_first_visit() {
        let session = Session::new(MemoryStore::with_record("corrupt"));
        assert!(session.requires_first_start_confirmation());
        assert!(session.completed_days().is_empty());
    }

    #[test]
    fn select_duration_rejects_out_of_range() {
        let mut session = fresh_session();
        assert!(matches!(
            session.select_duration(0),
            Err(ValidationError::DurationOutOfRange { .. })
        ));
        assert!(matches!(
            session.select_duration(11),
            Err(ValidationError::DurationOutOfRange { .. })
        ));
        assert!(session.select_duration(10).is_ok());
    }

    #[test]
    fn full_run_records_today_once() {
        let store = MemoryStore::new();
        let probe = store.clone();
        let mut session = Session::new(store);
        session.select_duration(2).unwrap();
        session.confirm_first_start();

        let mut completions = 0;
        for _ in 0..120 {
            if let Some(Event::SessionCompleted { .. }) = session.tick().unwrap() {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert!(!session.is_running());
        assert_eq!(session.remaining_secs(), 120);
        assert!(session.completed_days().contains(DayKey::today()));
        assert_eq!(session.streak(), 1);
        assert_eq!(probe.write_count(), 1);
    }

    #[test]
    fn tick_surfaces_write_failure_but_keeps_the_day() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut session = Session::new(store);
        session.confirm_first_start();

        let mut saw_error = false;
        for _ in 0..60 {
            if session.tick().is_err() {
                saw_error = true;
            }
        }
        assert!(saw_error);
        assert!(session.completed_days().contains(DayKey::today()));
    }

    #[test]
    fn snapshot_exposes_the_full_surface() {
        let session = returning_session();
        let snap = session.snapshot();
        assert!(!snap.is_running);
        assert_eq!(snap.selected_minutes, MIN_SESSION_MINUTES);
        assert_eq!(snap.remaining_secs, MIN_SESSION_MINUTES * 60);
        assert_eq!(snap.completed_days.len(), 1);
        assert!(!snap.requires_first_start_confirmation);
    }

    #[test]
    fn week_has_seven_cells_ending_today() {
        let mut session = fresh_session();
        session.confirm_first_start();
        for _ in 0..60 {
            session.tick().unwrap();
        }

        let week = session.week();
        assert_eq!(week.len(), 7);
        let today_cell = week.last().unwrap();
        assert_eq!(today_cell.day, DayKey::today());
        assert!(today_cell.completed);
        assert!(week[..6].iter().all(|cell| !cell.completed));
    }

    // ── Runtime / scheduling contract ────────────────────────────────

    #[test]
    fn start_arms_exactly_one_schedule() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(returning_session(), ticker.clone());

        assert_eq!(ticker.armed(), 0);
        assert!(runtime.start().is_some());
        assert_eq!(ticker.armed(), 1);

        // A refused second start must not arm another schedule.
        assert!(runtime.start().is_none());
        assert_eq!(ticker.armed(), 1);
    }

    #[test]
    fn gated_start_does_not_arm() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(fresh_session(), ticker.clone());
        assert!(runtime.start().is_none());
        assert_eq!(ticker.armed(), 0);
    }

    #[test]
    fn pause_and_reset_cancel_the_schedule() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(returning_session(), ticker.clone());

        runtime.start();
        assert_eq!(ticker.armed(), 1);
        runtime.pause();
        assert_eq!(ticker.armed(), 0);

        runtime.start();
        runtime.reset();
        assert_eq!(ticker.armed(), 0);
    }

    #[test]
    fn select_duration_cancels_only_when_valid() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(returning_session(), ticker.clone());
        runtime.start();

        assert!(runtime.select_duration(99).is_err());
        assert_eq!(ticker.armed(), 1);

        runtime.select_duration(5).unwrap();
        assert_eq!(ticker.armed(), 0);
        assert_eq!(runtime.snapshot().remaining_secs, 300);
    }

    #[test]
    fn expiry_disarms_its_own_schedule() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(returning_session(), ticker.clone());
        runtime.start();

        ticker.fire_n(59);
        assert_eq!(ticker.armed(), 1);
        assert!(runtime.snapshot().is_running);

        ticker.fire();
        assert_eq!(ticker.armed(), 0);
        let snap = runtime.snapshot();
        assert!(!snap.is_running);
        assert_eq!(snap.remaining_secs, 60);
        assert!(snap.completed_days.contains(&DayKey::today()));
    }

    #[test]
    fn restart_after_pause_rearms_once() {
        let ticker = ManualTicker::new();
        let mut runtime = SessionRuntime::new(returning_session(), ticker.clone());

        runtime.start();
        ticker.fire_n(10);
        runtime.pause();
        assert_eq!(runtime.snapshot().remaining_secs, 50);

        runtime.start();
        assert_eq!(ticker.armed(), 1);
    }
}
