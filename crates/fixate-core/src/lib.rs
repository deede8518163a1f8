//! # Fixate Core Library
//!
//! This library provides the core business logic for the Fixate focus timer.
//! It implements a CLI-first philosophy where all operations are available
//! through the core library, with any front end being a thin presentation
//! layer over the same types.
//!
//! ## Architecture
//!
//! - **Session Engine**: a tick-driven countdown state machine that requires
//!   the caller (or the scheduler port) to invoke `tick()` once per second
//! - **Completion Tracking**: the set of completed days, loaded once at
//!   startup and written through an injected persistence store on change
//! - **Streak**: a pure derivation over the completion set, never stored
//! - **Storage**: one JSON record in the platform config directory
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: core countdown state machine
//! - [`Session`]: collaborator-facing command and state surface
//! - [`SessionRuntime`]: schedule arming/cancellation around a shared session
//! - [`CompletionTracker`]: completed-day bookkeeping
//! - [`PersistenceStore`]: injected storage port

pub mod completion;
pub mod day;
pub mod error;
pub mod events;
pub mod session;
pub mod store;
pub mod streak;
pub mod timer;

pub use completion::{CompletionSet, CompletionTracker};
pub use day::DayKey;
pub use error::{CoreError, Result, StoreError, ValidationError};
pub use events::Event;
pub use session::{DayCell, Session, SessionRuntime, StartGate, StateSnapshot};
pub use store::{FileStore, MemoryStore, PersistenceStore};
pub use streak::compute_streak;
pub use timer::{
    format_time, EngineState, ManualTicker, SessionEngine, TickFn, TickScheduler,
    TokioTickScheduler,
};

/// Smallest selectable session duration, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;

/// Largest selectable session duration, in minutes.
pub const MAX_SESSION_MINUTES: u32 = 10;

/// How far back the streak walk looks. Streaks longer than this are
/// undercounted; the display horizon makes that acceptable.
pub const STREAK_HORIZON_DAYS: u32 = 365;

/// Cadence of the recurring tick while a session is running.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Days shown in the recent-history strip.
pub const HISTORY_WINDOW_DAYS: u32 = 7;
