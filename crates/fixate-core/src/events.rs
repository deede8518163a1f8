use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;

/// Every state change in the system produces an Event.
/// The presentation collaborator polls for these; nothing is thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        selected_minutes: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Duration changed; any in-progress run is discarded, not rescaled.
    DurationSelected {
        selected_minutes: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. The day is the UTC calendar day the
    /// session finished in.
    SessionCompleted {
        day: DayKey,
        at: DateTime<Utc>,
    },
}
