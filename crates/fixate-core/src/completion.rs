//! Completed-day bookkeeping.
//!
//! [`CompletionSet`] is the one durable entity in the system: the set of
//! UTC days with at least one finished session. [`CompletionTracker`] loads
//! it once at startup and writes the whole set through the injected store
//! on every change.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::day::DayKey;
use crate::error::StoreError;
use crate::store::PersistenceStore;

/// Insertion-ordered set of completed days, unique by construction.
///
/// Serializes as a bare JSON array of `YYYY-MM-DD` strings -- the exact
/// shape of the durable record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DayKey>", into = "Vec<DayKey>")]
pub struct CompletionSet {
    days: Vec<DayKey>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: DayKey) -> bool {
        self.days.contains(&day)
    }

    /// Insert `day` unless already present. Returns whether it was new.
    pub fn insert(&mut self, day: DayKey) -> bool {
        if self.contains(day) {
            return false;
        }
        self.days.push(day);
        true
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.days.iter().copied()
    }

    pub fn days(&self) -> &[DayKey] {
        &self.days
    }
}

impl From<Vec<DayKey>> for CompletionSet {
    /// Deduplicates while preserving first-seen order, so a stored record
    /// with repeated entries still loads as a proper set.
    fn from(days: Vec<DayKey>) -> Self {
        let mut set = Self::new();
        for day in days {
            set.insert(day);
        }
        set
    }
}

impl From<CompletionSet> for Vec<DayKey> {
    fn from(set: CompletionSet) -> Self {
        set.days
    }
}

impl FromIterator<DayKey> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = DayKey>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Owns the completion set and its write-through store.
pub struct CompletionTracker<P> {
    store: P,
    days: CompletionSet,
    had_stored_data: bool,
}

impl<P: PersistenceStore> CompletionTracker<P> {
    /// Read the durable set once at startup.
    ///
    /// A missing record, an unreadable file, or malformed data all recover
    /// to the empty set. Nothing is raised; recovery is logged.
    pub fn load(store: P) -> Self {
        let (days, had_stored_data) = match store.read() {
            Ok(Some(set)) => (set, true),
            Ok(None) => (CompletionSet::new(), false),
            Err(err) => {
                warn!("recovering empty completion set: {err}");
                (CompletionSet::new(), false)
            }
        };
        Self {
            store,
            days,
            had_stored_data,
        }
    }

    /// Whether the store held a readable record at load time.
    pub fn had_stored_data(&self) -> bool {
        self.had_stored_data
    }

    /// Record `day` as completed. Idempotent: an already-present day is a
    /// no-op with no redundant write.
    ///
    /// On a write failure the in-memory set keeps the day (best-effort
    /// durability) and the error is returned to the caller.
    pub fn mark_complete(&mut self, day: DayKey) -> Result<bool, StoreError> {
        if !self.days.insert(day) {
            return Ok(false);
        }
        debug!(%day, "completion recorded");
        self.store.write(&self.days)?;
        Ok(true)
    }

    /// Read-only view of the completion set.
    pub fn snapshot(&self) -> &CompletionSet {
        &self.days
    }
}
