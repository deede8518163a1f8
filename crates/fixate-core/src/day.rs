//! Canonical calendar-day identity.
//!
//! A [`DayKey`] names one UTC calendar day. Two instants map to the same
//! key iff they fall in the same UTC day; the string form is `YYYY-MM-DD`
//! and doubles as the durable record encoding.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// One UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// The UTC calendar day containing `instant`.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    /// The current UTC calendar day.
    pub fn today() -> Self {
        Self::from_instant(Utc::now())
    }

    /// The day `days` before this one, or `None` past the calendar range.
    pub fn minus_days(self, days: u32) -> Option<Self> {
        self.0.checked_sub_days(Days::new(u64::from(days))).map(Self)
    }

    /// The `window` days ending with this one, oldest first.
    pub fn recent_window(self, window: u32) -> Vec<Self> {
        (0..window)
            .rev()
            .filter_map(|i| self.minus_days(i))
            .collect()
    }

    /// Single-letter weekday label for display strips.
    pub fn weekday_letter(self) -> char {
        match self.0.weekday() {
            Weekday::Mon => 'M',
            Weekday::Tue => 'T',
            Weekday::Wed => 'W',
            Weekday::Thu => 'T',
            Weekday::Fri => 'F',
            Weekday::Sat => 'S',
            Weekday::Sun => 'S',
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}
