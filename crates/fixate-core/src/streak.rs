//! Consecutive-day streak derivation.
//!
//! The streak is never stored; it is recomputed on demand from the
//! completion set and the current day. Cost is bounded by the walk horizon.

use crate::completion::CompletionSet;
use crate::day::DayKey;
use crate::STREAK_HORIZON_DAYS;

/// Count consecutive completed days walking backward from `today`.
///
/// A missing `today` does not end the count by itself -- a streak built on
/// prior days survives until today's session happens. The first gap
/// strictly before today stops the walk. The walk is capped at
/// [`STREAK_HORIZON_DAYS`] iterations, so longer streaks are undercounted.
pub fn compute_streak(completed: &CompletionSet, today: DayKey) -> u32 {
    let mut streak = 0;
    for i in 0..STREAK_HORIZON_DAYS {
        let Some(day) = today.minus_days(i) else {
            break;
        };
        if completed.contains(day) {
            streak += 1;
        } else if i > 0 {
            break;
        }
        // i == 0 and missing: keep walking.
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn today() -> DayKey {
        day("2024-06-15")
    }

    fn set_of(days: &[DayKey]) -> CompletionSet {
        days.iter().copied().collect()
    }

    #[test]
    fn empty_set_has_no_streak() {
        assert_eq!(compute_streak(&CompletionSet::new(), today()), 0);
    }

    #[test]
    fn today_alone_counts_one() {
        let set = set_of(&[today()]);
        assert_eq!(compute_streak(&set, today()), 1);
    }

    #[test]
    fn prior_two_days_count_without_today() {
        let set = set_of(&[
            today().minus_days(1).unwrap(),
            today().minus_days(2).unwrap(),
        ]);
        assert_eq!(compute_streak(&set, today()), 2);
    }

    #[test]
    fn gap_before_today_ends_the_streak() {
        // Day before yesterday done, yesterday missed: the gap at offset 1
        // stops the walk before it can reach offset 2.
        let set = set_of(&[today().minus_days(2).unwrap()]);
        assert_eq!(compute_streak(&set, today()), 0);
    }

    #[test]
    fn unbroken_run_counts_fully() {
        let set: CompletionSet = (0..10).filter_map(|i| today().minus_days(i)).collect();
        assert_eq!(compute_streak(&set, today()), 10);
    }

    #[test]
    fn gap_in_the_middle_stops_counting() {
        // 0, 1, 2 done; 3 missing; 4, 5 done.
        let set: CompletionSet = [0u32, 1, 2, 4, 5]
            .iter()
            .filter_map(|&i| today().minus_days(i))
            .collect();
        assert_eq!(compute_streak(&set, today()), 3);
    }

    #[test]
    fn walk_caps_at_the_horizon() {
        let set: CompletionSet = (0..STREAK_HORIZON_DAYS + 30)
            .filter_map(|i| today().minus_days(i))
            .collect();
        assert_eq!(compute_streak(&set, today()), STREAK_HORIZON_DAYS);
    }

    #[test]
    fn days_after_today_are_ignored() {
        let future = day("2024-06-20");
        let set = set_of(&[future, today()]);
        assert_eq!(compute_streak(&set, today()), 1);
    }

    proptest! {
        #[test]
        fn streak_never_exceeds_set_size(offsets in proptest::collection::hash_set(0u32..400, 0..40)) {
            let set: CompletionSet = offsets
                .iter()
                .filter_map(|&i| today().minus_days(i))
                .collect();
            let streak = compute_streak(&set, today());
            prop_assert!(streak as usize <= set.len());
            prop_assert!(streak <= STREAK_HORIZON_DAYS);
        }
    }
}
