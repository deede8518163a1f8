mod engine;
mod ticker;

pub use engine::{EngineState, SessionEngine};
pub use ticker::{ManualTicker, TickFn, TickScheduler, TokioTickScheduler};

/// Render a second count as a zero-padded `MM:SS` countdown string.
pub fn format_time(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(599), "09:59");
    }

    #[test]
    fn minutes_widen_past_an_hour() {
        assert_eq!(format_time(3600), "60:00");
    }

    proptest! {
        #[test]
        fn formatted_time_parses_back(secs in 0u32..6000) {
            let text = format_time(secs);
            let (m, s) = text.split_once(':').unwrap();
            let m: u32 = m.parse().unwrap();
            let s: u32 = s.parse().unwrap();
            prop_assert!(s < 60);
            prop_assert_eq!(m * 60 + s, secs);
        }
    }
}
