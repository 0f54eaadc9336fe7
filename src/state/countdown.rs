//! Countdown breakdown and state

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default distance between startup and the next drop
pub const DEFAULT_DROP_DAYS: i64 = 15;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Days/hours/minutes/seconds decomposition of a positive time difference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    /// Break down a difference in whole milliseconds.
    ///
    /// Returns `None` when the difference is not positive; a breakdown is
    /// never negative.
    pub fn from_millis(diff_ms: i64) -> Option<Self> {
        if diff_ms <= 0 {
            return None;
        }

        // diff_ms > 0 so every quotient below is non-negative
        Some(Self {
            days: (diff_ms / MS_PER_DAY) as u64,
            hours: ((diff_ms / MS_PER_HOUR) % 24) as u64,
            minutes: ((diff_ms / MS_PER_MINUTE) % 60) as u64,
            seconds: ((diff_ms / MS_PER_SECOND) % 60) as u64,
        })
    }

    /// Breakdown of the time left from `now` until `target`
    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Option<Self> {
        Self::from_millis((target - now).num_milliseconds())
    }

    /// Labelled fields in display order
    pub fn units(&self) -> [(u64, &'static str); 4] {
        [
            (self.days, "Days"),
            (self.hours, "Hours"),
            (self.minutes, "Minutes"),
            (self.seconds, "Seconds"),
        ]
    }
}

/// Recompute a breakdown, keeping `prior` once the target has passed
pub fn compute_breakdown(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    prior: Breakdown,
) -> Breakdown {
    Breakdown::until(now, target).unwrap_or(prior)
}

/// Target instant `days` after `now`, or `None` if that is out of range
pub fn default_target(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|ahead| now.checked_add_signed(ahead))
}

/// Countdown towards a drop, as published to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub target: DateTime<Utc>,
    pub breakdown: Breakdown,
    /// Set when the last recompute found the target already reached
    pub expired: bool,
}

impl CountdownState {
    /// Create a countdown with an all-zero breakdown
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            breakdown: Breakdown::default(),
            expired: false,
        }
    }

    /// Recompute against `now`. Returns true if the breakdown was refreshed,
    /// false if it stayed frozen because the target has passed.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> bool {
        match Breakdown::until(now, self.target) {
            Some(breakdown) => {
                self.breakdown = breakdown;
                self.expired = false;
                true
            }
            None => {
                self.expired = true;
                false
            }
        }
    }

    /// Point the countdown at a new target, keeping the last breakdown
    pub fn retarget(&mut self, target: DateTime<Utc>) {
        self.target = target;
        self.expired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_740_000_000_000 + ms).unwrap()
    }

    #[test]
    fn breaks_down_with_floor_and_mod() {
        let b = Breakdown::from_millis(90_125_007).unwrap();
        assert_eq!(
            b,
            Breakdown {
                days: 1,
                hours: 1,
                minutes: 2,
                seconds: 5
            }
        );
    }

    #[test]
    fn exact_unit_boundaries() {
        assert_eq!(
            Breakdown::from_millis(MS_PER_DAY).unwrap(),
            Breakdown {
                days: 1,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
        assert_eq!(
            Breakdown::from_millis(MS_PER_DAY - 1).unwrap(),
            Breakdown {
                days: 0,
                hours: 23,
                minutes: 59,
                seconds: 59
            }
        );
        // Sub-second remainder rounds down to zero seconds but is still running
        assert_eq!(Breakdown::from_millis(999).unwrap(), Breakdown::default());
    }

    #[test]
    fn fields_stay_in_range() {
        let samples = [
            1,
            59_999,
            3_599_999,
            86_399_999,
            90_125_007,
            15 * MS_PER_DAY,
            400 * MS_PER_DAY + 7 * MS_PER_HOUR + 13 * MS_PER_MINUTE + 59_999,
            i64::MAX,
        ];
        for diff in samples {
            let b = Breakdown::from_millis(diff).unwrap();
            assert!(b.hours < 24, "hours out of range for {diff}");
            assert!(b.minutes < 60, "minutes out of range for {diff}");
            assert!(b.seconds < 60, "seconds out of range for {diff}");
        }
    }

    #[test]
    fn non_positive_difference_yields_nothing() {
        assert_eq!(Breakdown::from_millis(0), None);
        assert_eq!(Breakdown::from_millis(-1), None);
        assert_eq!(Breakdown::until(at(5_000), at(1_000)), None);
    }

    #[test]
    fn compute_breakdown_freezes_after_target() {
        let prior = Breakdown {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 1,
        };
        assert_eq!(compute_breakdown(at(10_000), at(10_000), prior), prior);
        assert_eq!(compute_breakdown(at(20_000), at(10_000), prior), prior);
    }

    #[test]
    fn compute_breakdown_is_idempotent() {
        let now = at(0);
        let target = at(90_125_007);
        let first = compute_breakdown(now, target, Breakdown::default());
        let second = compute_breakdown(now, target, Breakdown::default());
        assert_eq!(first, second);
    }

    #[test]
    fn state_recompute_tracks_expiry() {
        let mut state = CountdownState::new(at(2_500));

        assert!(state.recompute(at(0)));
        assert_eq!(state.breakdown.seconds, 2);
        assert!(!state.expired);

        assert!(state.recompute(at(1_000)));
        assert_eq!(state.breakdown.seconds, 1);

        assert!(!state.recompute(at(3_000)));
        assert!(state.expired);
        assert_eq!(state.breakdown.seconds, 1);
    }

    #[test]
    fn retarget_keeps_breakdown_until_next_recompute() {
        let mut state = CountdownState::new(at(61_000));
        state.recompute(at(0));
        assert_eq!(state.breakdown.minutes, 1);

        state.retarget(at(-5_000));
        assert_eq!(state.breakdown.minutes, 1);
        assert!(!state.recompute(at(0)));
        assert_eq!(state.breakdown.minutes, 1);

        state.retarget(at(3 * MS_PER_HOUR));
        assert!(state.recompute(at(0)));
        assert_eq!(state.breakdown.hours, 3);
        assert_eq!(state.breakdown.minutes, 0);
    }

    #[test]
    fn default_target_is_days_ahead() {
        let now = at(0);
        let target = default_target(now, DEFAULT_DROP_DAYS).unwrap();
        assert_eq!(Breakdown::until(now, target).unwrap().days, 15);
    }

    #[test]
    fn default_target_out_of_range_is_none() {
        assert_eq!(default_target(at(0), 100_000_000), None);
        assert_eq!(default_target(at(0), i64::MAX), None);
        assert_eq!(default_target(at(0), -100_000_000), None);
    }
}
