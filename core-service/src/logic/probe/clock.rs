//! Clock
//!
//! Wall-clock source for certificate expiry math. Injected so day-boundary
//! cases can be tested without waiting real time.

use chrono::{DateTime, Utc};

/// Source of "now"
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen time, for tests and replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until `not_after`, floored toward negative infinity.
///
/// An expiry one hour in the past yields -1, not 0.
pub fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (not_after - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_days_until_floors_future() {
        let now = base();
        assert_eq!(days_until(now + Duration::hours(23), now), 0);
        assert_eq!(days_until(now + Duration::hours(24), now), 1);
        assert_eq!(days_until(now + Duration::days(30) + Duration::hours(5), now), 30);
    }

    #[test]
    fn test_days_until_floors_past() {
        let now = base();
        assert_eq!(days_until(now - Duration::hours(1), now), -1);
        assert_eq!(days_until(now - Duration::hours(25), now), -2);
        assert_eq!(days_until(now, now), 0);
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock(base());
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), base());
    }
}
