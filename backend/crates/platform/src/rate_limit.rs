//! Rate Limiting Infrastructure
//!
//! The policy every counter backend enforces and the clock they read.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Rate limit policy
///
/// Resolved once per process and shared read-only by the gate and both
/// counter stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window_secs: u32) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(u64::from(window_secs)),
        }
    }

    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }

    /// Window as a signed delta for timestamp arithmetic
    pub fn window_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.window).unwrap_or(TimeDelta::MAX)
    }

    /// Oldest window start still counted at `now`
    pub fn window_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window_delta())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// End of a window opened at `now`
    pub fn window_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.window_delta())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Wall clock capability
///
/// Window math reads time only through this trait so boundary scenarios
/// can be driven deterministically.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.max_requests, 10);
        assert_eq!(policy.window_secs(), 60);
        assert_eq!(policy.window_delta(), TimeDelta::seconds(60));
    }

    #[test]
    fn test_window_bounds() {
        let policy = RateLimitPolicy::new(5, 30);
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(policy.window_boundary(now), now - TimeDelta::seconds(30));
        assert_eq!(policy.window_end(now), now + TimeDelta::seconds(30));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let policy = RateLimitPolicy {
            max_requests: 1,
            window: Duration::from_secs(u64::MAX),
        };
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(policy.window_boundary(now), DateTime::<Utc>::MIN_UTC);
        assert_eq!(policy.window_end(now), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(61));
        assert_eq!(clock.now(), start + TimeDelta::seconds(61));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
