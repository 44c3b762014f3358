// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Wall-clock source shared by both cache tiers.
//!
//! Expirations are persisted in the durable tier, so they must be wall-clock
//! timestamps (epoch millis) rather than monotonic [`std::time::Instant`]s.
//! The cache and the stores read "now" from the same [`Clock`] so that the
//! two tiers never disagree about whether an entry is expired.
//!
//! # Example
//!
//! ```
//! use stocknews::clock::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(1_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now_millis(), 6_000);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Reads the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

/// A clock that only moves when told to.
///
/// Used to exercise expiration without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Convert a TTL into the millisecond offset added to "now".
pub(crate) fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(0);
        assert_eq!(clock.now_millis(), 0);

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now_millis(), 250);

        clock.set(10_000);
        assert_eq!(clock.now_millis(), 10_000);
    }

    #[test]
    fn test_ttl_millis_saturates() {
        assert_eq!(ttl_millis(Duration::from_secs(600)), 600_000);
        assert_eq!(ttl_millis(Duration::MAX), i64::MAX);
    }
}
