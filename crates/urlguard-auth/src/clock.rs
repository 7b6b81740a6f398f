//! Time sources for expiration checks.
//!
//! The guard never reads the wall clock directly. It asks a [`Clock`] for the
//! current UTC instant, so expiration can be exercised deterministically with a
//! [`ManualClock`].

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

/// Provider of the current UTC instant.
///
/// Any `Fn() -> DateTime<Utc>` closure is a clock as well.
pub trait Clock: Send + Sync {
    /// Return the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chrono::{DateTime, Utc};
/// use urlguard_auth::clock::{Clock, ManualClock};
///
/// let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::from_secs(60));
/// assert_eq!(clock.now().timestamp(), 1_700_000_060);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write() = instant;
    }

    /// Move the clock forward by `by`, saturating at the latest representable instant.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now = saturating_add(*now, by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Add a non-negative duration to an instant, saturating instead of overflowing.
pub(crate) fn saturating_add(instant: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
