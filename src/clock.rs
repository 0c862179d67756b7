//! Time sources for version timestamps.
//!
//! Every timestamp the store records (node creation, snapshot, last
//! modification) comes from a [`Clock`]. Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`] so that recency ordering
//! is deterministic.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// A source of wall-clock timestamps.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
///
/// Readings never go backwards: if the system time steps back, the last
/// reading is returned instead.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock();
        let now = match *last {
            Some(prev) => Utc::now().max(prev),
            None => Utc::now(),
        };
        *last = Some(now);
        now
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Create a clock frozen at the Unix epoch.
    pub fn epoch() -> Self {
        Self::new(DateTime::UNIX_EPOCH)
    }

    /// Move the clock forward and return the new reading.
    pub fn advance(&self, by: Duration) -> DateTime<Utc> {
        let mut current = self.current.lock();
        *current += by;
        *current
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
