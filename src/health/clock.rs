//! Clock sources for snapshot timestamps.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

/// Source of the current point in time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current UTC instant.
    fn now(&self) -> OffsetDateTime;
}

/// UTC wall clock that never hands out an earlier instant than it already has.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_issued_nanos: AtomicI64,
}

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        let wall = OffsetDateTime::now_utc();
        // i64 nanoseconds cover instants up to 2262.
        let Ok(nanos) = i64::try_from(wall.unix_timestamp_nanos()) else {
            return wall;
        };

        let previous = self.last_issued_nanos.fetch_max(nanos, Ordering::AcqRel);
        if previous <= nanos {
            return wall;
        }

        OffsetDateTime::from_unix_timestamp_nanos(i128::from(previous)).unwrap_or(wall)
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    /// Create a clock frozen at `at`.
    pub fn new(at: OffsetDateTime) -> Self {
        Self { now: Mutex::new(at) }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
