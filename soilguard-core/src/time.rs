//! Clock abstraction for cycle timestamps
//!
//! Sources stamp every frame from a [`TimeSource`]:
//! - [`SystemTime`]: wall clock (std only)
//! - [`FixedTime`]: constant, settable by hand
//! - [`SteppedTime`]: advances by a fixed step on every read, for replaying
//!   acquisition cycles deterministically
//!
//! [`month_of`] reads the calendar month (UTC) from a wall-clock timestamp for
//! seasonal EC compensation.

use core::cell::Cell;

use chrono::{DateTime, Datelike, Utc};

/// Timestamp in milliseconds since epoch (or device boot)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource: Send {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// True if timestamps are wall clock rather than time since boot
    fn is_wall_clock(&self) -> bool;
}

/// Calendar month (1 = January, UTC) of a Unix timestamp in milliseconds
///
/// Only meaningful for wall-clock timestamps. `None` if the timestamp is out
/// of chrono's range.
pub fn month_of(timestamp: Timestamp) -> Option<u8> {
    let millis = i64::try_from(timestamp).ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.month() as u8)
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stuck at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Clock that advances by `step_ms` after every read
#[derive(Debug, Clone)]
pub struct SteppedTime {
    next: Cell<Timestamp>,
    step_ms: u64,
}

impl SteppedTime {
    /// First read returns `start`, each following read `step_ms` later
    pub fn new(start: Timestamp, step_ms: u64) -> Self {
        Self {
            next: Cell::new(start),
            step_ms,
        }
    }
}

impl TimeSource for SteppedTime {
    fn now(&self) -> Timestamp {
        let now = self.next.get();
        self.next.set(now.saturating_add(self.step_ms));
        now
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!(time.now(), 10);
    }

    #[test]
    fn stepped_time_ticks_per_read() {
        let time = SteppedTime::new(0, 5000);
        assert_eq!(time.now(), 0);
        assert_eq!(time.now(), 5000);
        assert_eq!(time.now(), 10_000);
    }

    #[test]
    fn month_from_unix_millis() {
        assert_eq!(month_of(0), Some(1));
        assert_eq!(month_of(1_705_708_800_000), Some(1)); // 2024-01-20
        assert_eq!(month_of(1_714_521_540_000), Some(4)); // 2024-04-30 23:59
        assert_eq!(month_of(1_715_731_200_000), Some(5)); // 2024-05-15
        assert_eq!(month_of(1_727_740_800_000), Some(10)); // 2024-10-01
        assert_eq!(month_of(u64::MAX), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_time_is_wall_clock() {
        let time = SystemTime;
        assert!(time.is_wall_clock());
        assert!(time.now() > 0);
    }
}
