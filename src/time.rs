//! Clock abstraction for the control loop
//!
//! The engine needs local wall-clock time with second precision, both for
//! timestamping log records and for the daily-window ordinal arithmetic.
//! Abstracting it behind a trait lets tests drive the engine through whole
//! synthetic days without sleeping.

use chrono::NaiveDateTime;

/// Source of local date and time
pub trait Clock {
    /// Current local date and time, second precision
    fn now(&self) -> NaiveDateTime;
}

/// System clock (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Fixed clock for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Create a clock frozen at the given instant
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Jump to a new instant
    pub fn set(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    /// Advance by whole seconds
    pub fn advance_secs(&mut self, secs: u32) {
        self.now += chrono::Duration::seconds(secs as i64);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
