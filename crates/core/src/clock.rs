//! Injectable time source.
//!
//! Expiration checks and trace windows depend on "now"; tests pass a
//! `FixedClock` so those paths stay deterministic.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of business time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Business date derived from `now` (UTC calendar date).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed time, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
