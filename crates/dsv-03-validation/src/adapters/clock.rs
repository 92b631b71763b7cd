//! Time source adapters

use crate::ports::outbound::TimeSource;
use chrono::{DateTime, Utc};

/// Current system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed validation time, for validating at a past instant and for tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
