//! Wall-clock access for the booking rules.
//!
//! "Today" and departure cut-offs are evaluated in the operator's local zone,
//! so the clock hands out offset-aware timestamps rather than bare UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn time_of_day(&self) -> NaiveTime {
        self.now().time()
    }
}

/// Reads the system clock and shifts it into a fixed local offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Falls back to UTC when the offset is out of range.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock frozen at one instant. Used by tests and tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(time: DateTime<FixedOffset>) -> Self {
        Self { time }
    }

    /// Parses an RFC 3339 timestamp such as `2030-05-01T09:30:00+05:30`.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.time
    }
}
