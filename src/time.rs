//! Access to "now", threaded explicitly into every period computation.

use chrono::{DateTime, Local, NaiveDate};

/// Clock abstracts access to the current timestamp so period math stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> DateTime<Local>;

    /// Returns the current local calendar day. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system local time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single calendar day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    day: NaiveDate,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.day
            .and_hms_opt(12, 0, 0)
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
            .unwrap_or_else(Local::now)
    }

    fn today(&self) -> NaiveDate {
        self.day
    }
}
