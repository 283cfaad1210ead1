//! Source of "now" for cutoff and sequencing decisions.

use {
    chrono::{
        NaiveDateTime,
        Utc,
    },
    chrono_tz::Tz,
};

pub trait Clock: Send + Sync {
    /// Current wall-clock time, local to the shop.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock and converts it into the configured timezone.
#[derive(Clone, Debug)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
