use chrono::{DateTime, Utc};

use super::time::local_day_start;

/// Represents an entity responsible for providing the current time across the application. Every
/// timer transition asks the clock at the moment it happens, which allows tests to move time by
/// hand.
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Start of the current calendar day in the process's local timezone.
    fn local_midnight(&self) -> DateTime<Utc> {
        local_day_start(self.time())
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
