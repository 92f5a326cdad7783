use chrono::{DateTime, Local, Utc};
use now::DateTimeNow;

/// Returns start of the local calendar day that contains `moment`.
pub fn local_day_start(moment: DateTime<Utc>) -> DateTime<Utc> {
    moment
        .with_timezone(&Local)
        .beginning_of_day()
        .with_timezone(&Utc)
}

/// Seconds between two instants, truncated towards zero. A clock stepping backwards never yields a
/// negative amount.
pub fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_seconds().max(0) as u64
}
