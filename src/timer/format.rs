//! Converting second counts into text: a clock-like form for live display and the short form the
//! remote entry parser understands ("1h30m Fix auth bug").

const SECONDS_IN_HOUR: i64 = 3600;

/// `MM:SS` below an hour, `H:MM:SS` from an hour on. Hours are not wrapped at 24. Negative input
/// is shown as zero.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);

    let hours = seconds / SECONDS_IN_HOUR;
    let minutes = (seconds % SECONDS_IN_HOUR) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Rounds half up to whole minutes with a floor of one minute, then renders `{h}h{m}m`, `{h}h` or
/// `{m}m`.
pub fn format_duration(seconds: i64) -> String {
    let total_minutes = (seconds.saturating_add(30) / 60).max(1);

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}

/// The text submitted to the entries API when a timer is stopped.
pub fn format_entry(seconds: i64, description: &str) -> String {
    format!("{} {}", format_duration(seconds), description)
}
