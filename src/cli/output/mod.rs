use std::fmt::Write;

use ansi_term::{Colour, Style};
use chrono::{DateTime, Utc};

use crate::timer::{
    format::{format_duration, format_elapsed},
    model::Timer,
};

const DESCRIPTION_WIDTH: usize = 30;
const SHORT_ID_LEN: usize = 8;

/// Controls whether terminal colours are used. Tests and piped output use [Styling::Plain].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Styling {
    Colored,
    Plain,
}

impl Styling {
    fn paint(&self, style: Style, text: &str) -> String {
        match self {
            Styling::Colored => style.paint(text).to_string(),
            Styling::Plain => text.to_string(),
        }
    }
}

/// Renders active timers with live elapsed time, then the timers completed today with their
/// submitted duration.
pub fn render_timers(
    active: &[&Timer],
    completed: &[&Timer],
    now: DateTime<Utc>,
    styling: Styling,
) -> String {
    let mut out = String::new();

    if active.is_empty() && completed.is_empty() {
        out.push_str("No timers yet. Start one with `tact start <description>`.\n");
        return out;
    }

    if !active.is_empty() {
        let _ = writeln!(out, "{}", styling.paint(Style::new().bold(), "Active Timers"));
        for timer in active {
            let elapsed = format_elapsed(timer.total_elapsed_seconds(now) as i64);
            let tag = if timer.is_running() {
                styling.paint(Colour::Green.normal(), "[Running]")
            } else {
                styling.paint(Colour::Yellow.normal(), "[Paused]")
            };
            let _ = writeln!(
                out,
                "  {}  {:<width$} {elapsed} {tag}",
                short_id(timer.id()),
                truncate(timer.description(), DESCRIPTION_WIDTH),
                width = DESCRIPTION_WIDTH,
            );
        }
        out.push('\n');
    }

    if !completed.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            styling.paint(Style::new().bold(), "Completed Today")
        );
        for timer in completed {
            let _ = writeln!(
                out,
                "  {}  {:<width$} {}",
                short_id(timer.id()),
                truncate(timer.description(), DESCRIPTION_WIDTH),
                format_duration(timer.accumulated_seconds() as i64),
                width = DESCRIPTION_WIDTH,
            );
        }
        out.push('\n');
    }

    out
}

/// One line summary of the running timer.
pub fn status_line(running: Option<&Timer>, now: DateTime<Utc>) -> String {
    match running {
        Some(timer) => format!(
            "Working on: {} [{}]",
            truncate(timer.description(), DESCRIPTION_WIDTH),
            format_elapsed(timer.total_elapsed_seconds(now) as i64)
        ),
        None => "No timer running".to_string(),
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Cuts `value` to `max` characters, the last three being an ellipsis.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept = value.chars().take(max.saturating_sub(3)).collect::<String>();
    format!("{kept}...")
}
