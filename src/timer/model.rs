//! The timer state machine.
//!
//! A timer starts running, may be paused and resumed any number of times and is finally stopped.
//! Transitions requested from a state that doesn't allow them are ignored. Every transition takes
//! the current time as an argument, so the caller decides which clock is used.

use std::fmt::Display;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::whole_seconds_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Running,
    Paused,
    Stopped,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Stopped => "stopped",
        }
    }
}

impl Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Timestamps live inside the phase they belong to, so a paused timer can't carry a start time and
/// a stop time can't be overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Running { started_at: DateTime<Utc> },
    Paused,
    Stopped { stopped_at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    id: String,
    description: String,
    phase: Phase,
    /// Seconds from finished running intervals. The interval in progress is not included.
    accumulated_seconds: u64,
}

impl Timer {
    /// Creates a running timer.
    pub fn new(id: String, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            phase: Phase::Running { started_at: now },
            accumulated_seconds: 0,
        }
    }

    /// Rebuilds a timer from its stored fields. Fails if the timestamps don't match the state: a
    /// start time must be present exactly when running, a stop time exactly when stopped.
    pub fn from_parts(
        id: String,
        description: String,
        state: TimerState,
        started_at: Option<DateTime<Utc>>,
        accumulated_seconds: u64,
        stopped_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let phase = match (state, started_at, stopped_at) {
            (TimerState::Running, Some(started_at), None) => Phase::Running { started_at },
            (TimerState::Paused, None, None) => Phase::Paused,
            (TimerState::Stopped, None, Some(stopped_at)) => Phase::Stopped { stopped_at },
            (state, started_at, stopped_at) => bail!(
                "Timer {id} is {state} with started_at {started_at:?} and stopped_at {stopped_at:?}"
            ),
        };
        Ok(Self {
            id,
            description,
            phase,
            accumulated_seconds,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> TimerState {
        match self.phase {
            Phase::Running { .. } => TimerState::Running,
            Phase::Paused => TimerState::Paused,
            Phase::Stopped { .. } => TimerState::Stopped,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            Phase::Running { started_at } => Some(started_at),
            _ => None,
        }
    }

    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            Phase::Stopped { stopped_at } => Some(stopped_at),
            _ => None,
        }
    }

    pub fn accumulated_seconds(&self) -> u64 {
        self.accumulated_seconds
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, Phase::Stopped { .. })
    }

    /// Running or paused.
    pub fn is_active(&self) -> bool {
        !self.is_stopped()
    }

    /// Accumulated seconds plus the interval in progress, if the timer is running.
    pub fn total_elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.phase {
            Phase::Running { started_at } => {
                self.accumulated_seconds + whole_seconds_between(started_at, now)
            }
            Phase::Paused | Phase::Stopped { .. } => self.accumulated_seconds,
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        let Phase::Running { started_at } = self.phase else {
            return;
        };
        self.accumulated_seconds += whole_seconds_between(started_at, now);
        self.phase = Phase::Paused;
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running { started_at: now };
        }
    }

    /// Finalizes the timer. A running interval is accumulated first. Stopping twice keeps the
    /// first stop time.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        match self.phase {
            Phase::Running { started_at } => {
                self.accumulated_seconds += whole_seconds_between(started_at, now);
            }
            Phase::Paused => {}
            Phase::Stopped { .. } => return,
        }
        self.phase = Phase::Stopped { stopped_at: now };
    }
}
