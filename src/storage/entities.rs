use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::model::{Timer, TimerState};

/// The struct used for storing a timer on the disk. Timestamps are optional here and only become
/// part of the state machine once [Timer::from_parts] accepts them.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct TimerEntity {
    pub id: String,
    pub description: String,
    pub state: TimerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub accumulated_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl From<&Timer> for TimerEntity {
    fn from(timer: &Timer) -> Self {
        TimerEntity {
            id: timer.id().to_string(),
            description: timer.description().to_string(),
            state: timer.state(),
            started_at: timer.started_at(),
            accumulated_seconds: timer.accumulated_seconds(),
            stopped_at: timer.stopped_at(),
        }
    }
}

impl TryFrom<TimerEntity> for Timer {
    type Error = anyhow::Error;

    fn try_from(
        TimerEntity {
            id,
            description,
            state,
            started_at,
            accumulated_seconds,
            stopped_at,
        }: TimerEntity,
    ) -> Result<Self> {
        Timer::from_parts(
            id,
            description,
            state,
            started_at,
            accumulated_seconds,
            stopped_at,
        )
    }
}
