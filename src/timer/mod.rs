//! Local work timers.
//!
//! [manager::TimerManager] owns the timers and keeps a single one running, [model::Timer] is the
//! state machine of one work session, and [format] renders elapsed time for display and for
//! submission as an entry.

pub mod format;
pub mod id;
pub mod manager;
pub mod model;
pub mod submit;

pub use manager::{SharedTimerManager, TimerManager};
pub use model::{Timer, TimerState};
