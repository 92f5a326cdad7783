//!  Timers are persisted through [timer_store::JsonTimerStore].
//!  The basic idea is:
//!   - The whole collection lives in one JSON array, one object per timer.
//!   - Every change rewrites the file. Collections stay small because finished timers from
//!     previous days are dropped at startup.
//!   - A missing or unreadable file means there are no timers yet.

pub mod entities;
pub mod timer_store;
