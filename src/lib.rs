//! Local work timers for the Tact time-tracking service.
//! Timers are started, paused and resumed from the terminal, kept in a JSON file in the user's home
//! directory and, once stopped, turned into entries like `1h30m Fix auth bug`.
//!

pub mod api;
pub mod cli;
pub mod storage;
pub mod timer;
pub mod utils;
