use std::{io::Write, time::Duration};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::storage::timer_store::TimerStore;
use crate::timer::manager::TimerManager;

use super::output::status_line;

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Redraws the running timer once per refresh interval until `shutdown` is cancelled. The
/// collection is reloaded before every frame so changes from other `tact` invocations show up.
pub async fn watch<S: TimerStore>(
    manager: &mut TimerManager<S>,
    out: &mut impl Write,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut ticks = tokio::time::interval(REFRESH_INTERVAL);
    loop {
        tokio::select! {
            // Cancelation ends the loop, leaving the last frame on screen.
            _ = shutdown.cancelled() => {
                debug!("Watch cancelled");
                writeln!(out)?;
                return Ok(());
            }
            _ = ticks.tick() => {
                manager.reload();
                let line = status_line(manager.running_timer(), manager.now());
                write!(out, "\r\x1b[2K{line}")?;
                out.flush()?;
            }
        }
    }
}
