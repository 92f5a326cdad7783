use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{storage::timer_store::TimerStore, utils::clock::Clock};

use super::{id::IdGenerator, model::Timer};

/// Owner of every local timer. All creation, transitions and deletion go through here, which is
/// what keeps at most one timer running at a time.
///
/// Operations never fail. An unknown id or a transition the timer can't make leaves everything as
/// it was. Each change is written to the store before the call returns; a failed write is logged
/// and the in-memory collection stays authoritative.
pub struct TimerManager<S: TimerStore> {
    timers: Vec<Timer>,
    store: S,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

/// A manager shared between threads. One lock covers the whole read-modify-write of an operation,
/// including its save.
pub type SharedTimerManager<S> = Arc<Mutex<TimerManager<S>>>;

impl<S: TimerStore> TimerManager<S> {
    /// Loads the stored timers and drops the ones finished before today.
    pub fn new(store: S, clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        let timers = store.load().unwrap_or_else(|e| {
            warn!("Starting with no timers, stored timers could not be loaded: {e:?}");
            vec![]
        });

        let mut manager = Self {
            timers,
            store,
            clock,
            ids,
        };
        manager.cleanup_old_completed();
        manager
    }

    pub fn into_shared(self) -> SharedTimerManager<S> {
        Arc::new(Mutex::new(self))
    }

    /// Current time according to the manager's clock. Use it for elapsed time of the timers
    /// handed out by the manager.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    /// Pauses the running timer, if any, and starts a new one.
    pub fn start_timer(&mut self, description: impl Into<String>) -> &Timer {
        let now = self.clock.time();
        self.pause_running(now);

        let timer = Timer::new(self.ids.generate(), description.into(), now);
        info!("Started timer {} {:?}", timer.id(), timer.description());
        self.timers.push(timer);
        self.persist();

        let last = self.timers.len() - 1;
        &self.timers[last]
    }

    pub fn pause_timer(&mut self, id: &str) {
        let now = self.clock.time();
        let Some(timer) = self.find_mut(id) else {
            debug!("Pause ignored, no timer {id}");
            return;
        };
        timer.pause(now);
        debug!(
            "Paused timer {id} at {}s ({})",
            timer.accumulated_seconds(),
            timer.state()
        );
        self.persist();
    }

    /// Resumes a paused timer after pausing whichever timer is running. Anything other than a
    /// paused target is left alone, including the running timer.
    pub fn resume_timer(&mut self, id: &str) {
        let now = self.clock.time();
        if !self.find(id).is_some_and(Timer::is_paused) {
            debug!("Resume ignored, no paused timer {id}");
            return;
        }

        self.pause_running(now);
        if let Some(timer) = self.find_mut(id) {
            timer.resume(now);
            debug!("Resumed timer {id} at {}s", timer.accumulated_seconds());
        }
        self.persist();
    }

    /// Stops the timer and returns it. Stopping an already stopped timer returns it unchanged.
    pub fn stop_timer(&mut self, id: &str) -> Option<&Timer> {
        let now = self.clock.time();
        let index = self.position(id)?;

        self.timers[index].stop(now);
        info!(
            "Stopped timer {id} after {}s",
            self.timers[index].accumulated_seconds()
        );
        self.persist();
        Some(&self.timers[index])
    }

    pub fn delete_timer(&mut self, id: &str) {
        let Some(index) = self.position(id) else {
            debug!("Delete ignored, no timer {id}");
            return;
        };
        let removed = self.timers.remove(index);
        info!("Deleted timer {} {:?}", removed.id(), removed.description());
        self.persist();
    }

    /// Replaces the in-memory collection with the stored one, picking up changes made by other
    /// processes. The current collection is kept when the store can't be read.
    pub fn reload(&mut self) {
        match self.store.load() {
            Ok(timers) => self.timers = timers,
            Err(e) => warn!("Keeping timers in memory, reload failed: {e:?}"),
        }
    }

    pub fn get_timer(&self, id: &str) -> Option<&Timer> {
        self.find(id)
    }

    pub fn running_timer(&self) -> Option<&Timer> {
        self.timers.iter().find(|t| t.is_running())
    }

    /// Running and paused timers in the order they were created.
    pub fn active_timers(&self) -> Vec<&Timer> {
        self.timers.iter().filter(|t| t.is_active()).collect()
    }

    /// Timers stopped at or after local midnight.
    pub fn completed_today(&self) -> Vec<&Timer> {
        let midnight = self.clock.local_midnight();
        self.timers
            .iter()
            .filter(|t| stopped_since(t, midnight))
            .collect()
    }

    /// Every timer in creation order.
    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    fn find(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id() == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.timers.iter().position(|t| t.id() == id)
    }

    fn pause_running(&mut self, now: DateTime<Utc>) {
        for timer in self.timers.iter_mut().filter(|t| t.is_running()) {
            debug!("Pausing running timer {}", timer.id());
            timer.pause(now);
        }
    }

    /// Keeps active timers no matter how old they are, and finished timers from today.
    fn cleanup_old_completed(&mut self) {
        let midnight = self.clock.local_midnight();
        let before = self.timers.len();

        self.timers
            .retain(|t| t.is_active() || stopped_since(t, midnight));

        let removed = before - self.timers.len();
        if removed > 0 {
            info!("Removed {removed} timers completed before {midnight}");
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.timers) {
            warn!("Failed to persist timers, changes only live in memory: {e:?}");
        }
    }
}

fn stopped_since(timer: &Timer, moment: DateTime<Utc>) -> bool {
    timer.stopped_at().is_some_and(|stopped_at| stopped_at >= moment)
}
