use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    ops::Deref,
    path::PathBuf,
};

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use tracing::{debug, warn};

use crate::timer::model::Timer;

use super::entities::TimerEntity;

/// Interface for abstracting storage of timers. The whole collection is read and written at once.
#[cfg_attr(test, mockall::automock)]
pub trait TimerStore {
    /// Returns every stored timer. A store that has never been written to yields an empty vector.
    fn load(&self) -> Result<Vec<Timer>>;

    /// Replaces the stored collection with `timers`.
    fn save(&self, timers: &[Timer]) -> Result<()>;
}

impl<T: Deref> TimerStore for T
where
    T::Target: TimerStore,
{
    fn load(&self) -> Result<Vec<Timer>> {
        self.deref().load()
    }

    fn save(&self, timers: &[Timer]) -> Result<()> {
        self.deref().save(timers)
    }
}

/// The main realization of [TimerStore]. Keeps the collection as a pretty printed JSON array.
pub struct JsonTimerStore {
    path: PathBuf,
}

impl JsonTimerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_locked(file: &File) -> Result<String, std::io::Error> {
        FileExt::lock_shared(file)?;
        let mut content = String::new();
        let result = (&*file).read_to_string(&mut content);
        FileExt::unlock(file)?;
        result.map(|_| content)
    }

    fn overwrite_locked(file: &mut File, content: &[u8]) -> Result<(), std::io::Error> {
        // Semi-safe acquire-release for a file. Truncation happens under the lock so a reader
        // never sees half of an old collection.
        FileExt::lock_exclusive(&*file)?;
        let result = Self::overwrite(file, content);
        FileExt::unlock(&*file)?;
        result
    }

    fn overwrite(file: &mut File, content: &[u8]) -> Result<(), std::io::Error> {
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(content)?;
        file.flush()
    }
}

impl TimerStore for JsonTimerStore {
    fn load(&self) -> Result<Vec<Timer>> {
        let path = &self.path;
        debug!("Loading timers from {path:?}");

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e).with_context(|| format!("Failed to open {path:?}")),
        };

        let content =
            Self::read_locked(&file).with_context(|| format!("Failed to read {path:?}"))?;

        let entities = serde_json::from_str::<Vec<TimerEntity>>(&content)
            .with_context(|| format!("{path:?} does not contain a timer list"))?;

        let timers = entities
            .into_iter()
            .filter_map(|entity| {
                let id = entity.id.clone();
                Timer::try_from(entity)
                    .inspect_err(|e| {
                        // Skip records that break the state invariants instead of losing the
                        // whole file.
                        warn!("Ignoring stored timer {id} in {path:?}: {e}")
                    })
                    .ok()
            })
            .collect();

        Ok(timers)
    }

    fn save(&self, timers: &[Timer]) -> Result<()> {
        let path = &self.path;

        if let Some(dir) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {dir:?}"))?;
        }

        let entities = timers.iter().map(TimerEntity::from).collect::<Vec<_>>();
        let content = serde_json::to_string_pretty(&entities)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Failed to open {path:?} for writing"))?;

        Self::overwrite_locked(&mut file, content.as_bytes())
            .with_context(|| format!("Failed to write {path:?}"))?;

        debug!("Saved {} timers to {path:?}", timers.len());
        Ok(())
    }
}
