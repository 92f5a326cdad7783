use std::{
    env,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use anyhow::Result;

pub const APPLICATION_DIR_NAME: &str = ".tact";
pub const TIMERS_FILE_NAME: &str = "timers.json";

/// Home directory of the current user, if the environment exposes one.
pub fn home_dir() -> Option<PathBuf> {
    let home: Option<OsString> = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                env::var_os("USERPROFILE")
            } else {
                env::var_os("HOME")
            }
        }
    };
    home.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// `<home>/.tact`. Falls back to the working directory when no home directory can be found, so
/// that timers land in `./timers.json`.
pub fn application_default_path() -> PathBuf {
    resolve_application_path(home_dir())
}

fn resolve_application_path(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(APPLICATION_DIR_NAME),
        None => PathBuf::from("."),
    }
}

pub fn timers_file(application_dir: &Path) -> PathBuf {
    application_dir.join(TIMERS_FILE_NAME)
}

pub fn create_application_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(v) => Err(v.into()),
    }
}
