//! Log sink.
//!
//! The terminal belongs to the renderer, so log lines go to a file next to
//! the best score instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::store;

pub const LOG_ENV: &str = "FLAPPY_CAT_LOG";
pub const LOG_FILE: &str = "flappy-cat.log";

/// `<data_dir>/flappy-cat/flappy-cat.log`.
pub fn default_path() -> Option<PathBuf> {
    store::data_dir().ok().map(|dir| dir.join(LOG_FILE))
}

fn open(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global logger, filtered by `$FLAPPY_CAT_LOG` (default `info`).
///
/// Returns the log file path, or `None` if logging could not be set up. The
/// game runs the same either way.
pub fn init() -> Option<PathBuf> {
    let path = default_path()?;
    let file = open(&path).ok()?;
    Builder::from_env(Env::new().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .ok()?;
    Some(path)
}
