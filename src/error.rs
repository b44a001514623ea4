//! Error types.
//!
//! The simulation itself never fails. Everything here comes from the
//! collaborators around it: reading the config file, touching the best-score
//! file, and opening an audio device.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value that would break the simulation (e.g. a zero-sized field).
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Problems persisting the best score.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not determine a data directory")]
    NoDataDir,

    #[error("best score file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("best score encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems opening the audio output.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output available: {0}")]
    Output(String),
}

/// Top-level error for the terminal binary.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
