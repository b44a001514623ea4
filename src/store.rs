//! Best-score persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const BEST_FILE: &str = "best.json";

pub trait ScoreStore {
    /// Stored best score, or 0 if there is none or it can't be read.
    fn load_best(&self) -> u32;
    fn save_best(&mut self, best: u32) -> Result<(), StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load_best(&self) -> u32 {
        (**self).load_best()
    }

    fn save_best(&mut self, best: u32) -> Result<(), StoreError> {
        (**self).save_best(best)
    }
}

/// On-disk layout: `{"best": 12}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BestRecord {
    best: u32,
}

/// JSON file under the user's data dir.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/flappy-cat/best.json`.
    pub fn default_location() -> Result<Self, StoreError> {
        Ok(Self::new(data_dir()?.join(BEST_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load_best(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str::<BestRecord>(&json).ok())
            .map(|record| record.best)
            .unwrap_or(0)
    }

    fn save_best(&mut self, best: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&BestRecord { best })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps the score for the life of the process only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub best: Option<u32>,
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_best(best: u32) -> Self {
        Self {
            best: Some(best),
            saves: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> u32 {
        self.best.unwrap_or(0)
    }

    fn save_best(&mut self, best: u32) -> Result<(), StoreError> {
        self.best = Some(best);
        self.saves += 1;
        Ok(())
    }
}

/// `<data_dir>/flappy-cat`, shared with the log file.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    dirs::data_dir()
        .map(|dir| dir.join("flappy-cat"))
        .ok_or(StoreError::NoDataDir)
}
