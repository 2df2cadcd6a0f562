//! High score persistence
//!
//! The simulation only knows a number; where it lives is up to the store.
//! Native builds keep a JSON file in the user's data directory, wasm builds
//! use LocalStorage.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Persistence collaborator for the best score
pub trait HighScoreStore {
    /// Stored high score (0 if nothing was stored yet)
    fn load(&mut self) -> StoreResult<u64>;
    /// Replace the stored high score
    fn save(&mut self, score: u64) -> StoreResult<()>;
}

/// On-disk record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// In-memory store for tests and headless hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub score: u64,
    /// Number of saves performed
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self { score, saves: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> StoreResult<u64> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> StoreResult<()> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform's local data directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_data_dir() -> StoreResult<Self> {
        dirs::data_local_dir()
            .map(|dir| Self::new(dir.join("bubble-shooter").join("highscore.json")))
            .ok_or(StoreError::Unavailable("no local data directory"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> StoreResult<u64> {
        if !self.path.exists() {
            log::info!("No high score file at {:?}, starting fresh", self.path);
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path)?;
        let record: HighScoreRecord = serde_json::from_str(&contents)?;
        log::info!("Loaded high score {} from {:?}", record.high_score, self.path);
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json)?;
        log::debug!("Saved high score {} to {:?}", score, self.path);
        Ok(())
    }
}

/// Browser LocalStorage store (wasm only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bubbleShooterHighScore";

    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable("LocalStorage"))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> StoreResult<u64> {
        let storage = Self::storage()?;
        let value = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable("LocalStorage read"))?;
        let Some(value) = value else {
            return Ok(0);
        };
        // Stored as a bare integer string
        match value.trim().parse() {
            Ok(score) => Ok(score),
            Err(e) => {
                log::warn!("Ignoring malformed stored high score {:?}: {}", value, e);
                Ok(0)
            }
        }
    }

    fn save(&mut self, score: u64) -> StoreResult<()> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|_| StoreError::Unavailable("LocalStorage write"))
    }
}
