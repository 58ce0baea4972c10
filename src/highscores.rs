//! High score storage
//!
//! A single best kill count. Persisted to LocalStorage on the web and to a
//! small JSON file on native.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the best score lives. Both calls are synchronous and infallible from
/// the caller's side; implementations log and carry on when storage fails.
pub trait HighScoreStore {
    /// Stored best score, 0 if none
    fn high_score(&self) -> u64;
    /// Replace the stored best score
    fn save_high_score(&mut self, score: u64);
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    pub score: u64,
}

impl MemoryHighScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> u64 {
        self.score
    }

    fn save_high_score(&mut self, score: u64) {
        self.score = score;
    }
}

/// Persistent store for the current platform
#[derive(Debug, Clone)]
pub struct LocalHighScore {
    cached: u64,
    #[cfg(not(target_arch = "wasm32"))]
    path: PathBuf,
}

impl LocalHighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pew_pew_planets_high_score";

    /// Default file name on native
    #[allow(dead_code)]
    const FILE_NAME: &'static str = "pew_pew_planets_highscore.json";

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let cached = match Self::read_storage() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(err) => {
                log::info!("No high score found ({}), starting fresh", err);
                0
            }
        };
        Self { cached }
    }

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn read_storage() -> Result<u64, StorageError> {
        let storage = Self::local_storage()?;
        let json = storage
            .get_item(Self::STORAGE_KEY)
            .ok()
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    #[cfg(target_arch = "wasm32")]
    fn write_storage(score: u64) -> Result<(), StorageError> {
        let storage = Self::local_storage()?;
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable)
    }

    /// Load from the default file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Self::FILE_NAME)
    }

    /// Load from a specific file; a missing file means no high score yet
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = match Self::read_file(&path) {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, path.display());
                score
            }
            Err(StorageError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("Ignoring unreadable high score at {}: {}", path.display(), err);
                0
            }
        };
        Self { cached, path }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_file(path: &Path) -> Result<u64, StorageError> {
        let json = std::fs::read_to_string(path)?;
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write_file(&self, score: u64) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for LocalHighScore {
    fn high_score(&self) -> u64 {
        self.cached
    }

    fn save_high_score(&mut self, score: u64) {
        self.cached = score;

        #[cfg(target_arch = "wasm32")]
        let result = Self::write_storage(score);
        #[cfg(not(target_arch = "wasm32"))]
        let result = self.write_file(score);

        match result {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(err) => log::warn!("Failed to save high score {}: {}", score, err),
        }
    }
}
