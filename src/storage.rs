//! Persisted progress - a handful of scalars saved as JSON in the user's
//! data directory.
//!
//! Anything missing or unreadable falls back to first-run defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedProgress {
    pub high_score: u32,
    pub music_enabled: bool,
    pub effects_enabled: bool,
    pub remaining_lives: u32,
    pub highest_level: u32,
    pub last_played_level: u32,
    pub continuation_score: u32,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self {
            high_score: 0,
            music_enabled: true,
            effects_enabled: true,
            remaining_lives: crate::game::life::MAX_LIVES,
            highest_level: 1,
            last_played_level: 1,
            continuation_score: 0,
        }
    }
}

/// Somewhere to keep [`SavedProgress`].
pub trait ProgressStore: Send + Sync + 'static {
    fn load(&self) -> SavedProgress;
    fn save(&mut self, progress: &SavedProgress);
}

/// JSON file store, `<data dir>/dotrunner/progress.json` by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store in the platform data directory. Without one, progress is not kept.
    pub fn in_data_dir() -> Self {
        let path = dirs::data_local_dir().map(|dir| dir.join("dotrunner").join("progress.json"));
        if path.is_none() {
            warn!("Could not determine data directory for saved progress");
        }
        Self { path }
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> SavedProgress {
        let Some(path) = &self.path else {
            return SavedProgress::default();
        };

        if !path.exists() {
            info!("No saved progress at {:?}, starting fresh", path);
            return SavedProgress::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(progress) => {
                    info!("Loaded saved progress from {:?}", path);
                    progress
                }
                Err(e) => {
                    warn!("Failed to parse saved progress: {}", e);
                    SavedProgress::default()
                }
            },
            Err(e) => {
                warn!("Failed to read saved progress: {}", e);
                SavedProgress::default()
            }
        }
    }

    fn save(&mut self, progress: &SavedProgress) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create saved progress directory: {}", e);
            return;
        }

        match serde_json::to_string_pretty(progress) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("Failed to write saved progress: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize saved progress: {}", e),
        }
    }
}

/// Keeps progress in memory only. Used by tests and as a stand-in when
/// nothing should touch the disk.
#[allow(dead_code)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    progress: SavedProgress,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn with_progress(progress: SavedProgress) -> Self {
        Self { progress }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> SavedProgress {
        self.progress.clone()
    }

    fn save(&mut self, progress: &SavedProgress) {
        self.progress = progress.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let mut store = JsonFileStore::new(&path);
        let progress = SavedProgress {
            high_score: 340,
            last_played_level: 6,
            continuation_score: 120,
            music_enabled: false,
            ..SavedProgress::default()
        };
        store.save(&progress);

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load(), progress);
    }

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("progress.json"));
        assert_eq!(store.load(), SavedProgress::default());
    }

    #[test]
    fn test_garbage_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json at all").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), SavedProgress::default());
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, r#"{ "high_score": 90 }"#).unwrap();

        let progress = JsonFileStore::new(&path).load();
        assert_eq!(progress.high_score, 90);
        assert_eq!(progress.remaining_lives, 5);
        assert_eq!(progress.last_played_level, 1);
        assert!(progress.music_enabled);
    }
}
