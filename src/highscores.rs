//! High score record
//!
//! A single best score, persisted as a text file. A missing or unreadable
//! file just means there is no record yet.

use std::path::{Path, PathBuf};

use crate::persistence::{self, PersistenceError};

/// Default high score file, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// Best score so far, optionally backed by a file
#[derive(Debug, Clone, Default)]
pub struct HighScore {
    best: u64,
    path: Option<PathBuf>,
}

impl HighScore {
    /// In-memory record starting at zero (never touches disk)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the record from `path`; missing or corrupt files start at zero
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let best = match persistence::read_score(path) {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, path.display());
                score
            }
            Err(PersistenceError::Missing(_)) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score file: {}", e);
                0
            }
        };
        Self {
            best,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true (and saves) if it set a new record.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Write the record to its file, if it has one
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match persistence::write_score(path, self.best) {
            Ok(()) => log::info!("High score {} saved", self.best),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let hs = HighScore::load(dir.path().join("none.txt"));
        assert_eq!(hs.best(), 0);
    }

    #[test]
    fn test_corrupt_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "not a number").unwrap();
        assert_eq!(HighScore::load(&path).best(), 0);
    }

    #[test]
    fn test_beating_record_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "50").unwrap();

        let mut hs = HighScore::load(&path);
        assert!(hs.submit(100));
        assert_eq!(HighScore::load(&path).best(), 100);
    }

    #[test]
    fn test_lower_score_leaves_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "50").unwrap();

        let mut hs = HighScore::load(&path);
        assert!(!hs.submit(30));
        assert!(!hs.submit(50));
        assert_eq!(hs.best(), 50);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "50");
    }

    #[test]
    fn test_in_memory_record() {
        let mut hs = HighScore::new();
        assert!(!hs.qualifies(0));
        assert!(hs.submit(10));
        assert_eq!(hs.best(), 10);
    }
}
