//! File persistence for the high score and settings
//!
//! Features:
//! - Plain-text integer high score file
//! - JSON settings file
//! - Write to a temp file then rename, so a crash never leaves a half-written record

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("No file at {0}")]
    Missing(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid score {0:?}")]
    InvalidScore(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_to_string(path: &Path) -> Result<String, PersistenceError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            PersistenceError::Missing(path.to_path_buf())
        } else {
            PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// Read a high score file containing a single integer
pub fn read_score(path: &Path) -> Result<u64, PersistenceError> {
    let text = read_to_string(path)?;
    let trimmed = text.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| PersistenceError::InvalidScore(trimmed.to_string()))
}

/// Overwrite the high score file
pub fn write_score(path: &Path, score: u64) -> Result<(), PersistenceError> {
    write_atomic(path, &score.to_string())
}

/// Load a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Save a JSON document (pretty-printed)
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(value)?;
    write_atomic(path, &text)
}
