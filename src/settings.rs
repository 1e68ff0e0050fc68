//! Game settings and preferences
//!
//! Persisted as JSON next to the high score file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::highscores::DEFAULT_HIGH_SCORE_FILE;
use crate::persistence::{self, PersistenceError};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "rabbit_hole_settings.json";

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality {other:?} (expected low, medium or high)")),
        }
    }
}

impl QualityPreset {
    /// Maximum live explosion fragments for this preset
    pub fn max_fragments(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 200,
            QualityPreset::High => 1000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on crash
    pub screen_shake: bool,
    /// Particle bursts on crash and pickup
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Runtime ===
    /// Frame rate the driver paces to
    pub fps: u32,
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
    /// Where the high score is kept
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,

            reduced_motion: false,

            fps: FPS,
            seed: None,
            high_score_path: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective fragment cap
    pub fn max_fragments(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_fragments()
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match persistence::read_json(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistenceError::Missing(_)) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring bad settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: impl AsRef<Path>) {
        match persistence::write_json(path.as_ref(), self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}
