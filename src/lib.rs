//! Rabbit Hole - A falling-tunnel arcade game
//!
//! Core modules:
//! - `sim`: Simulation (motion, spawning, collisions, difficulty phases)
//! - `screen`: Start / Playing / Game Over state machine
//! - `frame`: Per-frame render view handed to presentation
//! - `renderer`: CPU-side vertex generation from a frame view
//! - `platform`: Clock, input and frame pacing (plus the terminal frontend)
//! - `persistence`: High score file storage

pub mod frame;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use screen::{Game, Screen};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Target frame rate
    pub const FPS: u32 = 60;

    /// Player defaults
    pub const PLAYER_START_Y: f32 = SCREEN_HEIGHT * 0.25;
    pub const PLAYER_SPEED: f32 = 7.0;
    pub const PLAYER_SIZE_SMALL: f32 = 30.0;
    pub const PLAYER_SIZE_NORMAL: f32 = 50.0;
    pub const PLAYER_SIZE_BIG: f32 = 80.0;

    /// Power-up effect duration (ms)
    pub const EFFECT_DURATION_MS: u64 = 5000;

    /// Global game speed
    pub const START_GAME_SPEED: f32 = 4.0;
    pub const GAME_SPEED_INCREMENT: f32 = 0.001;

    /// Delay before the first spawn of a session (ms)
    pub const FIRST_SPAWN_DELAY_MS: u64 = 1200;

    /// Screen shake on death (ms) and max pixel offset
    pub const SHAKE_DURATION_MS: u64 = 300;
    pub const SHAKE_MAGNITUDE: i32 = 5;

    /// Background starfield population
    pub const SESSION_BACKGROUND_COUNT: usize = 100;
    pub const DEMO_BACKGROUND_COUNT: usize = 70;

    /// Fragments shrink by this much per tick
    pub const FRAGMENT_SHRINK: f32 = 0.1;
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Normalised RGBA for GPU vertices
    pub fn to_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            alpha,
        ]
    }
}

/// Palette shared by sim and presentation
pub mod colors {
    use super::Rgb;

    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const LIGHT_GRAY: Rgb = Rgb(180, 180, 180);
    pub const DIM_GRAY: Rgb = Rgb(80, 80, 80);
    pub const RED: Rgb = Rgb(211, 47, 47);
    pub const GREEN: Rgb = Rgb(76, 175, 80);
    pub const PURPLE: Rgb = Rgb(156, 39, 176);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);

    pub const PLAYER_NORMAL: Rgb = Rgb(173, 216, 230);
    pub const PLAYER_SHRINK: Rgb = Rgb(100, 200, 100);
    pub const PLAYER_GROW: Rgb = Rgb(255, 100, 100);
}
