//! Rabbit Hole entry point
//!
//! Loads settings and the high score, then runs the fixed-rate frame loop in
//! the terminal.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use rabbit_hole::Settings;
#[cfg(not(target_arch = "wasm32"))]
use rabbit_hole::settings::{DEFAULT_SETTINGS_FILE, QualityPreset};

/// Dodge obstacles and grab power-ups falling down the rabbit hole
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); missing or unreadable means defaults
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
    /// Fixed RNG seed for reproducible runs
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Quality preset: low, medium or high
    #[arg(long, value_name = "PRESET")]
    quality: Option<QualityPreset>,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    /// Layer command-line overrides on top of the loaded settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use rabbit_hole::platform::terminal::TerminalFrontend;
    use rabbit_hole::platform::{Clock, FrameLimiter, MonotonicClock};
    use rabbit_hole::{Game, HighScore};

    let args = Args::parse();

    env_logger::init();
    log::info!("Rabbit Hole starting...");

    let mut settings = Settings::load(&args.settings);
    args.apply(&mut settings);
    if args.save_settings {
        settings.save(&args.settings);
    }

    let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
    let fps = settings.fps;
    let high_score = HighScore::load(&settings.high_score_path);

    let mut game = Game::new(settings, high_score, seed);
    let clock = MonotonicClock::new();
    let mut limiter = FrameLimiter::new(fps);
    let mut frontend = TerminalFrontend::open()?;

    while game.is_running() {
        let events = frontend.poll()?;
        let now = clock.now_ms();
        game.step(&events, &frontend.held(), now);
        if !game.is_running() {
            break;
        }
        let view = game.frame(now);
        frontend.draw(&view)?;
        limiter.wait();
    }

    frontend.close()?;
    log::info!("Bye! Best score: {}", game.high_score().best());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No terminal on the web; embed the library and drive `Game` from the host page
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["rabbit-hole"]).unwrap();
        assert_eq!(args.settings, PathBuf::from(DEFAULT_SETTINGS_FILE));
        assert_eq!(args.seed, None);
        assert_eq!(args.quality, None);
        assert!(!args.save_settings);
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let args = Args::try_parse_from([
            "rabbit-hole",
            "--seed",
            "42",
            "--quality",
            "high",
            "--settings",
            "custom.json",
        ])
        .unwrap();
        assert_eq!(args.settings, PathBuf::from("custom.json"));

        let mut settings = Settings::default();
        args.apply(&mut settings);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.quality, QualityPreset::High);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["rabbit-hole", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["rabbit-hole", "--quality", "ultra"]).is_err());
        assert!(Args::try_parse_from(["rabbit-hole", "--settings"]).is_err());
    }
}
