//! Screen state machine
//!
//! Start -> Playing -> GameOver, with Restart back into Playing and Menu back
//! to Start. Each screen owns its own input handling and update; the driver
//! calls `step` once per frame and `frame` to get something to draw.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::frame::FrameView;
use crate::highscores::HighScore;
use crate::platform::{InputEvent, Key};
use crate::settings::Settings;
use crate::sim::{BackgroundElement, GameEvent, Session, TickInput, starfield, tick};

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title screen with an animated starfield, waits for any key
    Start,
    /// Active run
    Playing,
    /// Frozen summary, waits for restart or menu
    GameOver,
}

/// Result of the last finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    /// Record before this run was submitted
    pub previous_best: u64,
    pub new_record: bool,
}

/// Top-level game: screen state plus whatever that screen needs
pub struct Game {
    screen: Screen,
    settings: Settings,
    high_score: HighScore,
    session: Option<Session>,
    /// Title screen starfield
    demo: Vec<BackgroundElement>,
    /// Presentation-only randomness (title stars, shake jitter)
    fx_rng: Pcg32,
    base_seed: u64,
    runs: u64,
    last_run: Option<RunSummary>,
    running: bool,
}

impl Game {
    pub fn new(settings: Settings, high_score: HighScore, seed: u64) -> Self {
        let mut fx_rng = Pcg32::seed_from_u64(seed ^ 0x5eed_f00d);
        let demo = starfield(DEMO_BACKGROUND_COUNT, &mut fx_rng);
        log::info!(
            "Game ready (seed {}, high score {})",
            seed,
            high_score.best()
        );
        Self {
            screen: Screen::Start,
            settings,
            high_score,
            session: None,
            demo,
            fx_rng,
            base_seed: seed,
            runs: 0,
            last_run: None,
            running: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Mutable access for drivers and tests that script a session
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn demo_background(&self) -> &[BackgroundElement] {
        &self.demo
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    /// False once quit has been requested
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One full frame: discrete input, then the active screen's update.
    ///
    /// A run that starts during this frame is not simulated until the next
    /// one, so it is shown fresh (score 0, start speed) first.
    pub fn step(&mut self, events: &[InputEvent], held: &TickInput, now_ms: u64) -> Vec<GameEvent> {
        let mut started = false;
        for &event in events {
            let before = self.screen;
            self.handle_event(event, now_ms);
            if !self.running {
                return Vec::new();
            }
            started |= before != Screen::Playing && self.screen == Screen::Playing;
        }
        if started {
            return Vec::new();
        }
        self.update(held, now_ms)
    }

    /// React to a discrete input event on the active screen
    pub fn handle_event(&mut self, event: InputEvent, now_ms: u64) {
        let key = match event {
            InputEvent::Quit => {
                log::info!("Quit requested on {:?}", self.screen);
                self.running = false;
                return;
            }
            InputEvent::KeyPressed(key) => key,
        };

        match (self.screen, key) {
            (Screen::Start, _) => self.start_session(now_ms),
            (Screen::GameOver, Key::Restart) => self.start_session(now_ms),
            (Screen::GameOver, Key::Menu) => self.enter_menu(),
            (Screen::GameOver, _) | (Screen::Playing, _) => {}
        }
    }

    /// Advance the active screen by one frame
    pub fn update(&mut self, held: &TickInput, now_ms: u64) -> Vec<GameEvent> {
        match self.screen {
            Screen::Start => {
                for star in &mut self.demo {
                    star.update(&mut self.fx_rng);
                }
                Vec::new()
            }
            Screen::Playing => {
                let Some(session) = self.session.as_mut() else {
                    return Vec::new();
                };
                let events = tick(session, held, now_ms);
                for event in &events {
                    if let GameEvent::Crashed { score } = *event {
                        self.finish_session(score);
                        break;
                    }
                }
                events
            }
            Screen::GameOver => Vec::new(),
        }
    }

    /// Render view for the current frame
    pub fn frame(&mut self, now_ms: u64) -> FrameView {
        let shaking = self.settings.effective_screen_shake()
            && self.session.as_ref().is_some_and(|s| s.is_shaking(now_ms));
        let shake = if shaking {
            (
                self.fx_rng.random_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
                self.fx_rng.random_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
            )
        } else {
            (0, 0)
        };
        FrameView::capture(self, now_ms, shake)
    }

    fn start_session(&mut self, now_ms: u64) {
        let seed = self.base_seed.wrapping_add(self.runs);
        self.runs += 1;
        let mut session = Session::new(seed, now_ms);
        session.fragment_budget = self.settings.max_fragments();
        self.session = Some(session);
        self.screen = Screen::Playing;
        log::info!("Run {} started (seed {})", self.runs, seed);
    }

    fn finish_session(&mut self, score: u64) {
        let previous_best = self.high_score.best();
        let new_record = self.high_score.submit(score);
        self.last_run = Some(RunSummary {
            score,
            previous_best,
            new_record,
        });
        self.screen = Screen::GameOver;
        if new_record {
            log::info!("Game over: {} (new record, was {})", score, previous_best);
        } else {
            log::info!("Game over: {} (best {})", score, previous_best);
        }
    }

    fn enter_menu(&mut self) {
        self.demo = starfield(DEMO_BACKGROUND_COUNT, &mut self.fx_rng);
        self.screen = Screen::Start;
        log::info!("Back to title screen");
    }
}
