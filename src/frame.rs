//! Per-frame render view
//!
//! Everything a presentation layer needs to draw one frame, with no
//! reference back into the simulation. Coordinates are screen pixels.

use glam::Vec2;

use crate::Rgb;
use crate::colors;
use crate::consts::*;
use crate::screen::{Game, Screen};
use crate::sim::{Effect, ObjectKind, Rect, Session, background_color, phase};

pub const GAME_TITLE: &str = "Alice in the Tunnel of Wonders";

/// Logical sprite category; the asset collaborator maps it to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Obstacle,
    DrinkMe,
    EatMe,
    /// Plain coloured square, no image
    Star,
}

impl SpriteKind {
    /// Asset name for image-backed sprites
    pub fn asset_name(self) -> Option<&'static str> {
        match self {
            SpriteKind::Player => Some("player"),
            SpriteKind::Obstacle => Some("obstacle"),
            SpriteKind::DrinkMe => Some("drink_me"),
            SpriteKind::EatMe => Some("eat_me"),
            SpriteKind::Star => None,
        }
    }
}

impl From<ObjectKind> for SpriteKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Danger => SpriteKind::Obstacle,
            ObjectKind::Shrink => SpriteKind::DrinkMe,
            ObjectKind::Grow => SpriteKind::EatMe,
        }
    }
}

/// A box to draw (image-backed or flat colour)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub rect: Rect,
    /// Fallback / tint colour
    pub color: Rgb,
}

/// An explosion fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Large,
    Medium,
    Small,
}

/// A line of text, horizontally centered, top edge at `y`
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub color: Rgb,
    pub y: f32,
    pub size: TextSize,
}

impl TextLine {
    fn new(text: impl Into<String>, color: Rgb, y: f32, size: TextSize) -> Self {
        Self {
            text: text.into(),
            color,
            y,
            size,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub screen: Screen,
    pub background: Rgb,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub fragments: Vec<Dot>,
    pub text: Vec<TextLine>,
    /// Whole-frame pixel offset while shaking
    pub shake: (i32, i32),
}

impl FrameView {
    pub fn capture(game: &Game, now_ms: u64, shake: (i32, i32)) -> Self {
        let mut view = Self {
            screen: game.screen(),
            background: colors::BLACK,
            sprites: Vec::new(),
            fragments: Vec::new(),
            text: Vec::new(),
            shake,
        };

        match (game.screen(), game.session()) {
            (Screen::Playing, Some(session)) => {
                view.playfield(session, game.high_score().best(), now_ms)
            }
            (Screen::GameOver, _) => view.game_over(game),
            _ => view.title(game, now_ms),
        }

        view
    }

    fn title(&mut self, game: &Game, now_ms: u64) {
        self.sprites.extend(game.demo_background().iter().map(|star| Sprite {
            kind: SpriteKind::Star,
            rect: star.rect,
            color: star.color,
        }));

        let h = SCREEN_HEIGHT;
        self.text.push(TextLine::new(GAME_TITLE, colors::WHITE, h / 4.0, TextSize::Large));
        self.text.push(TextLine::new(
            "Falling down the rabbit hole",
            colors::PLAYER_NORMAL,
            h / 4.0 + 60.0,
            TextSize::Medium,
        ));
        self.text.push(TextLine::new(
            "Dodge the RED obstacles.",
            colors::WHITE,
            h / 2.0 - 30.0,
            TextSize::Medium,
        ));
        self.text.push(TextLine::new(
            "Grab GREEN to shrink, PURPLE to grow (x2 score!)",
            colors::WHITE,
            h / 2.0 + 10.0,
            TextSize::Small,
        ));
        self.text.push(TextLine::new(
            "Use <- and -> to move",
            colors::WHITE,
            h * 0.7,
            TextSize::Medium,
        ));
        // Blink every half second
        if (now_ms / 500) % 2 == 0 {
            self.text.push(TextLine::new(
                "Press any key to start",
                colors::YELLOW,
                h * 0.85,
                TextSize::Medium,
            ));
        }
    }

    fn playfield(&mut self, session: &Session, best: u64, now_ms: u64) {
        self.background = background_color(session.score);

        self.sprites.extend(session.background.iter().map(|star| Sprite {
            kind: SpriteKind::Star,
            rect: star.rect,
            color: star.color,
        }));
        self.sprites.extend(session.objects.iter().map(|obj| Sprite {
            kind: obj.kind.into(),
            rect: obj.rect,
            color: object_color(obj.kind),
        }));
        self.sprites.push(Sprite {
            kind: SpriteKind::Player,
            rect: session.player.rect,
            color: player_color(session.player.effect),
        });

        self.fragments.extend(
            session
                .bursts
                .iter()
                .flat_map(|b| b.fragments.iter())
                .map(|f| Dot {
                    pos: f.pos,
                    radius: f.radius,
                    color: f.color,
                }),
        );

        self.text.push(TextLine::new(
            format!("Score: {}", session.score),
            colors::WHITE,
            10.0,
            TextSize::Medium,
        ));
        self.text.push(TextLine::new(
            format!("High Score: {}", best),
            colors::LIGHT_GRAY,
            40.0,
            TextSize::Small,
        ));
        if let Some(secs) = session.player.effect_seconds_left(now_ms) {
            let effect = session.player.effect;
            self.text.push(TextLine::new(
                format!("Effect: {} ({}s)", effect.label(), secs),
                player_color(effect),
                65.0,
                TextSize::Small,
            ));
        }
        self.text.push(TextLine::new(
            format!("Phase: {}", phase(session.score).number()),
            colors::YELLOW,
            90.0,
            TextSize::Medium,
        ));
    }

    fn game_over(&mut self, game: &Game) {
        let h = SCREEN_HEIGHT;
        self.text.push(TextLine::new("GAME OVER", colors::RED, h / 4.0, TextSize::Large));

        let (score, best, new_record) = match game.last_run() {
            Some(run) => (run.score, game.high_score().best(), run.new_record),
            None => (0, game.high_score().best(), false),
        };
        if new_record {
            self.text.push(TextLine::new(
                "NEW RECORD!",
                colors::GREEN,
                h / 2.0 - 40.0,
                TextSize::Medium,
            ));
        }
        self.text.push(TextLine::new(
            format!("Final Score: {}", score),
            colors::WHITE,
            h / 2.0,
            TextSize::Medium,
        ));
        self.text.push(TextLine::new(
            format!("Your Best: {}", best),
            colors::LIGHT_GRAY,
            h / 2.0 + 30.0,
            TextSize::Small,
        ));
        self.text.push(TextLine::new(
            "Press 'R' to try again",
            colors::YELLOW,
            h * 0.8,
            TextSize::Medium,
        ));
        self.text.push(TextLine::new(
            "Press 'M' for the menu",
            colors::LIGHT_GRAY,
            h * 0.8 + 35.0,
            TextSize::Small,
        ));
    }

    /// Look up a HUD / screen line by prefix
    pub fn line_starting_with(&self, prefix: &str) -> Option<&str> {
        self.text
            .iter()
            .map(|l| l.text.as_str())
            .find(|t| t.starts_with(prefix))
    }
}

pub fn object_color(kind: ObjectKind) -> Rgb {
    match kind {
        ObjectKind::Danger => colors::RED,
        ObjectKind::Shrink => colors::GREEN,
        ObjectKind::Grow => colors::PURPLE,
    }
}

pub fn player_color(effect: Effect) -> Rgb {
    match effect {
        Effect::None => colors::PLAYER_NORMAL,
        Effect::Shrink => colors::PLAYER_SHRINK,
        Effect::Grow => colors::PLAYER_GROW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::platform::{InputEvent, Key};
    use crate::settings::Settings;
    use crate::sim::TickInput;

    fn playing_game() -> Game {
        let mut g = Game::new(Settings::default(), HighScore::new(), 77);
        g.handle_event(InputEvent::KeyPressed(Key::Other), 0);
        g
    }

    #[test]
    fn test_title_blinks_prompt() {
        let mut g = Game::new(Settings::default(), HighScore::new(), 1);
        assert!(g.frame(0).line_starting_with("Press any key").is_some());
        assert!(g.frame(500).line_starting_with("Press any key").is_none());
        assert_eq!(g.frame(0).sprites.len(), DEMO_BACKGROUND_COUNT);
    }

    #[test]
    fn test_hud_lines() {
        let mut g = playing_game();
        g.update(&TickInput::default(), 16);
        let view = g.frame(16);
        assert_eq!(view.line_starting_with("Score:"), Some("Score: 1"));
        assert_eq!(view.line_starting_with("High Score:"), Some("High Score: 0"));
        assert_eq!(view.line_starting_with("Phase:"), Some("Phase: 1"));
        assert!(view.line_starting_with("Effect:").is_none());
        assert_eq!(view.background, background_color(1));
        assert_eq!(view.shake, (0, 0));
    }

    #[test]
    fn test_effect_countdown_line() {
        let mut g = playing_game();
        g.session_mut().unwrap().player.apply_effect(Effect::Grow, 0);
        let view = g.frame(1200);
        assert_eq!(view.line_starting_with("Effect:"), Some("Effect: GROW (4s)"));
    }

    #[test]
    fn test_player_drawn_last() {
        let mut g = playing_game();
        let view = g.frame(0);
        let last = view.sprites.last().unwrap();
        assert_eq!(last.kind, SpriteKind::Player);
        assert_eq!(last.kind.asset_name(), Some("player"));
    }

    #[test]
    fn test_shake_offset_bounded() {
        let mut g = playing_game();
        g.session_mut().unwrap().start_shake(0, SHAKE_DURATION_MS);
        let mut moved = false;
        for t in 0..SHAKE_DURATION_MS {
            let (dx, dy) = g.frame(t).shake;
            assert!(dx.abs() <= SHAKE_MAGNITUDE && dy.abs() <= SHAKE_MAGNITUDE);
            moved |= (dx, dy) != (0, 0);
        }
        assert!(moved);
        assert_eq!(g.frame(SHAKE_DURATION_MS).shake, (0, 0));
    }

    #[test]
    fn test_sprite_kinds_map_assets() {
        assert_eq!(SpriteKind::from(ObjectKind::Shrink).asset_name(), Some("drink_me"));
        assert_eq!(SpriteKind::from(ObjectKind::Grow).asset_name(), Some("eat_me"));
        assert_eq!(SpriteKind::Star.asset_name(), None);
    }
}
