//! Session state and entity types
//!
//! Everything a single play session owns lives in `Session`. Timers are
//! deadlines in milliseconds against the frame clock, never callbacks.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::spawn::SpawnScheduler;
use crate::Rgb;
use crate::colors;
use crate::consts::*;

/// Player size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Normal,
    Big,
}

impl SizeClass {
    /// Sprite height in pixels (sprites are square)
    pub fn size(self) -> f32 {
        match self {
            SizeClass::Small => PLAYER_SIZE_SMALL,
            SizeClass::Normal => PLAYER_SIZE_NORMAL,
            SizeClass::Big => PLAYER_SIZE_BIG,
        }
    }
}

/// Active power-up effect on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    None,
    Shrink,
    Grow,
}

impl Effect {
    pub fn size_class(self) -> SizeClass {
        match self {
            Effect::None => SizeClass::Normal,
            Effect::Shrink => SizeClass::Small,
            Effect::Grow => SizeClass::Big,
        }
    }

    pub fn multiplier(self) -> u32 {
        match self {
            Effect::None | Effect::Shrink => 1,
            Effect::Grow => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Effect::None => "NONE",
            Effect::Shrink => "SHRINK",
            Effect::Grow => "GROW",
        }
    }
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub effect: Effect,
    /// Clock time (ms) the current effect started
    pub effect_started_ms: u64,
}

impl Default for Player {
    fn default() -> Self {
        let size = SizeClass::Normal.size();
        Self {
            rect: Rect::from_center(Vec2::new(SCREEN_WIDTH / 2.0, PLAYER_START_Y), size, size),
            effect: Effect::None,
            effect_started_ms: 0,
        }
    }
}

impl Player {
    pub fn size_class(&self) -> SizeClass {
        self.effect.size_class()
    }

    pub fn multiplier(&self) -> u32 {
        self.effect.multiplier()
    }

    /// Start (or restart) a power-up effect
    pub fn apply_effect(&mut self, effect: Effect, now_ms: u64) {
        self.effect = effect;
        self.effect_started_ms = now_ms;
        self.sync_size();
    }

    /// Drop any active effect and return to normal size
    pub fn clear_effect(&mut self) {
        self.effect = Effect::None;
        self.effect_started_ms = 0;
        self.sync_size();
    }

    /// Whole seconds left on the active effect, rounded up the way the HUD shows it
    pub fn effect_seconds_left(&self, now_ms: u64) -> Option<u64> {
        if self.effect == Effect::None {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.effect_started_ms);
        Some(EFFECT_DURATION_MS.saturating_sub(elapsed) / 1000 + 1)
    }

    /// Move horizontally, clamp to the screen, expire the effect
    pub fn update(&mut self, left: bool, right: bool, now_ms: u64) {
        if left {
            self.rect.x -= PLAYER_SPEED;
        }
        if right {
            self.rect.x += PLAYER_SPEED;
        }
        self.rect.clamp_x(0.0, SCREEN_WIDTH);

        if self.effect != Effect::None
            && now_ms.saturating_sub(self.effect_started_ms) > EFFECT_DURATION_MS
        {
            self.clear_effect();
        }

        self.sync_size();
    }

    fn sync_size(&mut self) {
        let size = self.size_class().size();
        if self.rect.w != size || self.rect.h != size {
            self.rect.resize_centered(size, size);
            self.rect.clamp_x(0.0, SCREEN_WIDTH);
        }
    }
}

/// Tunnel object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Obstacle: touching it ends the run
    Danger,
    /// "Drink me" bottle: shrinks the player
    Shrink,
    /// "Eat me" cake: grows the player and doubles scoring
    Grow,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Danger, ObjectKind::Shrink, ObjectKind::Grow];

    /// Roll a bounding box size for a new object of this kind
    pub fn roll_size(self, rng: &mut impl Rng) -> (f32, f32) {
        match self {
            ObjectKind::Danger => (
                rng.random_range(40..=100) as f32,
                rng.random_range(15..=30) as f32,
            ),
            ObjectKind::Shrink => (28.0, 28.0),
            ObjectKind::Grow => (32.0, 32.0),
        }
    }

    /// Player effect granted by collecting this object
    pub fn effect(self) -> Option<Effect> {
        match self {
            ObjectKind::Danger => None,
            ObjectKind::Shrink => Some(Effect::Shrink),
            ObjectKind::Grow => Some(Effect::Grow),
        }
    }
}

/// An obstacle or power-up travelling up the tunnel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub rect: Rect,
    /// Fixed at spawn from the global game speed
    pub speed: f32,
}

impl TunnelObject {
    pub fn update(&mut self) {
        self.rect.y -= self.speed;
    }

    /// True once the whole object has left through the top of the screen
    pub fn is_gone(&self) -> bool {
        self.rect.bottom() < 0.0
    }
}

/// Decorative parallax star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundElement {
    pub rect: Rect,
    pub color: Rgb,
    pub speed: f32,
}

const STAR_COLORS: [Rgb; 3] = [colors::WHITE, colors::LIGHT_GRAY, colors::DIM_GRAY];

impl BackgroundElement {
    pub fn random(rng: &mut impl Rng) -> Self {
        let size = rng.random_range(1..=4) as f32;
        Self {
            rect: Rect::new(
                rng.random_range(0..=SCREEN_WIDTH as u32) as f32,
                rng.random_range(0..=SCREEN_HEIGHT as u32) as f32,
                size,
                size,
            ),
            color: STAR_COLORS[rng.random_range(0..STAR_COLORS.len())],
            speed: rng.random_range(1.0..6.0),
        }
    }

    /// Drift upward, recycling at the bottom with a fresh lane and speed
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.rect.y -= self.speed;
        if self.rect.bottom() < 0.0 {
            self.rect.y = SCREEN_HEIGHT;
            self.rect.x = rng.random_range(0..=SCREEN_WIDTH as u32) as f32;
            self.speed = rng.random_range(1.0..6.0);
        }
    }
}

/// Populate a starfield
pub fn starfield(count: usize, rng: &mut impl Rng) -> Vec<BackgroundElement> {
    (0..count).map(|_| BackgroundElement::random(rng)).collect()
}

/// A single explosion fragment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub radius: f32,
}

/// Shape of a particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstSpec {
    pub color: Rgb,
    pub count: usize,
    pub min_radius: u32,
    pub max_radius: u32,
    pub max_speed: f32,
}

impl BurstSpec {
    /// Big red blast when the player hits an obstacle
    pub const CRASH: BurstSpec = BurstSpec {
        color: colors::RED,
        count: 30,
        min_radius: 1,
        max_radius: 8,
        max_speed: 5.0,
    };

    /// Small puff when a power-up is collected
    pub fn pickup(kind: ObjectKind) -> BurstSpec {
        let color = match kind {
            ObjectKind::Danger => colors::RED,
            ObjectKind::Shrink => colors::GREEN,
            ObjectKind::Grow => colors::PURPLE,
        };
        BurstSpec {
            color,
            count: 15,
            min_radius: 1,
            max_radius: 6,
            max_speed: 5.0,
        }
    }
}

/// A group of fragments that dies once every fragment has shrunk away
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub fragments: Vec<Fragment>,
}

impl ParticleBurst {
    pub fn new(center: Vec2, spec: &BurstSpec, count: usize, rng: &mut impl Rng) -> Self {
        let fragments = (0..count)
            .map(|_| Fragment {
                pos: center,
                vel: Vec2::new(
                    rng.random_range(-spec.max_speed..=spec.max_speed),
                    rng.random_range(-spec.max_speed..=spec.max_speed),
                ),
                color: spec.color,
                radius: rng.random_range(spec.min_radius..=spec.max_radius) as f32,
            })
            .collect();
        Self { fragments }
    }

    pub fn update(&mut self) {
        for f in &mut self.fragments {
            f.pos += f.vel;
            f.radius -= FRAGMENT_SHRINK;
        }
        self.fragments.retain(|f| f.radius > 0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// How the session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    /// Hit an obstacle; the run is over
    Crashed,
}

/// Things that happened during a tick, for logging and the screen layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Spawned { kind: ObjectKind, id: u32 },
    Collected { kind: ObjectKind, id: u32 },
    Crashed { score: u64 },
}

/// One play session, from the first frame to the crash
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    pub game_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub outcome: Outcome,
    pub player: Player,
    pub objects: Vec<TunnelObject>,
    pub background: Vec<BackgroundElement>,
    pub bursts: Vec<ParticleBurst>,
    pub spawner: SpawnScheduler,
    /// Screen shake ends at this clock time (ms)
    pub shake_until_ms: Option<u64>,
    /// Upper bound on live fragments across all bursts
    pub fragment_budget: usize,
    next_id: u32,
}

impl Session {
    /// Fresh session started at `now_ms`
    pub fn new(seed: u64, now_ms: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let background = starfield(SESSION_BACKGROUND_COUNT, &mut rng);
        Self {
            seed,
            rng,
            score: 0,
            game_speed: START_GAME_SPEED,
            time_ticks: 0,
            outcome: Outcome::Running,
            player: Player::default(),
            objects: Vec::new(),
            background,
            bursts: Vec::new(),
            spawner: SpawnScheduler::armed(now_ms, FIRST_SPAWN_DELAY_MS),
            shake_until_ms: None,
            fragment_budget: usize::MAX,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.outcome == Outcome::Crashed
    }

    pub fn live_fragments(&self) -> usize {
        self.bursts.iter().map(|b| b.fragments.len()).sum()
    }

    /// Emit a particle burst, trimmed to the remaining fragment budget
    pub fn spawn_burst(&mut self, center: Vec2, spec: &BurstSpec) {
        let room = self.fragment_budget.saturating_sub(self.live_fragments());
        let count = spec.count.min(room);
        if count == 0 {
            return;
        }
        let burst = ParticleBurst::new(center, spec, count, &mut self.rng);
        self.bursts.push(burst);
    }

    pub fn start_shake(&mut self, now_ms: u64, duration_ms: u64) {
        self.shake_until_ms = Some(now_ms + duration_ms);
    }

    pub fn is_shaking(&self, now_ms: u64) -> bool {
        self.shake_until_ms.is_some_and(|until| now_ms < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_follows_effect() {
        assert_eq!(Effect::None.multiplier(), 1);
        assert_eq!(Effect::Shrink.multiplier(), 1);
        assert_eq!(Effect::Grow.multiplier(), 2);
    }

    #[test]
    fn test_effect_expires_strictly_after_duration() {
        let mut player = Player::default();
        player.apply_effect(Effect::Grow, 1000);
        assert_eq!(player.multiplier(), 2);
        assert_eq!(player.rect.w, PLAYER_SIZE_BIG);

        player.update(false, false, 1000 + EFFECT_DURATION_MS);
        assert_eq!(player.effect, Effect::Grow);

        player.update(false, false, 1000 + EFFECT_DURATION_MS + 1);
        assert_eq!(player.effect, Effect::None);
        assert_eq!(player.multiplier(), 1);
        assert_eq!(player.rect.w, PLAYER_SIZE_NORMAL);
    }

    #[test]
    fn test_player_stays_on_screen() {
        let mut player = Player::default();
        for _ in 0..200 {
            player.update(true, false, 0);
        }
        assert_eq!(player.rect.left(), 0.0);
        for _ in 0..200 {
            player.update(false, true, 0);
        }
        assert_eq!(player.rect.right(), SCREEN_WIDTH);
    }

    #[test]
    fn test_effect_countdown() {
        let mut player = Player::default();
        assert_eq!(player.effect_seconds_left(0), None);
        player.apply_effect(Effect::Shrink, 0);
        assert_eq!(player.effect_seconds_left(0), Some(6));
        assert_eq!(player.effect_seconds_left(4500), Some(1));
    }

    #[test]
    fn test_background_wraps_to_bottom() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut star = BackgroundElement::random(&mut rng);
        star.rect.y = -10.0;
        star.update(&mut rng);
        assert_eq!(star.rect.y, SCREEN_HEIGHT);
        assert!((1.0..6.0).contains(&star.speed));
    }

    #[test]
    fn test_burst_dies_out() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut burst = ParticleBurst::new(Vec2::ZERO, &BurstSpec::CRASH, 30, &mut rng);
        assert_eq!(burst.fragments.len(), 30);
        // Max radius 8 shrinks 0.1 per tick
        for _ in 0..90 {
            burst.update();
        }
        assert!(burst.is_finished());
    }

    #[test]
    fn test_fragment_budget_caps_bursts() {
        let mut session = Session::new(1, 0);
        session.fragment_budget = 20;
        session.spawn_burst(Vec2::ZERO, &BurstSpec::CRASH);
        assert_eq!(session.live_fragments(), 20);
        session.spawn_burst(Vec2::ZERO, &BurstSpec::pickup(ObjectKind::Grow));
        assert_eq!(session.bursts.len(), 1);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(42, 500);
        assert_eq!(session.score, 0);
        assert_eq!(session.game_speed, START_GAME_SPEED);
        assert_eq!(session.background.len(), SESSION_BACKGROUND_COUNT);
        assert!(session.objects.is_empty());
        assert_eq!(session.spawner.next_fire_ms(), 500 + FIRST_SPAWN_DELAY_MS);
    }
}
