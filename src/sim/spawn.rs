//! Phase-driven spawn scheduling
//!
//! A single re-arming deadline. Each firing picks an object kind from the
//! phase's weights, spawns it below the screen, and re-arms with a fresh
//! interval drawn from the phase's range.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::phase::{Phase, phase};
use super::rect::Rect;
use super::state::{GameEvent, ObjectKind, Session, TunnelObject};
use crate::consts::*;

/// Unnormalized spawn weights per object kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindWeights {
    pub danger: f32,
    pub shrink: f32,
    pub grow: f32,
}

impl KindWeights {
    pub const fn new(danger: f32, shrink: f32, grow: f32) -> Self {
        Self {
            danger,
            shrink,
            grow,
        }
    }

    /// Scale so the weights sum to 1
    pub fn normalized(&self) -> Self {
        let total = self.danger + self.shrink + self.grow;
        debug_assert!(total > 0.0, "spawn weights must not sum to zero");
        Self::new(self.danger / total, self.shrink / total, self.grow / total)
    }

    /// Pick a kind from a uniform sample `r` in [0, 1)
    pub fn select(&self, r: f32) -> ObjectKind {
        let w = self.normalized();
        if r < w.danger {
            ObjectKind::Danger
        } else if r < w.danger + w.shrink {
            ObjectKind::Shrink
        } else {
            ObjectKind::Grow
        }
    }

    pub fn weight(&self, kind: ObjectKind) -> f32 {
        match kind {
            ObjectKind::Danger => self.danger,
            ObjectKind::Shrink => self.shrink,
            ObjectKind::Grow => self.grow,
        }
    }
}

/// Per-phase spawn tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnParams {
    /// Delay until the next spawn (ms), sampled on every firing
    pub interval_ms: RangeInclusive<u64>,
    pub weights: KindWeights,
}

impl SpawnParams {
    /// Midpoint of the interval range
    pub fn mean_interval_ms(&self) -> f32 {
        (*self.interval_ms.start() + *self.interval_ms.end()) as f32 / 2.0
    }
}

impl Phase {
    pub fn spawn_params(self) -> SpawnParams {
        match self {
            Phase::One => SpawnParams {
                interval_ms: 800..=1000,
                weights: KindWeights::new(0.60, 0.30, 0.10),
            },
            Phase::Two => SpawnParams {
                interval_ms: 450..=700,
                weights: KindWeights::new(0.75, 0.20, 0.05),
            },
            Phase::Three => SpawnParams {
                interval_ms: 200..=450,
                weights: KindWeights::new(0.90, 0.08, 0.02),
            },
        }
    }
}

/// Next-fire deadline for the spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    next_fire_ms: u64,
}

impl SpawnScheduler {
    /// Timer that first fires `delay_ms` after `now_ms`
    pub fn armed(now_ms: u64, delay_ms: u64) -> Self {
        Self {
            next_fire_ms: now_ms + delay_ms,
        }
    }

    pub fn next_fire_ms(&self) -> u64 {
        self.next_fire_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_fire_ms
    }

    pub fn rearm(&mut self, now_ms: u64, delay_ms: u64) {
        self.next_fire_ms = now_ms + delay_ms;
    }
}

/// Build a new object of `kind` just below the bottom of the screen
pub fn make_object(id: u32, kind: ObjectKind, speed: f32, rng: &mut impl Rng) -> TunnelObject {
    let (w, h) = kind.roll_size(rng);
    let max_x = (SCREEN_WIDTH - w).max(0.0) as u32;
    let x = rng.random_range(0..=max_x) as f32;
    let y = SCREEN_HEIGHT + rng.random_range(20..=150) as f32;
    TunnelObject {
        id,
        kind,
        rect: Rect::new(x, y, w, h),
        speed,
    }
}

/// Fire the spawn timer if its deadline has passed
pub fn spawn_if_due(state: &mut Session, now_ms: u64) -> Option<GameEvent> {
    if !state.spawner.is_due(now_ms) {
        return None;
    }

    let params = phase(state.score).spawn_params();
    let r: f32 = state.rng.random();
    let kind = params.weights.select(r);

    let id = state.next_entity_id();
    let object = make_object(id, kind, state.game_speed, &mut state.rng);
    log::debug!(
        "spawn #{} {:?} at x={} speed={:.3}",
        id,
        kind,
        object.rect.x,
        object.speed
    );
    state.objects.push(object);

    let interval = state.rng.random_range(params.interval_ms);
    state.spawner.rearm(now_ms, interval);

    Some(GameEvent::Spawned { kind, id })
}
