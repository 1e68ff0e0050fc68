//! Per-frame simulation tick
//!
//! Advances a running session by one frame. The clock is read once per
//! frame by the caller and passed in as `now_ms`.

use super::collision::resolve_collisions;
use super::spawn::spawn_if_due;
use super::state::{GameEvent, Session};
use crate::consts::GAME_SPEED_INCREMENT;

/// Held input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    pub const LEFT: Self = Self {
        left: true,
        right: false,
    };
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
    };
}

/// Advance the session by one frame
pub fn tick(state: &mut Session, input: &TickInput, now_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Game over freezes the simulation
    if state.is_over() {
        return events;
    }

    // Timers first, as if their events were queued ahead of this frame
    events.extend(spawn_if_due(state, now_ms));
    if state.shake_until_ms.is_some_and(|until| now_ms >= until) {
        state.shake_until_ms = None;
    }

    state.time_ticks += 1;

    state.player.update(input.left, input.right, now_ms);

    for object in &mut state.objects {
        object.update();
    }
    state.objects.retain(|o| !o.is_gone());

    let Session {
        background, rng, ..
    } = &mut *state;
    for star in background.iter_mut() {
        star.update(rng);
    }

    for burst in &mut state.bursts {
        burst.update();
    }
    state.bursts.retain(|b| !b.is_finished());

    state.game_speed += GAME_SPEED_INCREMENT;
    state.score += score_gain(state.player.multiplier(), state.game_speed);

    events.extend(resolve_collisions(state, now_ms));

    events
}

/// Points earned this tick: floor(multiplier * speed / 4)
pub fn score_gain(multiplier: u32, game_speed: f32) -> u64 {
    (multiplier as f32 * (game_speed / 4.0)).max(0.0) as u64
}
