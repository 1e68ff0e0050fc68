//! Simulation module
//!
//! All gameplay logic lives here:
//! - Clock time is passed in once per frame (deadlines, not callbacks)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod phase;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{overlapping_objects, resolve_collisions};
pub use phase::{Phase, background_color, lerp_color, phase};
pub use rect::Rect;
pub use spawn::{KindWeights, SpawnParams, SpawnScheduler, make_object, spawn_if_due};
pub use state::{
    BackgroundElement, BurstSpec, Effect, Fragment, GameEvent, ObjectKind, Outcome,
    ParticleBurst, Player, Session, SizeClass, TunnelObject, starfield,
};
pub use tick::{TickInput, score_gain, tick};
