//! Score-driven difficulty phases
//!
//! Phase is recomputed from the score every frame. Score never decreases
//! within a session, so the phase only moves forward.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Score at which phase 2 begins
pub const PHASE_2_SCORE: u64 = 2500;
/// Score at which phase 3 begins
pub const PHASE_3_SCORE: u64 = 8000;
/// Score span over which the phase 3 gradient runs before it stops changing
pub const PHASE_3_GRADIENT_SPAN: u64 = 3000;

/// Difficulty phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    One,
    Two,
    Three,
}

/// Map a score to its phase
pub fn phase(score: u64) -> Phase {
    if score < PHASE_2_SCORE {
        Phase::One
    } else if score < PHASE_3_SCORE {
        Phase::Two
    } else {
        Phase::Three
    }
}

impl Phase {
    /// 1-based phase number for the HUD
    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
        }
    }

    /// Background gradient endpoints. Each phase starts where the previous
    /// one ends so the tunnel colour never jumps at a boundary.
    pub fn gradient(self) -> (Rgb, Rgb) {
        match self {
            Phase::One => (Rgb(20, 0, 40), Rgb(0, 10, 40)),
            Phase::Two => (Rgb(0, 10, 40), Rgb(60, 0, 40)),
            Phase::Three => (Rgb(60, 0, 40), Rgb(120, 20, 80)),
        }
    }

    /// Interpolation fraction through this phase's gradient, in [0, 1]
    pub fn progress(self, score: u64) -> f32 {
        let t = match self {
            Phase::One => score as f32 / PHASE_2_SCORE as f32,
            Phase::Two => {
                score.saturating_sub(PHASE_2_SCORE) as f32
                    / (PHASE_3_SCORE - PHASE_2_SCORE) as f32
            }
            Phase::Three => {
                score.saturating_sub(PHASE_3_SCORE) as f32 / PHASE_3_GRADIENT_SPAN as f32
            }
        };
        t.min(1.0)
    }
}

/// Per-channel linear interpolation, truncating toward zero
pub fn lerp_color(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Tunnel background colour for the given score
pub fn background_color(score: u64) -> Rgb {
    let phase = phase(score);
    let (start, end) = phase.gradient();
    lerp_color(start, end, phase.progress(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(phase(0), Phase::One);
        assert_eq!(phase(2499), Phase::One);
        assert_eq!(phase(2500), Phase::Two);
        assert_eq!(phase(7999), Phase::Two);
        assert_eq!(phase(8000), Phase::Three);
        assert_eq!(phase(u64::MAX), Phase::Three);
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(background_color(0), Rgb(20, 0, 40));
        assert_eq!(background_color(2500), Rgb(0, 10, 40));
        assert_eq!(background_color(8000), Rgb(60, 0, 40));
        assert_eq!(background_color(11_000), Rgb(120, 20, 80));
    }

    #[test]
    fn test_phase_3_color_is_capped() {
        assert_eq!(background_color(11_000), background_color(50_000));
        assert_eq!(Phase::Three.progress(1_000_000), 1.0);
    }

    #[test]
    fn test_lerp_truncates() {
        // 20 + (40 - 20) * 0.99 = 39.8 -> 39
        assert_eq!(lerp_color(Rgb(20, 0, 0), Rgb(40, 0, 0), 0.99).0, 39);
        // 20 + (0 - 20) * 0.99 = 0.2 -> 0
        assert_eq!(lerp_color(Rgb(20, 0, 0), Rgb(0, 0, 0), 0.99).0, 0);
    }

    fn channel_delta(a: Rgb, b: Rgb) -> u8 {
        a.0.abs_diff(b.0).max(a.1.abs_diff(b.1)).max(a.2.abs_diff(b.2))
    }

    #[test]
    fn test_color_continuous_across_boundaries() {
        for boundary in [PHASE_2_SCORE, PHASE_3_SCORE] {
            let before = background_color(boundary - 1);
            let after = background_color(boundary);
            assert!(
                channel_delta(before, after) <= 1,
                "jump at {boundary}: {before:?} -> {after:?}"
            );
        }
    }

    proptest! {
        #[test]
        fn phase_is_monotonic(a in 0u64..20_000, b in 0u64..20_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(phase(lo) <= phase(hi));
            prop_assert!((1..=3).contains(&phase(lo).number()));
        }

        #[test]
        fn color_moves_at_most_one_step_per_point(score in 0u64..15_000) {
            let delta = channel_delta(background_color(score), background_color(score + 1));
            prop_assert!(delta <= 1);
        }
    }
}
