//! Player vs tunnel object collision and effect resolution
//!
//! Every overlapping object applies its policy in the same tick. A danger
//! hit ends the session no matter what else was hit alongside it.

use super::state::{BurstSpec, GameEvent, ObjectKind, Outcome, Session};
use crate::consts::SHAKE_DURATION_MS;

/// IDs of live objects whose bounds overlap the player
pub fn overlapping_objects(state: &Session) -> Vec<u32> {
    let player = state.player.rect;
    state
        .objects
        .iter()
        .filter(|o| o.rect.overlaps(&player))
        .map(|o| o.id)
        .collect()
}

/// Apply every collision the player is currently involved in
pub fn resolve_collisions(state: &mut Session, now_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for id in overlapping_objects(state) {
        let Some(index) = state.objects.iter().position(|o| o.id == id) else {
            continue;
        };
        let object = &state.objects[index];
        let (kind, center) = (object.kind, object.rect.center());

        match kind {
            ObjectKind::Danger => {
                let player_center = state.player.rect.center();
                state.spawn_burst(player_center, &BurstSpec::CRASH);
                state.start_shake(now_ms, SHAKE_DURATION_MS);
                state.outcome = Outcome::Crashed;
                events.push(GameEvent::Crashed { score: state.score });
            }
            ObjectKind::Shrink | ObjectKind::Grow => {
                if let Some(effect) = kind.effect() {
                    state.player.apply_effect(effect, now_ms);
                }
                state.spawn_burst(center, &BurstSpec::pickup(kind));
                state.objects.swap_remove(index);
                log::debug!("collected {:?} #{}", kind, id);
                events.push(GameEvent::Collected { kind, id });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Effect, TunnelObject};

    fn object_on_player(state: &mut Session, kind: ObjectKind) -> u32 {
        let id = state.next_entity_id();
        let center = state.player.rect.center();
        state.objects.push(TunnelObject {
            id,
            kind,
            rect: Rect::from_center(center, 20.0, 20.0),
            speed: 4.0,
        });
        id
    }

    #[test]
    fn test_grow_pickup() {
        let mut state = Session::new(1, 0);
        object_on_player(&mut state, ObjectKind::Grow);

        let events = resolve_collisions(&mut state, 100);
        assert_eq!(events.len(), 1);
        assert!(state.objects.is_empty());
        assert_eq!(state.player.effect, Effect::Grow);
        assert_eq!(state.player.multiplier(), 2);
        assert_eq!(state.player.rect.w, PLAYER_SIZE_BIG);
        assert_eq!(state.bursts.len(), 1);
        assert_eq!(state.bursts[0].fragments.len(), 15);
        assert_eq!(state.outcome, Outcome::Running);
    }

    #[test]
    fn test_shrink_restarts_effect_timer() {
        let mut state = Session::new(1, 0);
        state.player.apply_effect(Effect::Grow, 0);
        object_on_player(&mut state, ObjectKind::Shrink);

        resolve_collisions(&mut state, 2000);
        assert_eq!(state.player.effect, Effect::Shrink);
        assert_eq!(state.player.effect_started_ms, 2000);
        assert_eq!(state.player.multiplier(), 1);
    }

    #[test]
    fn test_danger_ends_session() {
        let mut state = Session::new(1, 0);
        state.score = 321;
        let id = object_on_player(&mut state, ObjectKind::Danger);

        let events = resolve_collisions(&mut state, 50);
        assert_eq!(events, vec![GameEvent::Crashed { score: 321 }]);
        assert_eq!(state.outcome, Outcome::Crashed);
        assert!(state.objects.iter().any(|o| o.id == id));
        assert_eq!(state.bursts[0].fragments.len(), 30);
        assert!(state.is_shaking(50 + SHAKE_DURATION_MS - 1));
        assert!(!state.is_shaking(50 + SHAKE_DURATION_MS));
    }

    #[test]
    fn test_simultaneous_hits_all_apply() {
        let mut state = Session::new(1, 0);
        object_on_player(&mut state, ObjectKind::Grow);
        object_on_player(&mut state, ObjectKind::Danger);

        let events = resolve_collisions(&mut state, 10);
        assert_eq!(events.len(), 2);
        assert_eq!(state.player.effect, Effect::Grow);
        assert!(state.is_over());
    }

    #[test]
    fn test_distant_object_ignored() {
        let mut state = Session::new(1, 0);
        let id = state.next_entity_id();
        state.objects.push(TunnelObject {
            id,
            kind: ObjectKind::Danger,
            rect: Rect::new(0.0, SCREEN_HEIGHT - 30.0, 40.0, 20.0),
            speed: 4.0,
        });
        assert!(resolve_collisions(&mut state, 0).is_empty());
        assert_eq!(state.outcome, Outcome::Running);
    }
}
