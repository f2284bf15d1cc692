//! Fixed timestep simulation tick
//!
//! Per tick: invincibility expiry, input resolution, integration, boundary
//! clamping, contact resolution, knockback commit, win check. The tick never
//! touches rendering or audio; it returns events for the adapter layer.

use serde::Serialize;

use super::ai::Opponent;
use super::collision::{actors_touch, can_stomp, push_directions};
use super::input::{Intent, KeySet};
use super::state::{Actor, Boundaries, Controller, MatchPhase, MatchState, Side};
use crate::tuning::Tuning;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys held at tick start
    pub keys: KeySet,
    /// Wall-clock time in milliseconds (drives cooldown and invincibility)
    pub now_ms: u64,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    /// Actor left the ground
    Jump { side: Side },
    /// Actor touched the ground after being airborne
    Landed { side: Side },
    /// `attacker` landed on `target`
    Stomp {
        attacker: Side,
        target: Side,
        damage: u8,
        health: u8,
    },
    /// Horizontal separation impulse (signed, px/tick)
    Knockback { side: Side, impulse: f32 },
    /// Invincibility window elapsed
    Recovered { side: Side },
    /// Health ran out
    MatchEnded { winner: Side },
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Only a running match advances
    if state.phase != MatchPhase::Running {
        return events;
    }

    state.time_ticks += 1;
    let now = input.now_ms;

    let MatchState {
        players,
        bounds,
        tuning,
        rng,
        phase,
        ..
    } = state;

    // --- INVINCIBILITY EXPIRY ---
    for actor in players.iter_mut() {
        if actor.invincible_until_ms.is_some_and(|until| now >= until) {
            actor.invincible_until_ms = None;
            events.push(GameEvent::Recovered { side: actor.side });
        }
    }

    // --- INPUT RESOLUTION ---
    let opponents = [Opponent::of(&players[1]), Opponent::of(&players[0])];
    for (idx, actor) in players.iter_mut().enumerate() {
        let intent = match &mut actor.controller {
            Controller::Human => actor.controls.intent(&input.keys),
            Controller::Ai(brain) => {
                brain.think(actor.pos, actor.airborne, &opponents[idx], bounds, &mut *rng)
            }
        };
        if apply_intent(actor, intent, tuning) {
            log::debug!("{:?} jumped", actor.side);
            events.push(GameEvent::Jump { side: actor.side });
        }
    }

    // --- INTEGRATION + CLAMPING ---
    for actor in players.iter_mut() {
        if integrate(actor, bounds, tuning) {
            events.push(GameEvent::Landed { side: actor.side });
        }
    }

    // --- CONTACT ---
    let [p1, p2] = players;
    resolve_contact(p1, p2, now, bounds, tuning, &mut events);

    // --- WIN CHECK ---
    // P1 is checked first, so a simultaneous knockout goes to P2
    let winner = if !p1.is_alive() {
        Some(Side::P2)
    } else if !p2.is_alive() {
        Some(Side::P1)
    } else {
        None
    };
    if let Some(winner) = winner {
        *phase = MatchPhase::Ended { winner };
        log::info!("{} wins", winner.character().display_name());
        events.push(GameEvent::MatchEnded { winner });
    }

    events
}

/// Set horizontal velocity and apply a jump. Returns true if the actor jumped.
///
/// Left is evaluated before right, so right wins when both are held.
fn apply_intent(actor: &mut Actor, intent: Intent, tuning: &Tuning) -> bool {
    actor.vel.x = 0.0;
    if intent.left {
        actor.vel.x = -tuning.movement_speed;
        actor.facing_right = false;
    }
    if intent.right {
        actor.vel.x = tuning.movement_speed;
        actor.facing_right = true;
    }

    if intent.jump && !actor.airborne {
        actor.vel.y = -tuning.jump_power;
        actor.airborne = true;
        return true;
    }
    false
}

/// Gravity, position update and boundary clamping. Returns true on landing.
fn integrate(actor: &mut Actor, bounds: &Boundaries, tuning: &Tuning) -> bool {
    actor.vel.y += tuning.gravity;
    actor.pos += actor.vel;

    clamp_horizontal(actor, bounds);

    let mut landed = false;
    if actor.pos.y > bounds.bottom {
        actor.pos.y = bounds.bottom;
        actor.vel.y = 0.0;
        landed = actor.airborne;
        actor.airborne = false;
    }

    // Keep part of the sprite on screen at the top of a jump
    let ceiling = bounds.ceiling_for(actor.size.y, tuning.ceiling_visible_fraction);
    if actor.pos.y < ceiling {
        actor.pos.y = ceiling;
        actor.vel.y = 0.0;
    }

    landed
}

fn clamp_horizontal(actor: &mut Actor, bounds: &Boundaries) {
    if actor.pos.x < bounds.left {
        actor.pos.x = bounds.left;
    }
    if actor.pos.x + actor.size.x > bounds.right {
        actor.pos.x = bounds.right - actor.size.x;
    }
}

/// Stomp or shove when the hit-boxes overlap
fn resolve_contact(
    p1: &mut Actor,
    p2: &mut Actor,
    now: u64,
    bounds: &Boundaries,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    if !actors_touch(p1, p2, tuning) {
        return;
    }

    if can_stomp(p1, p2, now, tuning) {
        stomp(p1, p2, now, tuning, events);
        knockback(p1, p2, bounds, tuning, events);
    } else if can_stomp(p2, p1, now, tuning) {
        stomp(p2, p1, now, tuning, events);
        knockback(p2, p1, bounds, tuning, events);
    } else if p1.vel.x != 0.0 || p2.vel.x != 0.0 {
        knockback(p1, p2, bounds, tuning, events);
    }
}

fn stomp(attacker: &mut Actor, target: &mut Actor, now: u64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    target.health = target.health.saturating_sub(tuning.stomp_damage);
    target.invincible_until_ms = Some(now.saturating_add(tuning.invincibility_ms));
    attacker.vel.y = tuning.stomp_bounce();
    attacker.last_stomp_ms = Some(now);

    log::debug!(
        "{:?} stomped {:?}, health now {}",
        attacker.side,
        target.side,
        target.health
    );
    events.push(GameEvent::Stomp {
        attacker: attacker.side,
        target: target.side,
        damage: tuning.stomp_damage,
        health: target.health,
    });
}

/// Push the pair apart and commit the displacement immediately
fn knockback(
    first: &mut Actor,
    second: &mut Actor,
    bounds: &Boundaries,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let (first_dir, second_dir) = push_directions(first, second);
    for (actor, dir) in [(first, first_dir), (second, second_dir)] {
        let impulse = dir * tuning.repulsion_force;
        actor.vel.x = impulse;
        actor.pos.x += impulse;
        clamp_horizontal(actor, bounds);
        events.push(GameEvent::Knockback {
            side: actor.side,
            impulse,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameMode;
    use glam::Vec2;

    fn running_match() -> MatchState {
        let mut state = MatchState::with_viewport(800.0, 600.0, 12345);
        state.start(GameMode::TwoPlayer);
        state
    }

    fn at(now_ms: u64) -> TickInput {
        TickInput {
            keys: KeySet::new(),
            now_ms,
        }
    }

    fn held(keys: &[&str], now_ms: u64) -> TickInput {
        TickInput {
            keys: KeySet::from_keys(keys.iter().copied()),
            now_ms,
        }
    }

    /// P1 airborne just above P2, both at the same x, about to overlap
    fn stomp_setup(state: &mut MatchState) {
        let p1 = state.player_mut(Side::P1);
        p1.pos = Vec2::new(300.0, 420.0);
        p1.vel = Vec2::new(0.0, 5.0);
        p1.airborne = true;
        let p2 = state.player_mut(Side::P2);
        p2.pos = Vec2::new(300.0, 480.0);
        p2.vel = Vec2::ZERO;
        p2.airborne = false;
    }

    #[test]
    fn test_no_tick_unless_running() {
        let mut state = MatchState::with_viewport(800.0, 600.0, 1);
        let before = state.player(Side::P1).pos;
        let events = tick(&mut state, &at(0));
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player(Side::P1).pos, before);
    }

    #[test]
    fn test_spawned_actors_fall_to_ground() {
        let mut state = running_match();
        for t in 0..30 {
            tick(&mut state, &at(t * 16));
        }
        for side in Side::BOTH {
            assert_eq!(state.player(side).pos.y, state.bounds.bottom);
            assert_eq!(state.player(side).vel.y, 0.0);
            assert!(!state.player(side).airborne);
        }
    }

    #[test]
    fn test_horizontal_movement() {
        let mut state = running_match();
        let x = state.player(Side::P1).pos.x;
        tick(&mut state, &held(&["ArrowLeft"], 16));
        assert_eq!(state.player(Side::P1).pos.x, x - 4.0);
        assert!(!state.player(Side::P1).facing_right);

        // Both held: right is evaluated last and wins
        let x = state.player(Side::P1).pos.x;
        tick(&mut state, &held(&["ArrowLeft", "ArrowRight"], 32));
        assert_eq!(state.player(Side::P1).pos.x, x + 4.0);
        assert!(state.player(Side::P1).facing_right);

        // Released: velocity resets
        tick(&mut state, &at(48));
        assert_eq!(state.player(Side::P1).vel.x, 0.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = running_match();
        for t in 0..30 {
            tick(&mut state, &at(t * 16));
        }

        let events = tick(&mut state, &held(&["w"], 500));
        assert!(events.contains(&GameEvent::Jump { side: Side::P2 }));
        let p2 = state.player(Side::P2);
        assert!(p2.airborne);
        // -20 + gravity
        assert_eq!(p2.vel.y, -19.0);
        assert_eq!(p2.pos.y, state.bounds.bottom - 19.0);

        // Holding up mid-air does not re-jump
        let events = tick(&mut state, &held(&["w"], 516));
        assert!(!events.contains(&GameEvent::Jump { side: Side::P2 }));
        assert_eq!(state.player(Side::P2).vel.y, -18.0);
    }

    #[test]
    fn test_landing_event() {
        let mut state = running_match();
        for t in 0..30 {
            tick(&mut state, &at(t * 16));
        }
        tick(&mut state, &held(&["arrowup"], 500));
        let mut landed = false;
        for t in 0..60 {
            let events = tick(&mut state, &at(516 + t * 16));
            if events.contains(&GameEvent::Landed { side: Side::P1 }) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(!state.player(Side::P1).airborne);
    }

    #[test]
    fn test_clamped_to_walls() {
        let mut state = running_match();
        state.player_mut(Side::P2).pos.x = 2.0;
        tick(&mut state, &held(&["a"], 16));
        assert_eq!(state.player(Side::P2).pos.x, 0.0);

        state.player_mut(Side::P1).pos.x = 698.0;
        tick(&mut state, &held(&["arrowright"], 32));
        assert_eq!(state.player(Side::P1).pos.x, 700.0);
    }

    #[test]
    fn test_ceiling_clamp() {
        let mut state = running_match();
        let p1 = state.player_mut(Side::P1);
        p1.pos.y = -50.0;
        p1.vel.y = -30.0;
        p1.airborne = true;
        tick(&mut state, &at(16));
        let ceiling = state.bounds.ceiling_for(100.0, 0.6);
        assert_eq!(state.player(Side::P1).pos.y, ceiling);
        assert_eq!(state.player(Side::P1).vel.y, 0.0);
    }

    #[test]
    fn test_tiny_viewport_keeps_actors_on_ground() {
        let mut state = MatchState::with_viewport(800.0, 50.0, 1);
        state.start(GameMode::TwoPlayer);
        for t in 0..10 {
            tick(&mut state, &held(&["ArrowUp", "w"], t * 16));
            for side in Side::BOTH {
                assert!(state.player(side).pos.y <= state.bounds.bottom);
            }
        }
    }

    #[test]
    fn test_invincibility_deadline_saturates() {
        let mut state = running_match();
        stomp_setup(&mut state);
        tick(&mut state, &at(u64::MAX - 10));
        assert_eq!(state.player(Side::P2).health, 95);
        assert_eq!(state.player(Side::P2).invincible_until_ms, Some(u64::MAX));
    }

    #[test]
    fn test_stomp_damages_and_bounces() {
        let mut state = running_match();
        stomp_setup(&mut state);

        let events = tick(&mut state, &at(1000));
        assert!(events.contains(&GameEvent::Stomp {
            attacker: Side::P1,
            target: Side::P2,
            damage: 5,
            health: 95,
        }));

        let p1 = state.player(Side::P1);
        let p2 = state.player(Side::P2);
        assert_eq!(p2.health, 95);
        assert!(p2.is_invincible());
        assert_eq!(p2.invincible_until_ms, Some(2000));
        assert!((p1.vel.y - (-14.0)).abs() < 1e-4);
        assert_eq!(p1.last_stomp_ms, Some(1000));

        // Equal x: attacker pushed left, target right, committed at once
        assert_eq!(p1.vel.x, -33.0);
        assert_eq!(p2.vel.x, 33.0);
        assert_eq!(p1.pos.x, 267.0);
        assert_eq!(p2.pos.x, 333.0);
    }

    #[test]
    fn test_invincibility_blocks_damage_until_expiry() {
        let mut state = running_match();
        stomp_setup(&mut state);
        tick(&mut state, &at(1000));
        assert_eq!(state.player(Side::P2).health, 95);

        // Another attacker-ready stomp inside the window does nothing
        stomp_setup(&mut state);
        state.player_mut(Side::P1).last_stomp_ms = None;
        let events = tick(&mut state, &at(1999));
        assert_eq!(state.player(Side::P2).health, 95);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Stomp { .. })));

        // Window over: recovered and damageable again
        stomp_setup(&mut state);
        state.player_mut(Side::P1).last_stomp_ms = None;
        let events = tick(&mut state, &at(2000));
        assert!(events.contains(&GameEvent::Recovered { side: Side::P2 }));
        assert_eq!(state.player(Side::P2).health, 90);
    }

    #[test]
    fn test_stomp_cooldown_applies_to_attacker() {
        let mut state = running_match();
        stomp_setup(&mut state);
        tick(&mut state, &at(1000));

        // Target vulnerable again but attacker still on cooldown at 1800
        stomp_setup(&mut state);
        state.player_mut(Side::P2).invincible_until_ms = None;
        tick(&mut state, &at(1800));
        assert_eq!(state.player(Side::P2).health, 95);

        stomp_setup(&mut state);
        state.player_mut(Side::P2).invincible_until_ms = None;
        tick(&mut state, &at(1801));
        assert_eq!(state.player(Side::P2).health, 90);
    }

    #[test]
    fn test_grounded_contact_shoves_without_damage() {
        let mut state = running_match();
        for t in 0..30 {
            tick(&mut state, &at(t * 16));
        }
        state.player_mut(Side::P1).pos.x = 360.0;
        state.player_mut(Side::P2).pos.x = 300.0;

        // P1 walks left into P2
        let events = tick(&mut state, &held(&["arrowleft"], 600));
        assert!(events.contains(&GameEvent::Knockback {
            side: Side::P1,
            impulse: 33.0
        }));
        assert!(events.contains(&GameEvent::Knockback {
            side: Side::P2,
            impulse: -33.0
        }));
        assert_eq!(state.player(Side::P1).health, 100);
        assert_eq!(state.player(Side::P2).health, 100);
        assert_eq!(state.player(Side::P1).pos.x, 356.0 + 33.0);
        assert_eq!(state.player(Side::P2).pos.x, 300.0 - 33.0);
    }

    #[test]
    fn test_idle_contact_is_ignored() {
        let mut state = running_match();
        for t in 0..30 {
            tick(&mut state, &at(t * 16));
        }
        state.player_mut(Side::P1).pos.x = 340.0;
        state.player_mut(Side::P2).pos.x = 300.0;
        let events = tick(&mut state, &at(600));
        assert!(events.is_empty());
        assert_eq!(state.player(Side::P1).pos.x, 340.0);
    }

    #[test]
    fn test_match_ends_on_knockout() {
        let mut state = running_match();
        stomp_setup(&mut state);
        state.player_mut(Side::P2).health = 5;

        let events = tick(&mut state, &at(1000));
        assert_eq!(state.player(Side::P2).health, 0);
        assert!(events.contains(&GameEvent::MatchEnded { winner: Side::P1 }));
        assert_eq!(state.winner(), Some(Side::P1));

        // Ended matches do not advance
        let ticks = state.time_ticks;
        assert!(tick(&mut state, &held(&["arrowleft"], 1016)).is_empty());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_simultaneous_knockout_goes_to_p2() {
        let mut state = running_match();
        state.player_mut(Side::P1).health = 0;
        state.player_mut(Side::P2).health = 0;
        let events = tick(&mut state, &at(16));
        assert!(events.contains(&GameEvent::MatchEnded { winner: Side::P2 }));
    }

    #[test]
    fn test_determinism_with_ai() {
        let mut a = MatchState::with_viewport(800.0, 600.0, 99999);
        let mut b = MatchState::with_viewport(800.0, 600.0, 99999);
        a.start(GameMode::Demo);
        b.start(GameMode::Demo);

        for t in 0..600 {
            let ea = tick(&mut a, &at(t * 16));
            let eb = tick(&mut b, &at(t * 16));
            assert_eq!(ea, eb);
        }
        for side in Side::BOTH {
            assert_eq!(a.player(side).pos, b.player(side).pos);
            assert_eq!(a.player(side).health, b.player(side).health);
        }
    }
}
