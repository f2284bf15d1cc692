//! Contact detection between the two actors
//!
//! Sprites have transparent margins, so contact uses a shrunk hit-box: the
//! central 75% of the width and the top 70% of the height.

use super::state::Actor;
use crate::tuning::Tuning;

/// Axis-aligned hit-box in screen coordinates (top < bottom)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl HitBox {
    /// Shrunk hit-box for an actor
    pub fn of(actor: &Actor, tuning: &Tuning) -> Self {
        let inset = actor.size.x * tuning.hitbox_side_inset;
        Self {
            left: actor.pos.x + inset,
            right: actor.pos.x + actor.size.x - inset,
            top: actor.pos.y,
            bottom: actor.pos.y + actor.size.y * tuning.hitbox_height_fraction,
        }
    }

    /// Overlap on both axes (touching edges count)
    pub fn overlaps(&self, other: &HitBox) -> bool {
        let horizontal = !(self.right < other.left || self.left > other.right);
        let vertical = !(self.bottom < other.top || self.top > other.bottom);
        horizontal && vertical
    }
}

/// Whether the two actors are in contact this tick
pub fn actors_touch(a: &Actor, b: &Actor, tuning: &Tuning) -> bool {
    HitBox::of(a, tuning).overlaps(&HitBox::of(b, tuning))
}

/// Cooldown since the attacker's last stomp has strictly elapsed
pub fn stomp_ready(attacker: &Actor, now_ms: u64, cooldown_ms: u64) -> bool {
    match attacker.last_stomp_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
    }
}

/// `attacker` is airborne, above `target`, off cooldown, and `target` is vulnerable
///
/// Does not test overlap; callers check contact first.
pub fn can_stomp(attacker: &Actor, target: &Actor, now_ms: u64, tuning: &Tuning) -> bool {
    attacker.airborne
        && attacker.pos.y < target.pos.y
        && stomp_ready(attacker, now_ms, tuning.stomp_cooldown_ms)
        && !target.is_invincible()
}

/// Horizontal push directions (-1 left, +1 right) for a pair in contact
///
/// The actor further left goes left. With equal x the first actor goes left;
/// this tie-break is arbitrary.
pub fn push_directions(first: &Actor, second: &Actor) -> (f32, f32) {
    if first.pos.x <= second.pos.x {
        (-1.0, 1.0)
    } else {
        (1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;
    use glam::Vec2;

    fn actor_at(side: Side, x: f32, y: f32) -> Actor {
        let mut actor = Actor::new(side, Vec2::new(100.0, 100.0), 100);
        actor.pos = Vec2::new(x, y);
        actor
    }

    #[test]
    fn test_hitbox_is_shrunk() {
        let tuning = Tuning::default();
        let hb = HitBox::of(&actor_at(Side::P1, 100.0, 200.0), &tuning);
        assert_eq!(hb.left, 112.5);
        assert_eq!(hb.right, 187.5);
        assert_eq!(hb.top, 200.0);
        assert!((hb.bottom - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_sprite_edges_do_not_collide() {
        let tuning = Tuning::default();
        // Sprites overlap by 20px but the transparent margins are 12.5px each
        let a = actor_at(Side::P1, 100.0, 400.0);
        let b = actor_at(Side::P2, 180.0, 400.0);
        assert!(!actors_touch(&a, &b, &tuning));

        let b = actor_at(Side::P2, 170.0, 400.0);
        assert!(actors_touch(&a, &b, &tuning));
    }

    #[test]
    fn test_vertical_separation() {
        let tuning = Tuning::default();
        let a = actor_at(Side::P1, 100.0, 300.0);
        // a's box covers y 300..370
        let b = actor_at(Side::P2, 100.0, 380.0);
        assert!(!actors_touch(&a, &b, &tuning));
        let b = actor_at(Side::P2, 100.0, 360.0);
        assert!(actors_touch(&a, &b, &tuning));
    }

    #[test]
    fn test_stomp_requires_airborne_and_above() {
        let tuning = Tuning::default();
        let mut attacker = actor_at(Side::P1, 100.0, 420.0);
        let target = actor_at(Side::P2, 100.0, 480.0);

        assert!(!can_stomp(&attacker, &target, 5000, &tuning));
        attacker.airborne = true;
        assert!(can_stomp(&attacker, &target, 5000, &tuning));
        // Target above attacker cannot be stomped
        assert!(!can_stomp(&target, &attacker, 5000, &tuning));
    }

    #[test]
    fn test_stomp_cooldown_is_strict() {
        let tuning = Tuning::default();
        let mut attacker = actor_at(Side::P1, 100.0, 420.0);
        attacker.airborne = true;
        attacker.last_stomp_ms = Some(1000);
        let target = actor_at(Side::P2, 100.0, 480.0);

        assert!(!can_stomp(&attacker, &target, 1500, &tuning));
        assert!(!can_stomp(&attacker, &target, 1800, &tuning));
        assert!(can_stomp(&attacker, &target, 1801, &tuning));
    }

    #[test]
    fn test_invincible_target_cannot_be_stomped() {
        let tuning = Tuning::default();
        let mut attacker = actor_at(Side::P1, 100.0, 420.0);
        attacker.airborne = true;
        let mut target = actor_at(Side::P2, 100.0, 480.0);
        target.invincible_until_ms = Some(9000);
        assert!(!can_stomp(&attacker, &target, 5000, &tuning));
    }

    #[test]
    fn test_push_directions() {
        let left = actor_at(Side::P1, 100.0, 480.0);
        let right = actor_at(Side::P2, 150.0, 480.0);
        assert_eq!(push_directions(&left, &right), (-1.0, 1.0));
        assert_eq!(push_directions(&right, &left), (1.0, -1.0));
        // Tie: first goes left
        assert_eq!(push_directions(&left, &left.clone()), (-1.0, 1.0));
    }
}
