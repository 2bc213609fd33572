//! Collision detection for the arcade world
//!
//! Pure reads of player and entity rectangles that produce collision
//! events; no hidden state. Hitboxes are inset from the visual sprites so
//! near-misses feel fair, and each obstacle kind carries its own insets.

use glam::Vec2;

use super::rect::Rect;
use super::state::{CollectibleKind, Entity, EntityKind, Player, PlayerPose};

/// One collision outcome produced during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// Player picked up a collectible; the entity must be removed
    Collected { id: u32, kind: CollectibleKind },
    /// Player overlapped a fatal obstacle outside a fever window
    Fatal { id: u32 },
}

/// The player's fatal-collision hitbox. Narrower than the sprite on both
/// sides; while sliding it collapses to the bottom 40% so overhead hazards
/// pass over.
pub fn player_hitbox(player: &Player) -> Rect {
    let r = player.rect;
    if player.pose == PlayerPose::Sliding {
        r.inset(30.0, r.h * 0.6, 30.0, 0.0)
    } else {
        r.inset(30.0, 20.0, 30.0, 0.0)
    }
}

/// An obstacle's hitbox, inset per kind
pub fn obstacle_hitbox(entity: &Entity) -> Rect {
    let r = entity.rect;
    match entity.kind {
        EntityKind::Ground => r.inset(15.0, 15.0, 15.0, 0.0),
        // Tall obstacles are cleared by a tight double jump; be generous
        EntityKind::Tall => r.inset(25.0, 25.0, 25.0, 0.0),
        // The band extends a little below the sprite so a standing player's
        // head is still caught while a slider passes clean underneath
        EntityKind::Overhead => r.inset(20.0, 20.0, 20.0, -5.0),
        EntityKind::Platform | EntityKind::Collectible(_) => r,
    }
}

/// Fatal-overlap test for one obstacle. Platforms and collectibles never
/// kill; overhead obstacles are ignored while sliding.
pub fn fatal_overlap(player: &Player, entity: &Entity) -> bool {
    if !entity.kind.is_fatal() {
        return false;
    }
    if entity.kind == EntityKind::Overhead && player.pose == PlayerPose::Sliding {
        return false;
    }
    player_hitbox(player).overlaps(&obstacle_hitbox(entity))
}

/// Runner platform landing: foot point against the platform's top band.
/// Only meaningful while falling (vy >= 0); returns the snap y on a hit.
/// The 30 px band absorbs fast falls that would otherwise tunnel through.
pub fn platform_landing(foot: Vec2, platform: &Rect) -> Option<f32> {
    if foot.x > platform.x
        && foot.x < platform.right()
        && foot.y >= platform.y
        && foot.y <= platform.y + 30.0
    {
        Some(platform.y)
    } else {
        None
    }
}

/// Jumper platform bounce: horizontal span overlap with a 20%-of-width
/// tolerance on each side, foot within the platform's height plus a 10 px
/// band. Caller guarantees vy > 0 (falling).
pub fn bounce_landing(player: &Rect, platform: &Rect) -> bool {
    player.x + player.w * 0.8 > platform.x
        && player.x + player.w * 0.2 < platform.right()
        && player.bottom() > platform.y
        && player.bottom() < platform.bottom() + 10.0
}

/// Collectible pickup: center-distance threshold against the uninset player
/// box. `bob_y` is the collectible's current bob offset (pickup follows the
/// drawn position, not the resting one).
pub fn collect_overlap(player: &Rect, entity: &Entity, bob_y: f32, radius: f32) -> bool {
    let c = entity.rect.center() + Vec2::new(0.0, bob_y);
    let p = player.center();
    (c.x - p.x).abs() < radius && (c.y - p.y).abs() < radius
}

/// Scan all entities in spawn order and collect this frame's events.
/// `fever` suppresses fatal outcomes entirely.
pub fn scan(
    player: &Player,
    entities: &[Entity],
    frame: f32,
    pickup_radius: f32,
    fever: bool,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    for entity in entities {
        match entity.kind {
            EntityKind::Collectible(kind) => {
                let bob_y = (frame * 0.1 + entity.bob_phase).sin() * 5.0;
                if collect_overlap(&player.rect, entity, bob_y, pickup_radius) {
                    events.push(CollisionEvent::Collected {
                        id: entity.id,
                        kind,
                    });
                }
            }
            _ => {
                if !fever && fatal_overlap(player, entity) {
                    events.push(CollisionEvent::Fatal { id: entity.id });
                }
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::WorldState;
    use crate::tuning::{GameMode, Tunables};

    fn runner_player() -> Player {
        let state = WorldState::new(GameMode::Runner, 1);
        state.player
    }

    fn entity(kind: EntityKind, rect: Rect) -> Entity {
        Entity {
            id: 1,
            rect,
            kind,
            vx: 0.0,
            bob_phase: 0.0,
        }
    }

    #[test]
    fn test_ground_obstacle_hit_and_graze() {
        let tuning = Tunables::runner();
        let player = runner_player();

        // Rock planted on the player
        let rock = entity(
            EntityKind::Ground,
            Rect::new(player.rect.x, tuning.floor_y - 70.0, 70.0, 70.0),
        );
        assert!(fatal_overlap(&player, &rock));

        // Rock whose sprite grazes the player's inset margin only
        let graze = entity(
            EntityKind::Ground,
            Rect::new(player.rect.right() - 10.0, tuning.floor_y - 70.0, 70.0, 70.0),
        );
        assert!(!fatal_overlap(&player, &graze));
    }

    #[test]
    fn test_slide_ducks_under_overhead() {
        let tuning = Tunables::runner();
        let mut player = runner_player();

        let bird = entity(
            EntityKind::Overhead,
            Rect::new(player.rect.x, tuning.floor_y - 110.0, 90.0, 60.0),
        );
        // Standing: the bird band catches the head
        assert!(fatal_overlap(&player, &bird));
        // Sliding: overhead obstacles are skipped outright
        assert!(player.try_slide());
        assert!(!fatal_overlap(&player, &bird));
    }

    #[test]
    fn test_platform_never_fatal() {
        let player = runner_player();
        let platform = entity(EntityKind::Platform, player.rect);
        assert!(!fatal_overlap(&player, &platform));
    }

    #[test]
    fn test_platform_landing_band() {
        let platform = Rect::new(100.0, 200.0, 160.0, 50.0);
        // Foot inside the top band
        assert_eq!(
            platform_landing(Vec2::new(150.0, 210.0), &platform),
            Some(200.0)
        );
        // Foot below the band (fell through)
        assert_eq!(platform_landing(Vec2::new(150.0, 240.0), &platform), None);
        // Foot off the side
        assert_eq!(platform_landing(Vec2::new(50.0, 210.0), &platform), None);
    }

    #[test]
    fn test_bounce_landing_tolerance() {
        let platform = Rect::new(100.0, 300.0, 60.0, 15.0);
        // Player centered over the platform, feet just past the top
        let on = Rect::new(110.0, 265.0, 40.0, 40.0);
        assert!(bounce_landing(&on, &platform));
        // Player hanging on by the outer 10% of its width: too far
        let off = Rect::new(100.0 - 40.0 + 5.0, 265.0, 40.0, 40.0);
        assert!(!bounce_landing(&off, &platform));
    }

    #[test]
    fn test_collect_follows_bob() {
        let tuning = Tunables::runner();
        let player = runner_player();
        let meat = entity(
            EntityKind::Collectible(CollectibleKind::Meat),
            Rect::new(
                player.rect.center().x - 25.0,
                player.rect.center().y - tuning.pickup_radius - 27.0,
                50.0,
                50.0,
            ),
        );
        // Resting position is just out of range
        assert!(!collect_overlap(&player.rect, &meat, 0.0, tuning.pickup_radius));
        // Bobbed 5 px down it comes into range
        assert!(collect_overlap(&player.rect, &meat, 5.0, tuning.pickup_radius));
    }

    #[test]
    fn test_scan_fever_suppresses_fatal() {
        let tuning = Tunables::runner();
        let player = runner_player();
        let rock = entity(
            EntityKind::Ground,
            Rect::new(player.rect.x, tuning.floor_y - 70.0, 70.0, 70.0),
        );
        let entities = vec![rock];

        let hits = scan(&player, &entities, 0.0, tuning.pickup_radius, false);
        assert!(matches!(hits[..], [CollisionEvent::Fatal { .. }]));

        let hits = scan(&player, &entities, 0.0, tuning.pickup_radius, true);
        assert!(hits.is_empty());
    }
}
