//! Randomized spawn policy
//!
//! Keeps the illusion of an infinite world alive: obstacles, platforms and
//! collectibles are generated just past the leading screen edge before the
//! scroll brings them into view. All randomness flows through the
//! state-owned RNG, so a seed reproduces the exact same world.

use rand::Rng;

use super::rect::Rect;
use super::state::{CollectibleKind, EntityKind, WorldState};
use crate::tuning::GameMode;

/// Spawn offset past the right screen edge
const LEAD_X: f32 = 20.0;
/// Rolling collectible window length (frames)
const MEAT_WINDOW: f32 = 300.0;
/// Force an ordinary collectible spawn if none happened by this point
const MEAT_WINDOW_DEADLINE: f32 = 240.0;
/// Most ordinary collectibles allowed per window
const MEAT_WINDOW_CAP: u32 = 12;
/// Frames between fever meat walls
const FEVER_WALL_INTERVAL: f32 = 6.0;

const ROCK_W: f32 = 70.0;
const ROCK_H: f32 = 70.0;
const STUMP_W: f32 = 70.0;
const STUMP_H: f32 = 130.0;
const BIRD_W: f32 = 90.0;
const BIRD_H: f32 = 60.0;

/// Seed the world at session start
pub fn populate_initial(state: &mut WorldState) {
    match state.mode {
        GameMode::Runner => {
            state.spawner.next_spawn = draw_interval(state);
            state.spawner.next_fever_wall = FEVER_WALL_INTERVAL;
        }
        GameMode::Jumper => {
            // Ladder of platforms from just above the floor to the top edge
            let mut y = state.tuning.view_h - 100.0;
            while y > 0.0 {
                spawn_jumper_platform(state, y);
                let gap = state
                    .rng
                    .random_range(state.tuning.platform_gap_min..state.tuning.platform_gap_max);
                y -= gap;
            }
        }
    }
}

/// Called once per frame after entities have advanced. Decides whether new
/// entities enter at the leading edge this frame.
pub fn maybe_spawn(state: &mut WorldState, dt: f32) {
    match state.mode {
        GameMode::Runner => maybe_spawn_runner(state, dt),
        GameMode::Jumper => top_up_jumper(state),
    }

    // Hard invariant: the generated-ahead queue never runs dry while the
    // run is live. An empty lookahead is a defect, not a tolerable state.
    debug_assert!(
        !state.entities.is_empty(),
        "lookahead queue ran dry at frame {}",
        state.elapsed
    );
}

fn maybe_spawn_runner(state: &mut WorldState, dt: f32) {
    // Rolling collectible window: guarantee the player is never starved of
    // meat, and never flooded with it either.
    state.spawner.window_frames += dt;
    if state.spawner.window_frames >= MEAT_WINDOW {
        state.spawner.window_frames -= MEAT_WINDOW;
        state.spawner.window_meats = 0;
    }
    if state.spawner.window_meats == 0 && state.spawner.window_frames >= MEAT_WINDOW_DEADLINE {
        let x = state.tuning.view_w + 50.0;
        let y = state.tuning.floor_y - 120.0;
        spawn_meat_line(state, x, y, 3, 50.0);
        log::debug!("forced meat line at frame {}", state.elapsed);
    }

    if state.effects.fever_active() {
        // No obstacles during fever; dense meat columns instead
        state.spawner.next_fever_wall -= dt;
        if state.spawner.next_fever_wall <= 0.0 {
            state.spawner.next_fever_wall += FEVER_WALL_INTERVAL;
            let x = state.tuning.view_w + 50.0;
            for i in 0..5 {
                let y = state.tuning.floor_y - 50.0 - (i as f32 * 45.0);
                spawn_meat_row(state, x, y, 1, 0.0);
            }
        }
    }

    state.spawner.next_spawn -= dt;
    if state.spawner.next_spawn <= 0.0 {
        state.spawner.next_spawn = draw_interval(state);
        if !state.effects.fever_active() {
            spawn_obstacle(state);
        }
    }

    // Lookahead guarantee: if the queue's leading edge slipped inside the
    // buffer (long dt spikes, aggressive retirement), spawn immediately.
    let edge = state.lookahead_edge().unwrap_or(f32::MIN);
    if edge < state.tuning.view_w + LEAD_X {
        if state.effects.fever_active() {
            // Must always produce something, so skip the window cap
            let x = state.tuning.view_w + 50.0;
            let y = state.tuning.floor_y - 120.0;
            spawn_meat_row(state, x, y, 3, 50.0);
        } else {
            spawn_obstacle(state);
        }
    }
}

/// Spawn interval drawn from a range that narrows with scroll speed, down
/// to a floor
fn draw_interval(state: &mut WorldState) -> f32 {
    let t = &state.tuning;
    let base = (t.spawn_interval_base - t.spawn_interval_slope * state.scroll_speed)
        .max(t.spawn_interval_min);
    base + state.rng.random_range(0.0..t.spawn_jitter.max(f32::EPSILON))
}

/// Weighted obstacle roll plus attached collectibles and the rare roll
fn spawn_obstacle(state: &mut WorldState) {
    let w = state.tuning.view_w;
    let floor = state.tuning.floor_y;
    let on_floor = |h: f32| floor - h;

    let r: f32 = state.rng.random();
    if r < 0.3 {
        // Small rock
        state.push_entity(
            Rect::new(w + LEAD_X, on_floor(ROCK_H) + 25.0, ROCK_W, ROCK_H),
            EntityKind::Ground,
            0.0,
            0.0,
        );
        spawn_meat_line(state, w + 50.0, floor - 120.0, 3, 50.0);
    } else if r < 0.5 {
        // Tall stump, needs a double jump
        state.push_entity(
            Rect::new(w + LEAD_X, on_floor(STUMP_H) + 20.0, STUMP_W, STUMP_H),
            EntityKind::Tall,
            0.0,
            0.0,
        );
        spawn_meat_line(state, w + 30.0, floor - 150.0, 2, 50.0);
    } else if r < 0.7 {
        // Floating platform
        state.push_entity(
            Rect::new(
                w + LEAD_X,
                floor - 160.0,
                state.tuning.platform_w,
                state.tuning.platform_h,
            ),
            EntityKind::Platform,
            0.0,
            0.0,
        );
        spawn_meat_line(state, w + 40.0, floor - 200.0, 3, 40.0);
    } else if r < 0.85 {
        // Bird at head height; slide under it
        state.push_entity(
            Rect::new(w + LEAD_X, floor - 110.0, BIRD_W, BIRD_H),
            EntityKind::Overhead,
            0.0,
            0.0,
        );
        spawn_meat_line(state, w + 30.0, floor - 30.0, 3, 40.0);
    } else {
        // Paired rocks
        state.push_entity(
            Rect::new(w + 180.0, on_floor(ROCK_H) + 25.0, ROCK_W, ROCK_H),
            EntityKind::Ground,
            0.0,
            0.0,
        );
        state.push_entity(
            Rect::new(w + LEAD_X, on_floor(ROCK_H) + 25.0, ROCK_W, ROCK_H),
            EntityKind::Ground,
            0.0,
            0.0,
        );
        spawn_meat_line(state, w + 80.0, floor - 140.0, 5, 40.0);
    }

    // Independent rare roll: potion beats gem
    let rare: f32 = state.rng.random();
    if rare < 0.15 {
        let kind = if rare < 0.05 {
            CollectibleKind::Potion
        } else {
            CollectibleKind::Gem
        };
        let size = kind.size();
        let x = w + 100.0 + state.rng.random_range(0.0..150.0);
        let y = floor - 140.0 - state.rng.random_range(0.0..60.0);
        let bob = state.rng.random_range(0.0..std::f32::consts::TAU);
        state.push_entity(
            Rect::new(x, y, size, size),
            EntityKind::Collectible(kind),
            0.0,
            bob,
        );
    }
}

/// A horizontal run of ordinary collectibles, subject to the window cap
fn spawn_meat_line(state: &mut WorldState, x: f32, y: f32, count: u32, spacing: f32) {
    if state.spawner.window_meats >= MEAT_WINDOW_CAP {
        return;
    }
    let count = count.min(MEAT_WINDOW_CAP - state.spawner.window_meats);
    spawn_meat_row(state, x, y, count, spacing);
    state.spawner.window_meats += count;
}

/// The uncapped row primitive; fever walls and the lookahead fallback use
/// it directly so they always produce entities
fn spawn_meat_row(state: &mut WorldState, x: f32, y: f32, count: u32, spacing: f32) {
    let size = CollectibleKind::Meat.size();
    for i in 0..count {
        let bob = state.rng.random_range(0.0..std::f32::consts::TAU);
        state.push_entity(
            Rect::new(x + i as f32 * spacing, y, size, size),
            EntityKind::Collectible(CollectibleKind::Meat),
            0.0,
            bob,
        );
    }
}

/// Keep the jumper's platform ladder extending past the top edge
fn top_up_jumper(state: &mut WorldState) {
    while state
        .highest_platform_y()
        .map_or(true, |y| y > state.tuning.platform_gap_min)
    {
        let gap = state
            .rng
            .random_range(state.tuning.platform_gap_min..state.tuning.platform_gap_max);
        let y = state.highest_platform_y().unwrap_or(state.tuning.view_h) - gap;
        spawn_jumper_platform(state, y);
    }
}

fn spawn_jumper_platform(state: &mut WorldState, y: f32) {
    let x = state
        .rng
        .random_range(0.0..(state.tuning.view_w - state.tuning.platform_w));
    let vx = if state.rng.random::<f32>() < state.tuning.moving_platform_chance {
        if state.rng.random::<bool>() {
            state.tuning.moving_platform_speed
        } else {
            -state.tuning.moving_platform_speed
        }
    } else {
        0.0
    };
    state.push_entity(
        Rect::new(x, y, state.tuning.platform_w, state.tuning.platform_h),
        EntityKind::Platform,
        vx,
        0.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, WorldState};
    use crate::tuning::GameMode;

    #[test]
    fn test_runner_lookahead_never_dry() {
        let mut state = WorldState::new(GameMode::Runner, 31337);
        state.start();
        for _ in 0..2000 {
            for e in &mut state.entities {
                e.rect.x -= state.scroll_speed;
            }
            state.entities.retain(|e| e.rect.right() >= -100.0);
            maybe_spawn(&mut state, 1.0);
            let edge = state.lookahead_edge().expect("queue empty");
            assert!(
                edge >= state.tuning.view_w + LEAD_X,
                "lookahead edge {edge} inside buffer"
            );
        }
    }

    #[test]
    fn test_obstacle_weights_roughly_hold() {
        let mut state = WorldState::new(GameMode::Runner, 99);
        let mut ground = 0u32;
        let mut tall = 0u32;
        let mut overhead = 0u32;
        let mut platforms = 0u32;
        for _ in 0..1000 {
            state.entities.clear();
            state.spawner.window_meats = 0;
            spawn_obstacle(&mut state);
            for e in &state.entities {
                match e.kind {
                    EntityKind::Ground => ground += 1,
                    EntityKind::Tall => tall += 1,
                    EntityKind::Overhead => overhead += 1,
                    EntityKind::Platform => platforms += 1,
                    EntityKind::Collectible(_) => {}
                }
            }
        }
        // 30% rock + 15% pair (x2) = ~60% of rolls produce ground rocks
        assert!(ground > 400, "ground {ground}");
        assert!((100..350).contains(&tall), "tall {tall}");
        assert!((50..300).contains(&overhead), "overhead {overhead}");
        assert!((100..350).contains(&platforms), "platforms {platforms}");
    }

    #[test]
    fn test_meat_window_forces_and_caps() {
        let mut state = WorldState::new(GameMode::Runner, 5);
        state.start();
        // Quiet window: no obstacle spawns (huge interval), deadline passes
        state.spawner.next_spawn = 10_000.0;
        state.spawner.window_frames = MEAT_WINDOW_DEADLINE;
        // Park an entity far right so the lookahead guarantee stays quiet
        state.push_entity(
            Rect::new(state.tuning.view_w + 500.0, 0.0, 10.0, 10.0),
            EntityKind::Ground,
            0.0,
            0.0,
        );
        maybe_spawn(&mut state, 1.0);
        let meats = state
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Collectible(CollectibleKind::Meat)))
            .count();
        assert!(meats > 0, "deadline did not force a meat spawn");
        assert!(state.spawner.window_meats > 0);

        // Cap: once the window is full no more ordinary meat appears
        state.spawner.window_meats = MEAT_WINDOW_CAP;
        let before = state.entities.len();
        spawn_meat_line(&mut state, 0.0, 0.0, 5, 10.0);
        assert_eq!(state.entities.len(), before);
    }

    #[test]
    fn test_fever_spawns_meat_not_obstacles() {
        let mut state = WorldState::new(GameMode::Runner, 8);
        state.start();
        state.effects.activate(crate::sim::state::EffectKind::Fever, 300.0);
        state.spawner.next_spawn = 0.0;
        for _ in 0..60 {
            maybe_spawn(&mut state, 1.0);
        }
        assert!(
            state
                .entities
                .iter()
                .all(|e| matches!(e.kind, EntityKind::Collectible(_))),
            "obstacle spawned during fever"
        );
        assert!(!state.entities.is_empty());
    }

    #[test]
    fn test_jumper_ladder_tops_up() {
        let mut state = WorldState::new(GameMode::Jumper, 77);
        state.start();
        // Scroll everything down a full screen, retiring what exits
        for e in &mut state.entities {
            e.rect.y += state.tuning.view_h;
        }
        state.entities.retain(|e| e.rect.y <= state.tuning.view_h);
        maybe_spawn(&mut state, 1.0);
        let top = state.highest_platform_y().expect("no platforms");
        assert!(top <= state.tuning.platform_gap_min);
    }

    #[test]
    fn test_jumper_gap_bounds() {
        let state = WorldState::new(GameMode::Jumper, 123);
        let mut ys: Vec<f32> = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Platform)
            .map(|e| e.rect.y)
            .collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in ys.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= state.tuning.platform_gap_min - 1e-3
                    && gap <= state.tuning.platform_gap_max + 1e-3,
                "gap {gap} outside tunable range"
            );
        }
    }
}
