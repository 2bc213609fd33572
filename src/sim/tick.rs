//! The frame stepper
//!
//! One call to [`tick`] advances the whole world by `dt` normalized frames
//! (1.0 = one 60 Hz frame). The step order is fixed: input, player physics,
//! world scroll, ground contact, collisions, retirement and spawning, then
//! timers. Reordering these changes observable behavior, so don't.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, CollisionEvent};
use super::spawner;
use super::state::{
    CollectibleKind, EffectKind, EntityKind, GamePhase, PlayerPose, WorldState,
};
use crate::tuning::GameMode;

/// Player intent for one frame, already translated from raw input devices
/// by the caller. `jump` and `slide` are edges (pressed this frame); the
/// movement flags are levels (currently held).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub slide: bool,
}

/// Advance the world by `dt` normalized frames. Does nothing unless the
/// world is in the `Playing` phase.
pub fn tick(state: &mut WorldState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing || dt <= 0.0 {
        return;
    }

    apply_input(state, input, dt);
    step_player(state, dt);
    advance_entities(state, dt);
    resolve_ground_contact(state);
    resolve_collisions(state);
    if state.phase == GamePhase::GameOver {
        // The frame ends where the run ended
        return;
    }
    retire_entities(state);
    spawner::maybe_spawn(state, dt);
    advance_timers(state, dt);
    advance_particles(state, dt);
}

fn apply_input(state: &mut WorldState, input: &TickInput, dt: f32) {
    match state.mode {
        GameMode::Runner => {
            if input.jump {
                state.player.try_jump(&state.tuning);
            }
            if input.slide {
                state.player.try_slide();
            }
            if state.player.pose == PlayerPose::Sliding {
                state.player.slide_timer += dt;
                if state.player.slide_timer >= state.tuning.slide_frames {
                    state.player.end_slide();
                }
            }
        }
        GameMode::Jumper => {
            // Bounces are automatic; input only steers
            let speed = state.tuning.move_speed * state.effects.speed_factor();
            if input.move_left ^ input.move_right {
                state.player.vx = if input.move_left { -speed } else { speed };
            } else {
                state.player.vx *= state.tuning.friction.powf(dt);
            }
        }
    }
}

fn step_player(state: &mut WorldState, dt: f32) {
    let player = &mut state.player;

    // Gravity, except while parked on a surface in a slide
    if !(player.grounded && player.pose == PlayerPose::Sliding) {
        player.vy += state.tuning.gravity * dt;
    }
    player.rect.y += player.vy * dt;
    player.rect.x += player.vx * dt;

    if player.vy > 0.0 {
        player.begin_fall();
    }

    if state.mode == GameMode::Jumper {
        // Horizontal wrap-around at the screen edges
        let w = state.tuning.view_w;
        if player.rect.x > w {
            player.rect.x = -player.rect.w;
        } else if player.rect.right() < 0.0 {
            player.rect.x = w;
        }
    }
}

fn advance_entities(state: &mut WorldState, dt: f32) {
    match state.mode {
        GameMode::Runner => {
            let step = state.scroll_speed * dt;
            for e in &mut state.entities {
                e.rect.x -= step;
            }
            state.distance += step;
        }
        GameMode::Jumper => {
            // Moving platforms oscillate between the screen bounds
            let w = state.tuning.view_w;
            for e in &mut state.entities {
                if e.vx == 0.0 {
                    continue;
                }
                e.rect.x += e.vx * dt;
                if e.rect.x <= 0.0 || e.rect.right() >= w {
                    e.rect.x = e.rect.x.clamp(0.0, w - e.rect.w);
                    e.vx = -e.vx;
                }
            }

            // Camera scroll: the player never climbs past the midline; the
            // world slides down instead and the climb becomes score.
            let midline = state.tuning.view_h / 2.0;
            if state.player.rect.y < midline {
                let delta = midline - state.player.rect.y;
                state.player.rect.y = midline;
                for e in &mut state.entities {
                    e.rect.y += delta;
                }
                let gained = (state.distance + delta).floor() - state.distance.floor();
                state.distance += delta;
                if gained > 0.0 {
                    state.award_score(gained as u64);
                }
            }
        }
    }
}

fn resolve_ground_contact(state: &mut WorldState) {
    match state.mode {
        GameMode::Runner => {
            let floor = state.tuning.floor_y;

            if state.player.vy >= 0.0 && state.player.rect.bottom() >= floor {
                state.player.land(floor);
                state.player.on_platform = false;
                return;
            }

            // Floating platforms: foot against the top landing band
            if state.player.vy >= 0.0 {
                let foot = state.player.rect.foot();
                let snap = state
                    .entities
                    .iter()
                    .filter(|e| e.kind == EntityKind::Platform)
                    .find_map(|e| collision::platform_landing(foot, &e.rect));
                if let Some(y) = snap {
                    state.player.land(y);
                    state.player.on_platform = true;
                    return;
                }
            }

            // Supported last frame, nothing underfoot now
            if state.player.grounded {
                state.player.leave_ground();
            }
        }
        GameMode::Jumper => {
            if state.player.vy <= 0.0 {
                return;
            }
            let hit = state
                .entities
                .iter()
                .find(|e| {
                    e.kind == EntityKind::Platform
                        && collision::bounce_landing(&state.player.rect, &e.rect)
                })
                .map(|e| (e.rect.center().x, e.rect.y));
            if let Some((cx, top)) = hit {
                state.player.bounce(state.tuning.jump_impulse);
                spawn_bounce_dust(state, cx, top);
            }
        }
    }
}

fn resolve_collisions(state: &mut WorldState) {
    let events = collision::scan(
        &state.player,
        &state.entities,
        state.elapsed,
        state.tuning.pickup_radius,
        state.effects.fever_active(),
    );

    for event in events {
        match event {
            CollisionEvent::Collected { id, kind } => {
                state.entities.retain(|e| e.id != id);
                state.award_score(kind.score_value());
                state.meat += kind.meat_value();
                // Only ordinary meat counts toward the timer bonus; gems
                // and potions pay out in currency and effects instead
                if kind == CollectibleKind::Meat && state.tuning.meat_bonus_count > 0 {
                    state.meat_bonus_counter += 1;
                    if state.meat_bonus_counter >= state.tuning.meat_bonus_count {
                        state.meat_bonus_counter -= state.tuning.meat_bonus_count;
                        state.time_left += state.tuning.meat_bonus_frames as f32;
                        log::debug!("timer bonus, {:.0} frames left", state.time_left);
                    }
                }
                match kind {
                    CollectibleKind::Potion => {
                        state
                            .effects
                            .activate(EffectKind::Fever, state.tuning.fever_frames);
                        log::info!("fever started at frame {:.0}", state.elapsed);
                    }
                    CollectibleKind::Gem => {
                        let kind = if state.rng.random::<bool>() {
                            EffectKind::SpeedBoost
                        } else {
                            EffectKind::DoubleScore
                        };
                        state.effects.activate(kind, state.tuning.effect_frames);
                    }
                    CollectibleKind::Meat => {}
                }
            }
            CollisionEvent::Fatal { id } => {
                state.phase = GamePhase::GameOver;
                log::info!(
                    "run over: hit entity {id} at frame {:.0}, score {}",
                    state.elapsed,
                    state.score
                );
                return;
            }
        }
    }
}

fn retire_entities(state: &mut WorldState) {
    match state.mode {
        GameMode::Runner => state.entities.retain(|e| e.rect.right() >= -100.0),
        GameMode::Jumper => {
            let h = state.tuning.view_h;
            state.entities.retain(|e| e.rect.y <= h);
        }
    }
}

fn advance_timers(state: &mut WorldState, dt: f32) {
    state.elapsed += dt;
    state.effects.advance(dt);

    if state.mode == GameMode::Runner {
        // Once-per-second score drip from forward motion
        state.second_acc += dt;
        while state.second_acc >= 60.0 {
            state.second_acc -= 60.0;
            state.award_score((state.scroll_speed * 0.5).floor() as u64);
        }

        // Stepped difficulty ramp plus continuous creep
        if state.tuning.speed_step_interval > 0 {
            state.step_acc += dt;
            let interval = state.tuning.speed_step_interval as f32;
            while state.step_acc >= interval {
                state.step_acc -= interval;
                state.scroll_speed = (state.scroll_speed + state.tuning.speed_step)
                    .min(state.tuning.scroll_speed_step_cap);
            }
        }
        state.scroll_speed = (state.scroll_speed + state.tuning.speed_creep * dt)
            .min(state.tuning.scroll_speed_cap);

        if state.tuning.round_frames > 0 {
            state.time_left -= dt;
            if state.time_left <= 0.0 {
                state.time_left = 0.0;
                state.phase = GamePhase::GameOver;
                log::info!("time expired, final score {}", state.score);
            }
        }
    }

    // Falling off the bottom ends a jumper run
    if state.mode == GameMode::Jumper && state.player.rect.y > state.tuning.view_h {
        state.phase = GamePhase::GameOver;
        log::info!("fell out of the world, final score {}", state.score);
    }
}

fn spawn_bounce_dust(state: &mut WorldState, cx: f32, top: f32) {
    for _ in 0..5 {
        let vel = Vec2::new(
            state.rng.random_range(-1.5..1.5),
            state.rng.random_range(-2.0..-0.5),
        );
        let size = state.rng.random_range(2.0..5.0);
        state.spawn_particle(Vec2::new(cx, top), vel, size);
    }
}

fn advance_particles(state: &mut WorldState, dt: f32) {
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.vel.y += 0.1 * dt;
        p.alpha -= 0.04 * dt;
    }
    state.particles.retain(|p| p.alpha > 0.0);
}
