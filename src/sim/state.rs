//! Game state and core simulation types
//!
//! Everything the frame stepper mutates lives here. The world is rebuilt
//! from scratch on every `reset`; no entity outlives a session and nothing
//! outside [`super::tick`] mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::{GameMode, Tunables};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World built, waiting for the lifecycle driver to start the run
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended (death or time expiry); the driver stops scheduling ticks
    GameOver,
}

/// Player movement state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPose {
    Running,
    Jumping,
    Sliding,
    Falling,
}

impl PlayerPose {
    /// Transition table. Illegal edges (e.g. slide while airborne) are
    /// rejected at the call sites and asserted here in debug builds.
    pub fn allows(self, next: PlayerPose) -> bool {
        use PlayerPose::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Running, Jumping) | (Running, Sliding) | (Running, Falling) => true,
            (Jumping, Running) | (Jumping, Falling) | (Jumping, Jumping) => true,
            (Falling, Running) | (Falling, Jumping) => true,
            (Sliding, Running) | (Sliding, Falling) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_airborne(self) -> bool {
        matches!(self, PlayerPose::Jumping | PlayerPose::Falling)
    }
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub pose: PlayerPose,
    /// Jumps consumed since the last ground/platform contact
    pub jumps_used: u8,
    pub grounded: bool,
    /// Standing on a floating platform this frame (render offset only)
    pub on_platform: bool,
    pub slide_timer: f32,
}

impl Player {
    fn new(x: f32, y: f32, tuning: &Tunables) -> Self {
        Self {
            rect: Rect::new(x, y, tuning.player_w, tuning.player_h),
            vx: 0.0,
            vy: 0.0,
            pose: PlayerPose::Running,
            jumps_used: 0,
            grounded: true,
            on_platform: false,
            slide_timer: 0.0,
        }
    }

    fn set_pose(&mut self, next: PlayerPose) {
        debug_assert!(
            self.pose.allows(next),
            "illegal pose transition {:?} -> {:?}",
            self.pose,
            next
        );
        self.pose = next;
    }

    /// Apply a jump intent. Refused while sliding or once the jump budget
    /// for this airtime is spent. Returns whether an impulse was applied.
    pub fn try_jump(&mut self, tuning: &Tunables) -> bool {
        if self.pose == PlayerPose::Sliding {
            return false;
        }
        if self.jumps_used >= tuning.max_jumps {
            return false;
        }
        self.vy = if self.jumps_used == 0 {
            tuning.jump_impulse
        } else {
            tuning.second_jump_impulse
        };
        self.set_pose(PlayerPose::Jumping);
        self.jumps_used += 1;
        self.grounded = false;
        true
    }

    /// Apply a slide intent. Only valid with feet on a surface.
    pub fn try_slide(&mut self) -> bool {
        if !self.grounded || self.pose == PlayerPose::Sliding {
            return false;
        }
        self.set_pose(PlayerPose::Sliding);
        self.slide_timer = 0.0;
        true
    }

    /// End a slide (input released or timer expired)
    pub fn end_slide(&mut self) {
        if self.pose == PlayerPose::Sliding {
            let next = if self.grounded {
                PlayerPose::Running
            } else {
                PlayerPose::Falling
            };
            self.set_pose(next);
            self.slide_timer = 0.0;
        }
    }

    /// Switch from ascent to descent once vertical velocity turns downward
    pub fn begin_fall(&mut self) {
        if self.pose == PlayerPose::Jumping {
            self.set_pose(PlayerPose::Falling);
        }
    }

    /// Lose ground support (walked off a platform edge, or the platform
    /// scrolled out from underfoot)
    pub fn leave_ground(&mut self) {
        self.grounded = false;
        self.on_platform = false;
        match self.pose {
            PlayerPose::Running => self.set_pose(PlayerPose::Falling),
            PlayerPose::Sliding => self.end_slide(),
            _ => {}
        }
    }

    /// Rebound off a platform top (jumper variant). Restores the full jump
    /// budget like a landing would, but leaves the player airborne.
    pub fn bounce(&mut self, impulse: f32) {
        self.vy = impulse;
        self.jumps_used = 0;
        self.grounded = false;
        self.on_platform = false;
        if self.pose != PlayerPose::Jumping {
            self.set_pose(PlayerPose::Jumping);
        }
    }

    /// Land on a surface whose top edge is at `surface_y`
    pub fn land(&mut self, surface_y: f32) {
        self.rect.y = surface_y - self.rect.h;
        self.vy = 0.0;
        self.grounded = true;
        self.jumps_used = 0;
        if self.pose.is_airborne() {
            self.set_pose(PlayerPose::Running);
        }
    }
}

/// Collectible sub-types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Ordinary currency; 10 of them extend the round timer
    Meat,
    /// Rare, worth a large score and currency bundle
    Gem,
    /// Mega score plus a fever (invulnerability) window
    Potion,
}

impl CollectibleKind {
    pub fn score_value(self) -> u64 {
        match self {
            CollectibleKind::Meat => 100,
            CollectibleKind::Gem => 500,
            CollectibleKind::Potion => 1000,
        }
    }

    pub fn meat_value(self) -> u32 {
        match self {
            CollectibleKind::Meat => 1,
            CollectibleKind::Gem => 10,
            CollectibleKind::Potion => 5,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            CollectibleKind::Meat => 50.0,
            CollectibleKind::Gem => 55.0,
            CollectibleKind::Potion => 60.0,
        }
    }
}

/// What a world entity is, which decides how it collides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Floor-level obstacle; fatal on contact
    Ground,
    /// Tall floor obstacle that needs a double jump; fatal, extra-forgiving hitbox
    Tall,
    /// Flying obstacle; fatal unless sliding under it
    Overhead,
    /// Landable surface, never fatal
    Platform,
    Collectible(CollectibleKind),
}

impl EntityKind {
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, EntityKind::Ground | EntityKind::Tall | EntityKind::Overhead)
    }
}

/// An obstacle, platform or collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub rect: Rect,
    pub kind: EntityKind,
    /// Horizontal oscillation speed; bounces at screen bounds. 0 = static.
    pub vx: f32,
    /// Phase offset for the collectible bob animation (render only)
    pub bob_phase: f32,
}

/// Timed status effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fatal collisions suppressed, obstacle spawns paused, bonus meat walls
    Fever,
    /// Held-direction speed scaled up
    SpeedBoost,
    /// Score deltas doubled
    DoubleScore,
}

/// Active timed effects. Each kind has an independent frame countdown;
/// re-activation refreshes the countdown to full rather than stacking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub fever_frames: f32,
    pub speed_boost_frames: f32,
    pub double_score_frames: f32,
}

impl ActiveEffects {
    pub fn activate(&mut self, kind: EffectKind, frames: f32) {
        let slot = match kind {
            EffectKind::Fever => &mut self.fever_frames,
            EffectKind::SpeedBoost => &mut self.speed_boost_frames,
            EffectKind::DoubleScore => &mut self.double_score_frames,
        };
        *slot = frames;
    }

    pub fn advance(&mut self, dt: f32) {
        self.fever_frames = (self.fever_frames - dt).max(0.0);
        self.speed_boost_frames = (self.speed_boost_frames - dt).max(0.0);
        self.double_score_frames = (self.double_score_frames - dt).max(0.0);
    }

    #[inline]
    pub fn fever_active(&self) -> bool {
        self.fever_frames > 0.0
    }

    /// Multiplier applied to held-direction movement
    #[inline]
    pub fn speed_factor(&self) -> f32 {
        if self.speed_boost_frames > 0.0 { 1.5 } else { 1.0 }
    }

    /// Multiplier applied to every score delta
    #[inline]
    pub fn score_factor(&self) -> u64 {
        if self.double_score_frames > 0.0 { 2 } else { 1 }
    }
}

/// A dust particle (visual only, never gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Particle cap; oldest are dropped first when full
pub const MAX_PARTICLES: usize = 256;

/// Spawn policy bookkeeping, advanced once per frame by the spawner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnerState {
    /// Frames until the next obstacle spawn is due
    pub next_spawn: f32,
    /// Frames elapsed in the current rolling collectible window
    pub window_frames: f32,
    /// Ordinary collectibles spawned inside the current window
    pub window_meats: u32,
    /// Frames until the next fever meat wall
    pub next_fever_wall: f32,
}

/// Complete game state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub mode: GameMode,
    pub tuning: Tunables,
    /// Run seed, kept for reproducibility / replays
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,

    /// Normalized frames elapsed since the run started
    pub elapsed: f32,
    /// Accumulator for once-per-second events (score drip, timer tick)
    pub second_acc: f32,
    /// Accumulator for the stepped difficulty ramp
    pub step_acc: f32,

    pub score: u64,
    /// Collected currency (meat count on the HUD)
    pub meat: u32,
    /// Ordinary pickups toward the next timer bonus
    pub meat_bonus_counter: u32,
    /// Countdown timer in frames (runner); ignored when round_frames == 0
    pub time_left: f32,
    /// Current world scroll speed (px per normalized frame)
    pub scroll_speed: f32,
    /// Total distance scrolled; drives the jumper score
    pub distance: f32,

    pub player: Player,
    pub entities: Vec<Entity>,
    pub effects: ActiveEffects,
    pub spawner: SpawnerState,
    #[serde(skip)]
    pub particles: Vec<Particle>,

    next_id: u32,
}

impl WorldState {
    /// Build a fresh world for a mode with the preset balance
    pub fn new(mode: GameMode, seed: u64) -> Self {
        Self::with_tunables(mode, Tunables::for_mode(mode), seed)
    }

    /// Build a fresh world with custom balance
    pub fn with_tunables(mode: GameMode, tuning: Tunables, seed: u64) -> Self {
        let player = match mode {
            GameMode::Runner => Player::new(80.0, tuning.ground_y(), &tuning),
            GameMode::Jumper => {
                // Starts mid-air and drops onto the first ladder platform
                let x = tuning.view_w / 2.0 - tuning.player_w / 2.0;
                let y = tuning.view_h - 150.0;
                let mut p = Player::new(x, y, &tuning);
                p.leave_ground();
                p
            }
        };

        let mut state = Self {
            mode,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            elapsed: 0.0,
            second_acc: 0.0,
            step_acc: 0.0,
            score: 0,
            meat: 0,
            meat_bonus_counter: 0,
            time_left: tuning.round_frames as f32,
            scroll_speed: tuning.scroll_speed_base,
            distance: 0.0,
            player,
            entities: Vec::new(),
            effects: ActiveEffects::default(),
            spawner: SpawnerState::default(),
            particles: Vec::new(),
            tuning,
            next_id: 1,
        };

        super::spawner::populate_initial(&mut state);
        state
    }

    /// Rebuild the world in place for a new session, keeping mode and balance
    pub fn reset(&mut self, seed: u64) {
        *self = Self::with_tunables(self.mode, self.tuning.clone(), seed);
    }

    /// Begin the run. No-op unless the world is freshly built.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
            log::info!("run started: mode={:?} seed={}", self.mode, self.seed);
        }
    }

    /// Allocate a new entity ID (spawn order = ID order, which fixes the
    /// collision tie-break order)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_entity(&mut self, rect: Rect, kind: EntityKind, vx: f32, bob_phase: f32) {
        debug_assert!(!rect.is_degenerate(), "spawned zero-sized entity {kind:?}");
        if rect.is_degenerate() {
            log::error!("refusing zero-sized {kind:?} at ({}, {})", rect.x, rect.y);
            return;
        }
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            rect,
            kind,
            vx,
            bob_phase,
        });
    }

    /// Award score through the active effect multiplier
    pub fn award_score(&mut self, base: u64) {
        self.score += base * self.effects.score_factor();
    }

    /// Right edge of the generated-ahead queue, if any entities exist
    pub fn lookahead_edge(&self) -> Option<f32> {
        self.entities
            .iter()
            .map(|e| e.rect.right())
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Topmost (smallest y) platform edge - the jumper's lookahead measure
    pub fn highest_platform_y(&self) -> Option<f32> {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Platform)
            .map(|e| e.rect.y)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn spawn_particle(&mut self, pos: Vec2, vel: Vec2, size: f32) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(Particle {
            pos,
            vel,
            size,
            alpha: 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_transition_table() {
        use PlayerPose::*;
        assert!(Running.allows(Jumping));
        assert!(Running.allows(Sliding));
        assert!(Jumping.allows(Jumping)); // double jump
        assert!(Sliding.allows(Running));
        // A slide can never begin in the air
        assert!(!Jumping.allows(Sliding));
        assert!(!Falling.allows(Sliding));
    }

    #[test]
    fn test_jump_budget() {
        let tuning = Tunables::runner();
        let mut player = Player::new(80.0, tuning.ground_y(), &tuning);

        assert!(player.try_jump(&tuning));
        assert_eq!(player.vy, tuning.jump_impulse);
        assert!(player.try_jump(&tuning));
        assert_eq!(player.vy, tuning.second_jump_impulse);
        // Budget spent
        assert!(!player.try_jump(&tuning));
        assert_eq!(player.jumps_used, 2);

        player.land(tuning.floor_y);
        assert_eq!(player.jumps_used, 0);
        assert!(player.try_jump(&tuning));
    }

    #[test]
    fn test_slide_requires_ground() {
        let tuning = Tunables::runner();
        let mut player = Player::new(80.0, tuning.ground_y(), &tuning);

        assert!(player.try_jump(&tuning));
        assert!(!player.try_slide());

        player.land(tuning.floor_y);
        assert!(player.try_slide());
        // Jump refused mid-slide
        assert!(!player.try_jump(&tuning));
        player.end_slide();
        assert_eq!(player.pose, PlayerPose::Running);
    }

    #[test]
    fn test_effects_refresh_not_stack() {
        let mut effects = ActiveEffects::default();
        effects.activate(EffectKind::Fever, 300.0);
        effects.advance(100.0);
        assert_eq!(effects.fever_frames, 200.0);
        // Second potion refreshes to full, it does not add
        effects.activate(EffectKind::Fever, 300.0);
        assert_eq!(effects.fever_frames, 300.0);
    }

    #[test]
    fn test_effects_run_concurrently() {
        let mut effects = ActiveEffects::default();
        effects.activate(EffectKind::Fever, 300.0);
        effects.activate(EffectKind::SpeedBoost, 120.0);
        assert!(effects.fever_active());
        assert_eq!(effects.speed_factor(), 1.5);
        effects.advance(150.0);
        assert!(effects.fever_active());
        assert_eq!(effects.speed_factor(), 1.0);
    }

    #[test]
    fn test_reset_rebuilds_world() {
        let mut state = WorldState::new(GameMode::Runner, 7);
        state.start();
        state.score = 999;
        state.reset(8);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.seed, 8);
    }

    #[test]
    fn test_jumper_starts_with_platform_ladder() {
        let state = WorldState::new(GameMode::Jumper, 42);
        let platforms = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Platform)
            .count();
        assert!(platforms >= 5, "initial ladder too sparse: {platforms}");
        // Ladder reaches near the top of the view
        assert!(state.highest_platform_y().unwrap() < state.tuning.platform_gap_max);
    }
}
