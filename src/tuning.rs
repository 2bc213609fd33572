//! Data-driven game balance
//!
//! Every per-variant constant lives in [`Tunables`] rather than in code, so
//! the same frame stepper serves both game variants. Presets carry the
//! shipped values; a JSON override can rebalance a build without a rebuild.

use serde::{Deserialize, Serialize};

/// Which game variant the world simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Side-scrolling endless runner (fixed player x, world scrolls left)
    Runner,
    /// Vertical platform jumper (camera scrolls down as the player climbs)
    Jumper,
}

/// All balance knobs for one game variant.
///
/// Units: pixels for lengths, normalized 60 Hz frames for time, velocity in
/// pixels per frame, acceleration in pixels per frame squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Visible world width
    pub view_w: f32,
    /// Visible world height
    pub view_h: f32,
    /// Y of the walkable floor plane (player feet rest here)
    pub floor_y: f32,

    pub player_w: f32,
    pub player_h: f32,

    pub gravity: f32,
    /// Impulse for the first jump (negative = up, canvas y-down)
    pub jump_impulse: f32,
    /// Impulse for the mid-air jump
    pub second_jump_impulse: f32,
    pub max_jumps: u8,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Per-frame horizontal decay factor once input releases
    pub friction: f32,

    /// World scroll speed at game start
    pub scroll_speed_base: f32,
    /// Cap for the stepped difficulty ramp
    pub scroll_speed_step_cap: f32,
    /// Absolute scroll speed cap (creep stops here)
    pub scroll_speed_cap: f32,
    /// Speed added by each difficulty step
    pub speed_step: f32,
    /// Frames between difficulty steps
    pub speed_step_interval: u32,
    /// Continuous per-frame speed creep
    pub speed_creep: f32,

    /// Spawn interval floor (frames); the interval never narrows below this
    pub spawn_interval_min: f32,
    /// Spawn interval before any difficulty scaling
    pub spawn_interval_base: f32,
    /// Interval reduction per unit of scroll speed
    pub spawn_interval_slope: f32,
    /// Uniform jitter added on top of the computed interval
    pub spawn_jitter: f32,

    pub platform_w: f32,
    pub platform_h: f32,
    /// Vertical gap range between jumper platforms
    pub platform_gap_min: f32,
    pub platform_gap_max: f32,
    /// Fraction of jumper platforms that oscillate horizontally
    pub moving_platform_chance: f32,
    pub moving_platform_speed: f32,

    /// Frames a slide lasts before auto-ending
    pub slide_frames: f32,
    /// Countdown round length (frames); 0 disables the timer
    pub round_frames: u32,
    /// Invulnerability window granted by a potion
    pub fever_frames: f32,
    /// Duration of the other timed effects
    pub effect_frames: f32,
    /// Center-distance pickup threshold for collectibles
    pub pickup_radius: f32,
    /// Ordinary collectibles needed for a timer bonus
    pub meat_bonus_count: u32,
    /// Timer extension per bonus (frames)
    pub meat_bonus_frames: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self::runner()
    }
}

impl Tunables {
    /// Balance for the side-scrolling runner variant
    pub fn runner() -> Self {
        Self {
            view_w: 800.0,
            view_h: 350.0,
            floor_y: 350.0 - 55.0,
            player_w: 130.0,
            player_h: 92.0,
            gravity: 0.7,
            jump_impulse: -13.0,
            second_jump_impulse: -10.0,
            max_jumps: 2,
            move_speed: 0.0, // player x is fixed; the world moves instead
            friction: 0.8,
            scroll_speed_base: 6.5,
            scroll_speed_step_cap: 15.0,
            scroll_speed_cap: 20.0,
            speed_step: 0.3,
            speed_step_interval: 300,
            speed_creep: 0.0005,
            spawn_interval_min: 40.0,
            spawn_interval_base: 100.0,
            spawn_interval_slope: 3.0,
            spawn_jitter: 20.0,
            platform_w: 160.0,
            platform_h: 50.0,
            platform_gap_min: 0.0,
            platform_gap_max: 0.0,
            moving_platform_chance: 0.0,
            moving_platform_speed: 0.0,
            slide_frames: 50.0,
            round_frames: 60 * 60,
            fever_frames: 300.0,
            effect_frames: 300.0,
            pickup_radius: 50.0,
            meat_bonus_count: 10,
            meat_bonus_frames: 5 * 60,
        }
    }

    /// Balance for the vertical platform jumper variant
    pub fn jumper() -> Self {
        Self {
            view_w: 480.0,
            view_h: 720.0,
            floor_y: 720.0,
            player_w: 40.0,
            player_h: 40.0,
            gravity: 0.4,
            jump_impulse: -10.0,
            second_jump_impulse: -10.0,
            max_jumps: 1,
            move_speed: 5.0,
            friction: 0.8,
            scroll_speed_base: 0.0,
            scroll_speed_step_cap: 0.0,
            scroll_speed_cap: 0.0,
            speed_step: 0.0,
            speed_step_interval: 0,
            speed_creep: 0.0,
            spawn_interval_min: 0.0,
            spawn_interval_base: 0.0,
            spawn_interval_slope: 0.0,
            spawn_jitter: 0.0,
            platform_w: 60.0,
            platform_h: 15.0,
            platform_gap_min: 50.0,
            platform_gap_max: 120.0,
            moving_platform_chance: 0.1,
            moving_platform_speed: 2.0,
            slide_frames: 0.0,
            round_frames: 0,
            fever_frames: 0.0,
            effect_frames: 0.0,
            pickup_radius: 0.0,
            meat_bonus_count: 0,
            meat_bonus_frames: 0,
        }
    }

    /// Preset for a mode
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Runner => Self::runner(),
            GameMode::Jumper => Self::jumper(),
        }
    }

    /// Parse a JSON balance override. Missing fields keep the runner
    /// defaults via `serde(default)`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Player ground rest height (top of the player when standing on the floor)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.floor_y - self.player_h
    }
}
