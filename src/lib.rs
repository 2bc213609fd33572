//! Tiger Run - simulation core for two canvas arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `tuning`: Data-driven game balance (per-variant tunables)
//! - `settings`: Player preferences read by the external renderer/HUD
//!
//! Rendering, input translation, HUD updates and lifecycle scheduling are
//! owned by external collaborators; they drive the core through
//! [`sim::tick`] and read [`sim::WorldState`] between ticks.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{GameMode, Tunables};

/// Frame timing constants
pub mod consts {
    /// Baseline frame interval in milliseconds (60 Hz reference frame)
    pub const FRAME_UNIT_MS: f32 = 1000.0 / 60.0;
    /// Largest normalized dt a single tick will accept. A backgrounded tab
    /// can deliver a multi-second gap; stepping that in one go tunnels the
    /// player through obstacles.
    pub const MAX_FRAME_SCALE: f32 = 4.0;
}

/// Convert an elapsed wall-clock interval (milliseconds) into normalized
/// frame units (1.0 = one 60 Hz frame), clamped to [`consts::MAX_FRAME_SCALE`].
#[inline]
pub fn normalize_dt(elapsed_ms: f64) -> f32 {
    let dt = (elapsed_ms as f32) / consts::FRAME_UNIT_MS;
    dt.clamp(0.0, consts::MAX_FRAME_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dt_baseline() {
        let dt = normalize_dt(1000.0 / 60.0);
        assert!((dt - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_dt_clamps_long_gaps() {
        assert_eq!(normalize_dt(5000.0), consts::MAX_FRAME_SCALE);
        assert_eq!(normalize_dt(-3.0), 0.0);
    }
}
