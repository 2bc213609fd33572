//! Deterministic game simulation
//!
//! The whole game lives in [`WorldState`] and advances only through
//! [`tick`]. Given the same seed, balance and input sequence, two runs
//! produce identical worlds; the renderer and HUD are pure readers.

pub mod collision;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::CollisionEvent;
pub use rect::Rect;
pub use state::{
    ActiveEffects, CollectibleKind, EffectKind, Entity, EntityKind, GamePhase, Player,
    PlayerPose, WorldState,
};
pub use tick::{TickInput, tick};
