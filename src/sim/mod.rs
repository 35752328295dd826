//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, ids allocated once)
//! - No rendering or platform dependencies

pub mod boss;
pub mod enemy;
pub mod physics;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use boss::{BossMode, BossState, phase_for_health};
pub use enemy::{Enemy, EnemyKind, EnemyTag};
pub use state::{
    GameEvent, GamePhase, GameState, Hud, Particle, ParticleKind, Platform, Player, PowerUp,
    PowerUpKind,
};
pub use tick::{TickInput, tick};
