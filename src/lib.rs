//! Tideward - a vertical-climb arcade simulation
//!
//! A small organism climbs from the seabed toward the water surface while
//! dodging procedurally spawned hazards, then faces a multi-phase sun boss
//! above the waves. This crate is the simulation core only:
//!
//! - `sim`: deterministic fixed-tick simulation (physics, world generation,
//!   boss encounter, game state machine)
//! - `config`: viewport-scaled tunables
//! - `besttime`: best-completion-time persistence
//!
//! Rendering, audio and input devices are external collaborators: they feed
//! a [`sim::TickInput`] each tick and read the public entity lists and the
//! [`sim::Hud`] snapshot back out.

pub mod besttime;
pub mod config;
pub mod sim;

pub use config::Config;

/// Scale-invariant tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per render callback)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Reference viewport the scale factors are derived against
    pub const REFERENCE_WIDTH: f32 = 1920.0;
    pub const REFERENCE_HEIGHT: f32 = 980.0;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u8 = 3;

    /// Player drag regimes (underwater)
    pub const FRICTION: f32 = 0.92;
    pub const WATER_RESISTANCE: f32 = 0.97;
    /// Horizontal drag above the surface while standing on a platform
    pub const AIR_DRAG_GROUNDED: f32 = 0.85;
    /// Horizontal drag above the surface while airborne
    pub const AIR_DRAG_FREE: f32 = 0.98;
    /// Vertical drag above the surface (near none, jumps carry)
    pub const AIR_DRAG_VERTICAL: f32 = 0.995;

    /// Speed power-up multiplier and duration in ticks
    pub const BOOST_MULTIPLIER: f32 = 1.8;
    pub const BOOST_TICKS: u32 = 300;
    /// Invincibility window after taking a hit
    pub const INVINCIBLE_TICKS: u32 = 96;

    /// Hard cap on live enemies; spawners skip entirely at the cap
    pub const MAX_TOTAL_ENEMIES: usize = 20;
    /// Density-scaled skip chances: at 0 enemies the skip roll is the MIN,
    /// at the cap it is the MAX, so spawning gets less likely as the
    /// population grows.
    pub const SKIP_CHANCE_FLOATING_MIN: f64 = 0.80;
    pub const SKIP_CHANCE_FLOATING_MAX: f64 = 0.995;
    pub const SKIP_CHANCE_SIDE_MIN: f64 = 0.75;
    pub const SKIP_CHANCE_SIDE_MAX: f64 = 0.99;
    /// Retry attempts for safe-radius placement before giving up
    pub const SPAWN_ATTEMPTS: u32 = 10;
    /// Reduced spawn rate for the first seconds of a run
    pub const GRACE_PERIOD_SECS: f64 = 3.0;
    pub const GRACE_PERIOD_SKIP: f64 = 0.5;

    /// Chance that a platform cluster carries patrol enemies
    pub const PLATFORM_ENEMY_CHANCE: f64 = 0.4;
    /// Single roll: < SHIELD is a shield, < ANY is a speed boost, else none
    pub const POWERUP_SHIELD_CHANCE: f64 = 0.05;
    pub const POWERUP_ANY_CHANCE: f64 = 0.15;

    /// Enemies are culled this many viewport heights from the camera
    pub const ENEMY_REMOVAL_SCREENS: f32 = 2.5;
    /// Platforms despawn this far below the camera view
    pub const PLATFORM_DESPAWN_MARGIN: f32 = 200.0;

    /// Boss health and phase thresholds (phase advances at or below)
    pub const BOSS_MAX_HEALTH: i32 = 20;
    pub const BOSS_PHASE2_BELOW: i32 = 13;
    pub const BOSS_PHASE3_BELOW: i32 = 6;
    /// Attack cooldowns per phase, in ticks
    pub const BOSS_COOLDOWNS: [u32; 3] = [120, 80, 60];
    /// Fireball spread step per phase, radians
    pub const BOSS_SPREADS: [f32; 3] = [0.0, 0.3, 0.25];
    /// Grace delay before the first attack after the intro
    pub const BOSS_FIRST_ATTACK_DELAY: u32 = 60;
    /// Boss invincibility window after taking damage
    pub const BOSS_HIT_INVINCIBLE_TICKS: u32 = 30;
    /// Ticks of fast ascent before the boss starts evading upward
    pub const BOSS_EVASION_DELAY: u32 = 20;
    pub const FIREBALL_LIFE_TICKS: u32 = 300;

    /// Submerged ticks per healed life in boss mode (5 s at 60 Hz)
    pub const WATER_HEAL_TICKS: u32 = 300;

    /// Sustained-ascent ticks before the non-boss variant wins
    pub const FLY_UP_TICKS: u32 = 120;

    /// Camera follow lerp factor per tick
    pub const CAMERA_LERP: f32 = 0.1;

    /// Cosmetic particle cap
    pub const MAX_PARTICLES: usize = 256;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Split a duration in seconds into HUD components (minutes, seconds, millis)
pub fn time_parts(secs: f64) -> (u32, u32, u32) {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor() as u32;
    let whole = (secs % 60.0).floor() as u32;
    let millis = ((secs % 1.0) * 1000.0).floor() as u32;
    (minutes, whole, millis)
}

/// Format a duration as `M:SS.mmm` for the HUD
pub fn format_time(secs: f64) -> String {
    let (m, s, ms) = time_parts(secs);
    format!("{}:{:02}.{:03}", m, s, ms)
}
