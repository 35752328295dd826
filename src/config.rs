//! Viewport-scaled tunables
//!
//! Built once per run from the viewport dimensions and read-only afterwards.
//! Every distance-like constant scales with the viewport so the simulation
//! plays identically at any resolution.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// All viewport-derived tuning values for a run.
///
/// `scale_x`/`scale_y` are the ratios against the reference viewport;
/// `scale` is their minimum and is used for isotropic sizes (entity radii,
/// safe-spawn distances).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale: f32,

    /// Boss-fight variant when true; sustained-ascent win variant when false
    pub boss_enabled: bool,

    // Player
    pub player_size: f32,
    pub player_accel: f32,
    pub player_max_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    /// Gravity above the water surface in boss mode
    pub air_gravity: f32,
    /// Upward speed cap above the surface
    pub air_up_speed_cap: f32,
    /// Pointer steering ignores targets closer than this
    pub pointer_dead_zone: f32,

    // World layout
    pub surface_goal_y: f32,
    pub seabed_y: f32,

    // Platform generation
    pub platform_gap_min: f32,
    pub platform_gap_max: f32,
    pub platform_width_min: f32,
    pub platform_width_max: f32,
    /// Minimum width for a platform to carry enemies or power-ups
    pub platform_min_attach_width: f32,
    /// Generation stops this far above the surface goal
    pub platform_stop_margin: f32,
    /// No enemy attachments this close to the run start
    pub start_safe_zone: f32,
    pub crab_safe_radius: f32,

    // Enemy spawning
    pub enemy_safe_radius: f32,
    /// Spawners go quiet this close to the surface goal
    pub spawn_quiet_zone: f32,

    // Boss
    pub boss_size: f32,
    pub boss_descent_speed: f32,
    /// Boss rest height above the surface line
    pub boss_rest_offset: f32,
    /// Ceiling for evasive climbing above the rest line
    pub boss_evade_ceiling: f32,
    pub boss_bob_amplitude: f32,
    pub fireball_size: f32,
    pub fireball_speed: f32,
    /// Fast-ascent threshold that triggers boss evasion
    pub boss_evade_trigger_vy: f32,

    // Boss-mode water column
    /// Player cannot sink deeper than this below the surface
    pub max_depth_margin: f32,
    /// Buoyancy kicks in below this depth
    pub buoyancy_margin: f32,
}

impl Config {
    /// Derive a config for the given viewport. Sea level sits at the bottom
    /// of the initial view; the surface goal is a long climb above it.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let scale_x = width / REFERENCE_WIDTH;
        let scale_y = height / REFERENCE_HEIGHT;
        let scale = scale_x.min(scale_y);

        Self {
            width,
            height,
            scale_x,
            scale_y,
            scale,

            boss_enabled: true,

            player_size: 50.0 * scale,
            player_accel: 2.5 * scale,
            player_max_speed: 28.0 * scale_x,
            jump_power: 18.0 * scale_y,
            gravity: 0.3 * scale_y,
            air_gravity: 0.2 * scale_y,
            air_up_speed_cap: 20.0 * scale_y,
            pointer_dead_zone: 10.0 * scale,

            surface_goal_y: -20000.0 * scale_y,
            seabed_y: height - 30.0 * scale_y,

            platform_gap_min: 300.0 * scale_y,
            platform_gap_max: 600.0 * scale_y,
            platform_width_min: 200.0 * scale_x,
            platform_width_max: 500.0 * scale_x,
            platform_min_attach_width: 150.0 * scale_x,
            platform_stop_margin: 500.0 * scale_y,
            start_safe_zone: 800.0 * scale,
            crab_safe_radius: 250.0 * scale,

            enemy_safe_radius: 500.0 * scale,
            spawn_quiet_zone: 1000.0 * scale_y,

            boss_size: 150.0 * scale,
            boss_descent_speed: 3.0 * scale_y,
            boss_rest_offset: 400.0 * scale_y,
            boss_evade_ceiling: 600.0 * scale_y,
            boss_bob_amplitude: 20.0 * scale_y,
            fireball_size: 30.0 * scale,
            fireball_speed: 8.0 * scale,
            boss_evade_trigger_vy: -5.0 * scale_y,

            max_depth_margin: 500.0 * scale_y,
            buoyancy_margin: 350.0 * scale_y,
        }
    }

    /// The y the boss settles at after its intro descent
    pub fn boss_rest_y(&self) -> f32 {
        self.surface_goal_y - self.boss_rest_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_viewport_has_unit_scale() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        assert!((cfg.scale_x - 1.0).abs() < 1e-6);
        assert!((cfg.scale_y - 1.0).abs() < 1e-6);
        assert!((cfg.scale - 1.0).abs() < 1e-6);
        assert!((cfg.player_size - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_is_min_axis() {
        let cfg = Config::for_viewport(960.0, 980.0);
        assert!((cfg.scale_x - 0.5).abs() < 1e-6);
        assert!((cfg.scale_y - 1.0).abs() < 1e-6);
        assert!((cfg.scale - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_goal_is_above_seabed() {
        let cfg = Config::for_viewport(1280.0, 720.0);
        assert!(cfg.surface_goal_y < cfg.seabed_y);
        assert!(cfg.boss_rest_y() < cfg.surface_goal_y);
    }
}
