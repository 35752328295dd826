//! Player movement and platform collision
//!
//! One regime pipeline per tick, in a fixed order: control impulses, drag,
//! gravity, the boss-mode water column (depth clamp and buoyancy), the
//! velocity clamp, integration, horizontal wrap, seabed clamp, and platform
//! resolution last. Platforms resolve first-match in list order; top/bottom
//! and side outcomes are mutually exclusive per platform per tick.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Advance the player one tick
pub fn step_player(state: &mut GameState, input: &TickInput) {
    let cfg = state.config;
    let underwater = state.is_underwater(state.player.pos.y);
    let in_air = state.boss_mode.active && !underwater;
    let player = &mut state.player;
    let half = player.size / 2.0;

    if player.frozen {
        // Intro lock: held in place at the surface line
        player.vel = Vec2::ZERO;
        player.jump_held = input.jump;
        return;
    }

    // Control impulses; pointer target overrides the keys
    let accel = cfg.player_accel * player.boost;
    match input.pointer {
        Some(target) => {
            let delta = target - player.pos;
            if delta.length() > cfg.pointer_dead_zone {
                player.vel += delta.normalize() * accel;
            }
        }
        None => {
            if input.left {
                player.vel.x -= accel;
            }
            if input.right {
                player.vel.x += accel;
            }
            if input.up {
                player.vel.y -= accel;
            }
            if input.down {
                player.vel.y += accel;
            }
        }
    }

    // Jump fires once per press, only when standing in the air regime
    if in_air && player.grounded && input.jump && !player.jump_held {
        player.vel.y = -cfg.jump_power;
        player.grounded = false;
    }
    player.jump_held = input.jump;

    // Drag
    if underwater {
        player.vel *= FRICTION * WATER_RESISTANCE;
    } else {
        player.vel.x *= if player.grounded {
            AIR_DRAG_GROUNDED
        } else {
            AIR_DRAG_FREE
        };
        player.vel.y *= AIR_DRAG_VERTICAL;
    }

    // Gravity
    if underwater {
        player.vel.y += cfg.gravity;
    } else {
        player.vel.y += cfg.air_gravity;
        player.vel.y = player.vel.y.max(-cfg.air_up_speed_cap);
    }

    // Boss-mode water column: shallow dives only, pushed back up
    if state.boss_mode.active && underwater {
        let floor = cfg.surface_goal_y + cfg.max_depth_margin;
        let buoy_line = cfg.surface_goal_y + cfg.buoyancy_margin;
        if player.pos.y > buoy_line {
            player.vel.y -= 0.03 * (player.pos.y - buoy_line);
        }
        if player.pos.y > floor {
            player.pos.y = floor;
            player.vel.y = player.vel.y.min(0.0);
        }
    }

    // Velocity clamp
    let max = cfg.player_max_speed * player.boost;
    player.vel.x = player.vel.x.clamp(-max, max);
    player.vel.y = player.vel.y.clamp(-max * 1.5, max * 1.5);

    // Integrate
    player.pos += player.vel;

    // Horizontal wrap at the viewport edges
    if player.pos.x < 0.0 {
        player.pos.x += cfg.width;
    } else if player.pos.x > cfg.width {
        player.pos.x -= cfg.width;
    }

    // Grounding is re-derived every tick
    player.grounded = false;
    player.on_platform = None;

    // Seabed clamp
    if player.pos.y + half > cfg.seabed_y {
        player.pos.y = cfg.seabed_y - half;
        player.vel.y = 0.0;
        player.grounded = true;
    }

    // Platform resolution, first match in list order
    for platform in &state.platforms {
        let overlaps_x =
            player.pos.x + half > platform.left() && player.pos.x - half < platform.right();
        let overlaps_y =
            player.pos.y + half > platform.top() && player.pos.y - half < platform.bottom();
        if !(overlaps_x && overlaps_y) {
            continue;
        }

        let prev_bottom = player.pos.y + half - player.vel.y;
        let prev_top = player.pos.y - half - player.vel.y;
        if player.vel.y >= 0.0 && prev_bottom <= platform.top() {
            // Landed on top
            player.pos.y = platform.top() - half;
            player.vel.y = 0.0;
            player.grounded = true;
            player.on_platform = Some(platform.id);
        } else if player.vel.y < 0.0 && prev_top >= platform.bottom() {
            // Bumped the underside
            player.pos.y = platform.bottom() + half;
            player.vel.y = 0.0;
        } else {
            // Side push with a dampened bounce
            if player.pos.x < platform.center_x() {
                player.pos.x = platform.left() - half;
            } else {
                player.pos.x = platform.right() + half;
            }
            player.vel.x *= -0.5;
        }
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::sim::state::{GamePhase, Platform};

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Config::for_viewport(1920.0, 980.0));
        state.phase = GamePhase::Playing;
        state
    }

    fn platform(state: &mut GameState, x: f32, y: f32, w: f32) -> u32 {
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            pos: Vec2::new(x, y),
            width: w,
            height: 30.0,
            spawns_enemies: false,
            spawns_powerup: false,
            permanent: false,
            to_remove: false,
        });
        id
    }

    #[test]
    fn test_lands_on_platform_from_above() {
        let mut state = playing_state();
        let id = platform(&mut state, 800.0, 500.0, 300.0);
        state.player.pos = Vec2::new(950.0, 470.0);
        state.player.vel = Vec2::new(0.0, 12.0);
        step_player(&mut state, &TickInput::default());
        assert_eq!(state.player.on_platform, Some(id));
        assert!(state.player.grounded);
        assert_eq!(state.player.vel.y, 0.0);
        assert!((state.player.pos.y + state.player.size / 2.0 - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_bumps_platform_underside() {
        let mut state = playing_state();
        platform(&mut state, 800.0, 500.0, 300.0);
        state.player.pos = Vec2::new(950.0, 565.0);
        state.player.vel = Vec2::new(0.0, -14.0);
        step_player(&mut state, &TickInput::default());
        assert!(state.player.vel.y >= 0.0);
        assert!(state.player.pos.y - state.player.size / 2.0 >= 530.0 - 1e-3);
        assert!(!state.player.grounded);
    }

    #[test]
    fn test_side_push_reverses_and_dampens_vx() {
        let mut state = playing_state();
        platform(&mut state, 800.0, 500.0, 300.0);
        // Approach from the left, vertically centered on the platform
        state.player.pos = Vec2::new(790.0, 515.0);
        state.player.vel = Vec2::new(10.0, 0.0);
        step_player(&mut state, &TickInput::default());
        assert!(state.player.vel.x < 0.0);
        assert!(state.player.pos.x + state.player.size / 2.0 <= 800.0 + 1e-3);
    }

    #[test]
    fn test_seabed_grounds_player() {
        let mut state = playing_state();
        state.player.vel = Vec2::new(0.0, 50.0);
        state.player.pos.y = state.config.seabed_y - 10.0;
        step_player(&mut state, &TickInput::default());
        assert!(state.player.grounded);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut state = playing_state();
        state.player.pos = Vec2::new(2.0, 500.0);
        state.player.vel = Vec2::new(-10.0, 0.0);
        step_player(&mut state, &TickInput::default());
        assert!(state.player.pos.x > state.config.width - 30.0);
    }

    #[test]
    fn test_pointer_dead_zone_ignores_close_targets() {
        let mut state = playing_state();
        state.player.pos = Vec2::new(960.0, 500.0);
        let input = TickInput {
            pointer: Some(Vec2::new(962.0, 500.0)),
            ..TickInput::default()
        };
        step_player(&mut state, &input);
        // Drag and gravity only, no sideways impulse
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_buoyancy_pushes_up_in_boss_water_column() {
        let mut state = playing_state();
        state.boss_mode.active = true;
        let cfg = state.config;
        state.player.pos = Vec2::new(960.0, cfg.surface_goal_y + cfg.buoyancy_margin + 100.0);
        state.player.vel = Vec2::ZERO;
        step_player(&mut state, &TickInput::default());
        assert!(state.player.vel.y < 0.0);
    }

    #[test]
    fn test_depth_clamp_in_boss_water_column() {
        let mut state = playing_state();
        state.boss_mode.active = true;
        let cfg = state.config;
        state.player.pos = Vec2::new(960.0, cfg.surface_goal_y + cfg.max_depth_margin + 400.0);
        state.player.vel = Vec2::new(0.0, 20.0);
        step_player(&mut state, &TickInput::default());
        assert!(state.player.pos.y <= cfg.surface_goal_y + cfg.max_depth_margin + 1e-3);
        assert!(state.player.vel.y <= 0.0);
    }

    mod clamp_invariant {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn velocity_never_exceeds_clamp(
                vx in -500.0f32..500.0,
                vy in -500.0f32..500.0,
                y in -25_000.0f32..900.0,
                left in proptest::bool::ANY,
                right in proptest::bool::ANY,
                up in proptest::bool::ANY,
                down in proptest::bool::ANY,
            ) {
                let mut state = playing_state();
                state.player.pos = Vec2::new(960.0, y);
                state.player.vel = Vec2::new(vx, vy);
                let input = TickInput { left, right, up, down, ..TickInput::default() };
                step_player(&mut state, &input);
                let max = state.config.player_max_speed * state.player.boost;
                prop_assert!(state.player.vel.x.abs() <= max + 1e-3);
                prop_assert!(state.player.vel.y.abs() <= max * 1.5 + 1e-3);
            }
        }
    }
}
