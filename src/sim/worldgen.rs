//! Procedural platform generation and enemy spawning
//!
//! Generation fills upward band by band ahead of the camera; spawners run
//! every tick and are gated by population caps, a density-scaled skip roll,
//! the start-of-run grace period and safe-radius rejection sampling. Every
//! rejection path degrades to "no spawn this tick": nothing retries across
//! ticks and nothing errors.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyTag};
use super::state::{GameState, Platform, PowerUp, PowerUpKind};
use crate::consts::*;

/// Density skip roll: interpolates between the variant's floor and ceiling
/// skip chance on the live/cap ratio, so spawning gets rarer as the
/// population approaches the cap.
fn skip_roll(live: usize, min_skip: f64, max_skip: f64) -> f64 {
    let ratio = (live as f64 / MAX_TOTAL_ENEMIES as f64).min(1.0);
    min_skip + (max_skip - min_skip) * ratio
}

/// Fill platform bands upward until generation is three viewport heights
/// ahead of the camera or has reached the stop boundary under the surface.
pub fn generate_platforms(state: &mut GameState) {
    let cfg = state.config;
    let boundary = cfg.surface_goal_y + cfg.platform_stop_margin;
    let target = state.camera_y - cfg.height * 3.0;

    while state.frontier_y > target {
        if state.frontier_y <= boundary {
            break;
        }
        let gap = state
            .rng
            .random_range(cfg.platform_gap_min..cfg.platform_gap_max);
        let band_y = state.frontier_y - gap;
        if band_y <= boundary {
            state.frontier_y = band_y;
            break;
        }
        generate_band(state, band_y);
        state.frontier_y = band_y;
    }
}

/// Emit 1-2 platforms at the band height, the first optionally carrying
/// patrol crabs and/or a power-up.
fn generate_band(state: &mut GameState, band_y: f32) {
    let cfg = state.config;
    let count = state.rng.random_range(1..=2);
    for i in 0..count {
        let width = state
            .rng
            .random_range(cfg.platform_width_min..cfg.platform_width_max);
        let height = state.rng.random_range(20.0..40.0) * cfg.scale_y;
        let x = state.rng.random_range(0.0..(cfg.width - width));
        let jitter = state.rng.random_range(-150.0..150.0) * cfg.scale_y;
        let y = band_y + jitter;

        // Attachments only on the band's first platform, only when it is
        // wide enough and far enough from the run start
        let attachable = i == 0
            && width >= cfg.platform_min_attach_width
            && (cfg.seabed_y - y) > cfg.start_safe_zone;
        let spawns_enemies = attachable && state.rng.random_bool(PLATFORM_ENEMY_CHANCE);
        let powerup_roll: f64 = if attachable { state.rng.random() } else { 1.0 };
        let spawns_powerup = powerup_roll < POWERUP_ANY_CHANCE;

        let id = state.next_entity_id();
        let platform = Platform {
            id,
            pos: Vec2::new(x, y),
            width,
            height,
            spawns_enemies,
            spawns_powerup,
            permanent: false,
            to_remove: false,
        };

        if spawns_enemies {
            spawn_crabs(state, &platform);
        }
        if spawns_powerup {
            let kind = if powerup_roll < POWERUP_SHIELD_CHANCE {
                PowerUpKind::Shield
            } else {
                PowerUpKind::Speed
            };
            let pid = state.next_entity_id();
            let pos = Vec2::new(platform.center_x(), platform.top() - 40.0 * cfg.scale);
            state.powerups.push(PowerUp {
                id: pid,
                kind,
                pos,
                base_y: pos.y,
                size: 30.0 * cfg.scale,
                to_remove: false,
            });
        }

        state.platforms.push(platform);
    }
}

/// Put 1-2 patrolling crabs on the platform top, silently skipping any
/// placement inside the player's safe radius.
fn spawn_crabs(state: &mut GameState, platform: &Platform) {
    let cfg = state.config;
    let count = state.rng.random_range(1..=2);
    for _ in 0..count {
        let size = 35.0 * cfg.scale;
        let min_x = platform.left() + size / 2.0;
        let max_x = platform.right() - size / 2.0;
        if min_x >= max_x {
            continue;
        }
        let x = state.rng.random_range(min_x..max_x);
        let pos = Vec2::new(x, platform.top() - size / 2.0);
        if pos.distance(state.player.pos) < cfg.crab_safe_radius {
            continue;
        }
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::crab(id, pos, min_x, max_x, &cfg));
    }
}

/// Common spawn gates: quiet zone near the goal, global and per-variant
/// caps, the density skip roll, and the grace-period skip. Returns false
/// when this tick should not spawn the variant.
fn spawn_gates(state: &mut GameState, tag: EnemyTag, min_skip: f64, max_skip: f64) -> bool {
    let cfg = state.config;
    if state.camera_y - cfg.surface_goal_y < cfg.spawn_quiet_zone {
        return false;
    }
    let live = state.live_enemy_count();
    if live >= MAX_TOTAL_ENEMIES || state.count_tag(tag) >= tag.cap() {
        return false;
    }
    let skip = skip_roll(live, min_skip, max_skip);
    if state.rng.random::<f64>() < skip {
        return false;
    }
    if state.elapsed < GRACE_PERIOD_SECS && state.rng.random_bool(GRACE_PERIOD_SKIP) {
        return false;
    }
    true
}

/// One attempt per tick at a free-swimming hazard above the camera view
pub fn spawn_floating(state: &mut GameState) {
    let cfg = state.config;
    let tag = match state.rng.random_range(0..3) {
        0 => EnemyTag::Jellyfish,
        1 => EnemyTag::Mine,
        _ => EnemyTag::Urchin,
    };
    if !spawn_gates(state, tag, SKIP_CHANCE_FLOATING_MIN, SKIP_CHANCE_FLOATING_MAX) {
        return;
    }

    for _ in 0..SPAWN_ATTEMPTS {
        let x = state.rng.random_range(0.0..cfg.width);
        let y = state.camera_y - state.rng.random_range(0.2..1.0) * cfg.height;
        let pos = Vec2::new(x, y);
        if pos.distance(state.player.pos) < cfg.enemy_safe_radius {
            continue;
        }
        let id = state.next_entity_id();
        let enemy = match tag {
            EnemyTag::Jellyfish => Enemy::jellyfish(id, pos, &cfg),
            EnemyTag::Mine => Enemy::mine(id, pos, &cfg),
            _ => Enemy::urchin(id, pos, &cfg),
        };
        state.enemies.push(enemy);
        return;
    }
}

/// One attempt at a hazard entering at screen height: crossers launch from
/// a random edge, fishhooks drop anchored at a random interior x.
/// Single-shot placement: a draw inside the safe radius spawns nothing.
pub fn spawn_side(state: &mut GameState) {
    let cfg = state.config;
    let tag = match state.rng.random_range(0..4) {
        0 => EnemyTag::SideJellyfish,
        1 => EnemyTag::Shark,
        2 => EnemyTag::Bomb,
        _ => EnemyTag::Fishhook,
    };
    if !spawn_gates(state, tag, SKIP_CHANCE_SIDE_MIN, SKIP_CHANCE_SIDE_MAX) {
        return;
    }

    let y = state.camera_y + state.rng.random_range(0.0..1.0) * cfg.height;

    if tag == EnemyTag::Fishhook {
        let x = state.rng.random_range(0.2..0.8) * cfg.width;
        let pos = Vec2::new(x, y);
        if pos.distance(state.player.pos) < cfg.enemy_safe_radius {
            return;
        }
        let id = state.next_entity_id();
        state.enemies.push(Enemy::fishhook(id, pos, &cfg));
        return;
    }

    let from_left = state.rng.random_bool(0.5);
    let margin = cfg.width * 0.1;
    let x = if from_left { -margin } else { cfg.width + margin };
    let pos = Vec2::new(x, y);
    if pos.distance(state.player.pos) < cfg.enemy_safe_radius {
        return;
    }

    let speed = match tag {
        EnemyTag::SideJellyfish => 1.5 * cfg.scale_x,
        EnemyTag::Shark => 6.0 * cfg.scale_x,
        _ => 2.5 * cfg.scale_x,
    };
    let vx = if from_left { speed } else { -speed };
    let id = state.next_entity_id();
    let enemy = match tag {
        EnemyTag::SideJellyfish => Enemy::side_jellyfish(id, pos, vx, &cfg),
        EnemyTag::Shark => Enemy::shark(id, pos, vx, &cfg),
        _ => Enemy::bomb(id, pos, vx, &cfg),
    };
    state.enemies.push(enemy);
}

/// Hand-placed climb of 16 permanent platforms above the surface. Each
/// entry is (x as a width fraction, height in 180-sy steps above the water
/// line, widened). The five top rungs near the boss are 1.3x wider.
const BOSS_ARENA: [(f32, f32, bool); 16] = [
    (0.05, 1.0, false),
    (0.77, 1.1, false),
    (0.12, 2.4, false),
    (0.42, 2.0, false),
    (0.73, 2.6, false),
    (0.08, 3.8, false),
    (0.52, 3.3, false),
    (0.78, 3.6, false),
    (0.15, 5.0, false),
    (0.38, 4.5, false),
    (0.68, 5.3, false),
    (0.10, 6.5, true),
    (0.45, 6.0, true),
    (0.72, 6.8, true),
    (0.25, 7.8, true),
    (0.58, 7.5, true),
];

/// Install the fixed boss-arena layout above the surface
pub fn install_boss_platforms(state: &mut GameState) {
    let cfg = state.config;
    let base_width = cfg.width * 0.18;
    let step = 180.0 * cfg.scale_y;
    let height = 25.0 * cfg.scale_y;
    for (fx, lift, widened) in BOSS_ARENA {
        let width = if widened { base_width * 1.3 } else { base_width };
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            pos: Vec2::new(fx * cfg.width, cfg.surface_goal_y - lift * step),
            width,
            height,
            spawns_enemies: false,
            spawns_powerup: false,
            permanent: true,
            to_remove: false,
        });
    }
    log::info!("Boss arena installed ({} platforms)", BOSS_ARENA.len());
}
