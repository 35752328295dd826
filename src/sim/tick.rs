//! Per-tick game logic and the run state machine
//!
//! `waiting -> playing <-> paused`, ending in `gameover` or `won`; restart
//! from either terminal state begins a fresh run. The run timer is epoch
//! based: resuming shifts the start epoch forward by the pause duration, so
//! elapsed time excludes paused intervals exactly.
//!
//! Within a playing tick the order is fixed: timers, region and boss-mode
//! management, player physics, generation and spawning, entity updates and
//! collisions (list order, first match), the deferred removal sweep, camera
//! follow, then win/lose checks. Removal is flag-then-sweep; nothing is
//! invalidated mid-tick.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyCtx, EnemyKind};
use super::physics::step_player;
use super::state::{GameEvent, GamePhase, GameState, ParticleKind, PowerUpKind};
use super::worldgen::{generate_platforms, install_boss_platforms, spawn_floating, spawn_side};
use crate::consts::*;
use crate::lerp;

/// Input snapshot for one simulation tick.
///
/// `pause`, `start` and `restart` are edges (true for the tick the action
/// happens); the movement fields are level-triggered. `now` is monotonic
/// seconds from the shell's frame clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    /// World-space steering target; overrides the key fields when set
    pub pointer: Option<Vec2>,
    pub pause: bool,
    pub start: bool,
    pub restart: bool,
    pub now: f64,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Waiting => {
            if input.start {
                start_run(state, input.now);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                // Shift the epoch so the paused interval never counts
                state.started_at += input.now - state.paused_at;
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
        }
        GamePhase::GameOver | GamePhase::Won => {
            if input.restart {
                restart(state, input.now);
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.paused_at = input.now;
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.3}s", state.elapsed);
            } else {
                playing_tick(state, input);
            }
        }
    }
}

fn start_run(state: &mut GameState, now: f64) {
    state.phase = GamePhase::Playing;
    state.started_at = now;
    state.elapsed = 0.0;
    log::info!("Run started (seed {})", state.seed);
}

/// Reinitialize into a fresh playing run, keeping the config and best time
fn restart(state: &mut GameState, now: f64) {
    let seed = state.rng.random::<u64>();
    let mut fresh = GameState::new(seed, state.config);
    fresh.best_time = state.best_time;
    *state = fresh;
    start_run(state, now);
}

fn playing_tick(state: &mut GameState, input: &TickInput) {
    let cfg = state.config;
    state.time_ticks += 1;
    state.elapsed = input.now - state.started_at;

    // Timers
    if state.player.boost_ticks > 0 {
        state.player.boost_ticks -= 1;
        if state.player.boost_ticks == 0 {
            state.player.boost = 1.0;
        }
    }
    state.player.invincible_ticks = state.player.invincible_ticks.saturating_sub(1);

    manage_regions(state);
    heal_in_water(state);

    step_player(state, input);

    // The underwater world stops growing once the surface is crossed
    if !state.boss_mode.active {
        generate_platforms(state);
        spawn_floating(state);
        // Side spawners run twice per tick, matching their higher traffic
        spawn_side(state);
        spawn_side(state);
    }

    update_powerups(state);
    update_enemies(state);
    resolve_enemy_contacts(state);
    check_boss_defeat(state, input.now);
    check_fly_up_win(state, input.now);
    update_particles(state);

    sweep_removals(state);

    // Camera follow
    let target = state.player.pos.y - cfg.height / 2.0;
    state.camera_y = lerp(state.camera_y, target, CAMERA_LERP);
}

/// Surface-crossing latch: first crossing purges the underwater world,
/// installs the boss arena and starts the intro with the player frozen.
fn manage_regions(state: &mut GameState) {
    let cfg = state.config;

    if cfg.boss_enabled && !state.boss_mode.active && state.player.pos.y < cfg.surface_goal_y {
        state.boss_mode.active = true;
        log::info!("Surface reached at {:.3}s, boss engaging", state.elapsed);

        for enemy in &mut state.enemies {
            enemy.to_remove = true;
        }
        for platform in &mut state.platforms {
            if !platform.permanent {
                platform.to_remove = true;
            }
        }
        for powerup in &mut state.powerups {
            powerup.to_remove = true;
        }
        install_boss_platforms(state);

        let id = state.next_entity_id();
        let spawn = Vec2::new(cfg.width / 2.0, cfg.boss_rest_y() - cfg.height);
        state.enemies.push(Enemy::boss(id, spawn, &cfg));
        state.boss_mode.spawned = true;
        state.boss_mode.intro = true;

        state.player.pos.y = cfg.surface_goal_y;
        state.player.vel = Vec2::ZERO;
        state.player.frozen = true;
    }

    // Unfreeze once the descent finishes
    if state.boss_mode.intro {
        let intro_done = state.enemies.iter().any(|e| match &e.kind {
            EnemyKind::Boss(b) => !b.intro,
            _ => false,
        });
        if intro_done {
            state.boss_mode.intro = false;
            state.player.frozen = false;
        }
    }
}

/// Dipping back underwater during the boss fight slowly restores lives
fn heal_in_water(state: &mut GameState) {
    let submerged = state.boss_mode.active
        && !state.boss_mode.intro
        && state.is_underwater(state.player.pos.y)
        && state.lives < STARTING_LIVES;
    if submerged {
        state.water_heal_ticks += 1;
        if state.water_heal_ticks >= WATER_HEAL_TICKS {
            state.water_heal_ticks = 0;
            state.lives += 1;
            state.push_event(GameEvent::LifeHealed);
            log::info!("Life restored in the water ({} lives)", state.lives);
        }
    } else {
        state.water_heal_ticks = 0;
    }
}

fn update_powerups(state: &mut GameState) {
    let time_ticks = state.time_ticks;
    let mut powerups = std::mem::take(&mut state.powerups);
    for powerup in powerups.iter_mut() {
        if powerup.to_remove {
            continue;
        }
        powerup.update(time_ticks);
        if state.player.overlaps(powerup.pos, powerup.size, 0.8) {
            powerup.to_remove = true;
            match powerup.kind {
                PowerUpKind::Speed => {
                    state.player.boost = BOOST_MULTIPLIER;
                    state.player.boost_ticks = BOOST_TICKS;
                }
                PowerUpKind::Shield => {
                    state.player.shield = true;
                }
            }
            particle_burst(state, powerup.pos, ParticleKind::Spark, 6);
            state.push_event(GameEvent::PowerUpCollected(powerup.kind));
        }
    }
    state.powerups = powerups;
}

fn update_enemies(state: &mut GameState) {
    let ctx = EnemyCtx {
        config: state.config,
        player_pos: state.player.pos,
        player_vel: state.player.vel,
        camera_y: state.camera_y,
        time_ticks: state.time_ticks,
    };
    let mut spawned = Vec::new();
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        if enemy.to_remove {
            continue;
        }
        enemy.update(&ctx, &mut state.rng, &mut spawned, &mut state.events);
    }
    state.enemies = enemies;
    for mut enemy in spawned {
        enemy.id = state.next_entity_id();
        state.enemies.push(enemy);
    }
}

/// Contact resolution. Ordinary hazards are consumed on contact and run the
/// player's hit logic; the boss takes damage instead and is never removed
/// here, and a bomb lights its fuse and lingers as a spent blast. Repeated
/// contacts inside the invincibility window are no-ops.
fn resolve_enemy_contacts(state: &mut GameState) {
    let mut contacts = 0u32;
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        if enemy.to_remove || !enemy.collides_with_player(&state.player) {
            continue;
        }
        match &mut enemy.kind {
            EnemyKind::Boss(boss) => {
                if boss.take_damage() {
                    log::info!("Boss rammed, health {}", boss.health);
                }
                contacts += 1;
            }
            EnemyKind::Bomb { fuse, .. } => {
                *fuse = Some(30);
                contacts += 1;
            }
            _ => {
                enemy.to_remove = true;
                contacts += 1;
            }
        }
    }
    state.enemies = enemies;
    for _ in 0..contacts {
        apply_hit(state);
    }
}

/// One point of player damage: shield first, then a life; lives at zero
/// ends the run.
fn apply_hit(state: &mut GameState) {
    if state.player.is_invincible() {
        return;
    }
    state.player.invincible_ticks = INVINCIBLE_TICKS;
    state.water_heal_ticks = 0;
    if state.player.shield {
        state.player.shield = false;
        particle_burst(state, state.player.pos, ParticleKind::Spark, 8);
        state.push_event(GameEvent::ShieldBreak);
        return;
    }
    state.lives = state.lives.saturating_sub(1);
    particle_burst(state, state.player.pos, ParticleKind::Splash, 12);
    state.push_event(GameEvent::Hit);
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver);
        log::info!("Game over at {:.3}s", state.elapsed);
    }
}

fn check_boss_defeat(state: &mut GameState, now: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let mut defeated = false;
    for enemy in &mut state.enemies {
        if let EnemyKind::Boss(boss) = &enemy.kind {
            if boss.health <= 0 && !enemy.to_remove {
                enemy.to_remove = true;
                defeated = true;
            }
        }
    }
    if defeated {
        state.push_event(GameEvent::BossDefeated);
        log::info!("Boss defeated");
        trigger_win(state, now);
    }
}

/// Non-boss variant: sustained ascent past the surface goal wins the run
fn check_fly_up_win(state: &mut GameState, now: f64) {
    if state.config.boss_enabled || state.phase != GamePhase::Playing {
        return;
    }
    if state.player.pos.y < state.config.surface_goal_y && state.player.vel.y < 0.0 {
        state.fly_up_ticks += 1;
        if state.fly_up_ticks >= FLY_UP_TICKS {
            trigger_win(state, now);
        }
    } else {
        state.fly_up_ticks = 0;
    }
}

fn trigger_win(state: &mut GameState, now: f64) {
    let time = now - state.started_at;
    state.elapsed = time;
    let new_record = state.best_time.is_none_or(|best| time < best);
    if new_record {
        state.best_time = Some(time);
    }
    state.phase = GamePhase::Won;
    state.push_event(GameEvent::Win { time, new_record });
    log::info!("Run won in {:.3}s (record: {})", time, new_record);
}

/// Cosmetic burst for hits, shield breaks and collections
fn particle_burst(state: &mut GameState, pos: Vec2, kind: ParticleKind, count: usize) {
    let scale = state.config.scale;
    for _ in 0..count {
        let vel = Vec2::new(
            state.fx_rng.random_range(-2.5..2.5),
            state.fx_rng.random_range(-2.5..2.5),
        ) * scale;
        state.spawn_particle(pos, vel, kind);
    }
}

/// Cosmetic bubbles and particle aging, fed from the cosmetic RNG stream
fn update_particles(state: &mut GameState) {
    let cfg = state.config;
    let swimming = state.is_underwater(state.player.pos.y)
        && state.player.vel.length_squared() > (2.0 * cfg.scale).powi(2);
    if swimming && state.fx_rng.random_bool(0.3) {
        let jitter = Vec2::new(
            state.fx_rng.random_range(-10.0..10.0) * cfg.scale,
            state.fx_rng.random_range(-5.0..5.0) * cfg.scale,
        );
        let vel = Vec2::new(0.0, state.fx_rng.random_range(-1.5..-0.5) * cfg.scale_y);
        let pos = state.player.pos + jitter;
        state.spawn_particle(pos, vel, ParticleKind::Bubble);
    }
    state.particles.retain_mut(|p| p.update());
}

/// End-of-tick sweep: flag far-off entities, then drop everything flagged
fn sweep_removals(state: &mut GameState) {
    let cfg = state.config;
    let camera_y = state.camera_y;
    let despawn_line = camera_y + cfg.height + PLATFORM_DESPAWN_MARGIN;

    for platform in &mut state.platforms {
        if !platform.permanent && platform.top() > despawn_line {
            platform.to_remove = true;
        }
    }
    for enemy in &mut state.enemies {
        if enemy.out_of_bounds(camera_y, &cfg) {
            enemy.to_remove = true;
        }
    }
    for powerup in &mut state.powerups {
        if powerup.pos.y > despawn_line {
            powerup.to_remove = true;
        }
    }

    state.platforms.retain(|p| !p.to_remove);
    state.enemies.retain(|e| !e.to_remove);
    state.powerups.retain(|p| !p.to_remove);
}
