//! The sun boss encounter
//!
//! The boss is an [`Enemy`](super::enemy::Enemy) variant; this module holds
//! its state machine. Lifecycle: created one viewport above its rest height
//! when the player first crosses the surface, descends during the intro,
//! then cycles aimed fireball attacks whose count and cadence follow a pure
//! function of remaining health.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyCtx};
use super::state::GameEvent;
use crate::consts::*;
use crate::lerp;

/// Attack phase for the given health: 1 while above 13, 2 while above 6,
/// 3 at or below. Pure so the HUD and the attack loop can never disagree.
pub fn phase_for_health(health: i32) -> u8 {
    if health > BOSS_PHASE2_BELOW {
        1
    } else if health > BOSS_PHASE3_BELOW {
        2
    } else {
        3
    }
}

/// Surface-crossing latches, held on the game state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossMode {
    /// One-way latch: the player has crossed the surface
    pub active: bool,
    /// The boss entity has been created
    pub spawned: bool,
    /// Intro descent in progress; the player is frozen until it ends
    pub intro: bool,
}

/// Boss behavior state, carried inside `EnemyKind::Boss`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub health: i32,
    /// Descending to the rest height; no attacks yet
    pub intro: bool,
    /// Ticks until the next attack
    pub cooldown: u32,
    /// Damage invincibility window
    pub hit_invincible: u32,
    /// Eased vertical anchor the bob rides on
    pub base_y: f32,
    /// Evasive climb above the rest line, 0 when not evading
    pub evade_offset: f32,
    /// Consecutive ticks the player has been ascending fast
    pub ascent_ticks: u32,
    pub last_phase: u8,
}

impl BossState {
    pub fn new() -> Self {
        Self {
            health: BOSS_MAX_HEALTH,
            intro: true,
            cooldown: 0,
            hit_invincible: 0,
            base_y: 0.0,
            evade_offset: 0.0,
            ascent_ticks: 0,
            last_phase: 1,
        }
    }

    pub fn phase(&self) -> u8 {
        phase_for_health(self.health)
    }

    /// Apply one point of damage. Returns false while the invincibility
    /// window from the previous hit is still open.
    pub fn take_damage(&mut self) -> bool {
        if self.hit_invincible > 0 {
            return false;
        }
        self.health -= 1;
        self.hit_invincible = BOSS_HIT_INVINCIBLE_TICKS;
        true
    }

    pub fn update(
        &mut self,
        pos: &mut Vec2,
        size: f32,
        ctx: &EnemyCtx,
        rng: &mut Pcg32,
        spawned: &mut Vec<Enemy>,
        events: &mut Vec<GameEvent>,
    ) {
        let cfg = &ctx.config;
        let rest_y = cfg.boss_rest_y();
        self.hit_invincible = self.hit_invincible.saturating_sub(1);

        if self.intro {
            pos.y += cfg.boss_descent_speed;
            if pos.y >= rest_y {
                pos.y = rest_y;
                self.base_y = rest_y;
                self.intro = false;
                self.cooldown = BOSS_FIRST_ATTACK_DELAY;
                log::info!("Boss descent complete, engaging");
            }
            return;
        }

        // Evasive climb when the player keeps rushing upward
        if ctx.player_vel.y < cfg.boss_evade_trigger_vy {
            self.ascent_ticks += 1;
        } else {
            self.ascent_ticks = 0;
        }
        if self.ascent_ticks >= BOSS_EVASION_DELAY && rng.random_bool(0.4) {
            self.evade_offset =
                (self.evade_offset - ctx.player_vel.y * 0.4).min(cfg.boss_evade_ceiling);
        } else {
            self.evade_offset = lerp(self.evade_offset, 0.0, 0.02);
        }

        self.base_y = lerp(self.base_y, rest_y - self.evade_offset, 0.05);
        let bob = (ctx.time_ticks as f32 * 0.03).sin() * cfg.boss_bob_amplitude;
        pos.y = self.base_y + bob;
        pos.x = lerp(pos.x, cfg.width / 2.0, 0.02);

        let phase = self.phase();
        if phase != self.last_phase {
            log::info!("Boss phase {} -> {} (health {})", self.last_phase, phase, self.health);
            self.last_phase = phase;
            events.push(GameEvent::BossPhaseChanged(phase));
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
        } else {
            self.fire(*pos, size, ctx, spawned);
            self.cooldown = BOSS_COOLDOWNS[phase as usize - 1];
        }
    }

    /// Launch the phase's fireball fan, aimed at the player
    fn fire(&self, pos: Vec2, size: f32, ctx: &EnemyCtx, spawned: &mut Vec<Enemy>) {
        let cfg = &ctx.config;
        let phase = self.phase();
        let count = match phase {
            1 => 1,
            2 => 3,
            _ => 5,
        };
        let spread = BOSS_SPREADS[phase as usize - 1];
        let aim = (ctx.player_pos - pos).to_angle();
        let half = (count - 1) as f32 / 2.0;
        for i in 0..count {
            let angle = aim + (i as f32 - half) * spread;
            let vel = Vec2::from_angle(angle) * cfg.fireball_speed;
            let muzzle = pos + Vec2::from_angle(angle) * size * 0.5;
            spawned.push(Enemy::fireball(muzzle, vel, cfg));
        }
    }
}

impl Default for BossState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use rand::SeedableRng;

    fn ctx() -> EnemyCtx {
        let config = Config::for_viewport(1920.0, 980.0);
        EnemyCtx {
            player_pos: Vec2::new(config.width / 2.0, config.surface_goal_y + 100.0),
            player_vel: Vec2::ZERO,
            camera_y: config.surface_goal_y,
            time_ticks: 0,
            config,
        }
    }

    #[test]
    fn test_phase_is_pure_function_of_health() {
        assert_eq!(phase_for_health(14), 1);
        assert_eq!(phase_for_health(13), 2);
        assert_eq!(phase_for_health(7), 2);
        assert_eq!(phase_for_health(6), 3);
        assert_eq!(phase_for_health(1), 3);
    }

    #[test]
    fn test_damage_opens_invincibility_window() {
        let mut boss = BossState::new();
        assert!(boss.take_damage());
        assert_eq!(boss.health, BOSS_MAX_HEALTH - 1);
        // Window still open, second hit ignored
        assert!(!boss.take_damage());
        assert_eq!(boss.health, BOSS_MAX_HEALTH - 1);
        boss.hit_invincible = 0;
        assert!(boss.take_damage());
        assert_eq!(boss.health, BOSS_MAX_HEALTH - 2);
    }

    #[test]
    fn test_intro_descends_to_rest_then_engages() {
        let ctx = ctx();
        let cfg = ctx.config;
        let mut boss = BossState::new();
        let mut pos = Vec2::new(cfg.width / 2.0, cfg.boss_rest_y() - cfg.height);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        for _ in 0..10_000 {
            boss.update(&mut pos, cfg.boss_size, &ctx, &mut rng, &mut spawned, &mut events);
            if !boss.intro {
                break;
            }
        }
        assert!(!boss.intro);
        assert!((pos.y - cfg.boss_rest_y()).abs() < 1.0);
        assert_eq!(boss.cooldown, BOSS_FIRST_ATTACK_DELAY);
        // No attacks during the descent
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_sustained_ascent_triggers_evasive_climb() {
        let mut ctx = ctx();
        let cfg = ctx.config;
        ctx.player_vel = Vec2::new(0.0, cfg.boss_evade_trigger_vy * 2.0);
        let mut boss = BossState::new();
        boss.intro = false;
        boss.base_y = cfg.boss_rest_y();
        boss.cooldown = 100_000;
        let mut pos = Vec2::new(cfg.width / 2.0, cfg.boss_rest_y());
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawned = Vec::new();
        let mut events = Vec::new();

        // No climb before the ascent has been sustained long enough
        for _ in 0..(BOSS_EVASION_DELAY - 1) as usize {
            boss.update(&mut pos, cfg.boss_size, &ctx, &mut rng, &mut spawned, &mut events);
            assert_eq!(boss.evade_offset, 0.0);
        }
        for _ in 0..200 {
            boss.update(&mut pos, cfg.boss_size, &ctx, &mut rng, &mut spawned, &mut events);
        }
        assert!(boss.evade_offset > 0.0);
        assert!(boss.evade_offset <= cfg.boss_evade_ceiling + 1e-3);
        assert!(boss.base_y < cfg.boss_rest_y());

        // Backing off decays once the player slows down
        ctx.player_vel = Vec2::ZERO;
        let peak = boss.evade_offset;
        for _ in 0..60 {
            boss.update(&mut pos, cfg.boss_size, &ctx, &mut rng, &mut spawned, &mut events);
        }
        assert_eq!(boss.ascent_ticks, 0);
        assert!(boss.evade_offset < peak);
    }

    #[test]
    fn test_attack_volley_size_follows_phase() {
        let ctx = ctx();
        let cfg = ctx.config;
        let mut rng = Pcg32::seed_from_u64(3);
        for (health, expected) in [(20, 1), (10, 3), (3, 5)] {
            let mut boss = BossState::new();
            boss.intro = false;
            boss.health = health;
            boss.last_phase = phase_for_health(health);
            boss.cooldown = 0;
            let mut pos = Vec2::new(cfg.width / 2.0, cfg.boss_rest_y());
            let mut spawned = Vec::new();
            let mut events = Vec::new();
            boss.update(&mut pos, cfg.boss_size, &ctx, &mut rng, &mut spawned, &mut events);
            assert_eq!(spawned.len(), expected);
            assert_eq!(boss.cooldown, BOSS_COOLDOWNS[phase_for_health(health) as usize - 1]);
        }
    }
}
