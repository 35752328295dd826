//! Hazard entities and their per-tick behaviors
//!
//! Every hazard is an [`Enemy`] with a tagged [`EnemyKind`] payload. Motion
//! is simple and self-contained; anything that needs the player or the
//! viewport reads it from [`EnemyCtx`]. Spawned sub-entities (boss
//! fireballs) are collected into a scratch list and given ids by the tick
//! loop, never inserted mid-iteration.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossState;
use super::state::{GameEvent, Player};
use crate::Config;
use crate::consts::*;

/// Variant identity for population-cap accounting.
///
/// Crabs (platform-bound), fireballs and the boss are not density-spawned
/// and carry no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTag {
    Jellyfish,
    Mine,
    Urchin,
    SideJellyfish,
    Shark,
    Bomb,
    Fishhook,
}

impl EnemyTag {
    /// Per-variant live cap
    pub fn cap(self) -> usize {
        match self {
            EnemyTag::Jellyfish => 5,
            EnemyTag::Mine => 4,
            EnemyTag::Urchin => 3,
            EnemyTag::SideJellyfish => 5,
            EnemyTag::Shark => 3,
            EnemyTag::Bomb => 3,
            EnemyTag::Fishhook => 3,
        }
    }
}

/// Behavior payload per enemy variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Bobs in place on a slow sine
    Jellyfish { base_y: f32 },
    /// Patrols a platform top between fixed bounds
    Crab { min_x: f32, max_x: f32, dir: f32 },
    /// Near-stationary, slow bob
    Mine { base_y: f32 },
    /// Holds its position, spiky all around
    Urchin,
    /// Crosses the screen horizontally with a vertical sway
    SideJellyfish { vx: f32, base_y: f32 },
    /// Fast straight crosser
    Shark { vx: f32 },
    /// Crosser that detonates on contact; the blast is spent and harmless
    Bomb { vx: f32, fuse: Option<u32> },
    /// Dangles from a line at a fixed x, swaying vertically
    Fishhook { base_y: f32 },
    /// Boss projectile
    Fireball { vel: Vec2, life: u32 },
    Boss(BossState),
}

/// Read-only per-tick context for enemy updates
pub struct EnemyCtx {
    pub config: Config,
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    pub camera_y: f32,
    pub time_ticks: u64,
}

/// A hazard entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Motion phase accumulator for sway/bob
    pub phase: f32,
    pub kind: EnemyKind,
    #[serde(default)]
    pub to_remove: bool,
}

impl Enemy {
    pub fn jellyfish(id: u32, pos: Vec2, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 40.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Jellyfish { base_y: pos.y },
            to_remove: false,
        }
    }

    pub fn crab(id: u32, pos: Vec2, min_x: f32, max_x: f32, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 35.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Crab {
                min_x,
                max_x,
                dir: 1.0,
            },
            to_remove: false,
        }
    }

    pub fn mine(id: u32, pos: Vec2, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 45.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Mine { base_y: pos.y },
            to_remove: false,
        }
    }

    pub fn urchin(id: u32, pos: Vec2, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 40.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Urchin,
            to_remove: false,
        }
    }

    pub fn side_jellyfish(id: u32, pos: Vec2, vx: f32, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 40.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::SideJellyfish { vx, base_y: pos.y },
            to_remove: false,
        }
    }

    pub fn shark(id: u32, pos: Vec2, vx: f32, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 70.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Shark { vx },
            to_remove: false,
        }
    }

    pub fn bomb(id: u32, pos: Vec2, vx: f32, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 35.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Bomb { vx, fuse: None },
            to_remove: false,
        }
    }

    pub fn fishhook(id: u32, pos: Vec2, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: 25.0 * cfg.scale,
            phase: 0.0,
            kind: EnemyKind::Fishhook { base_y: pos.y },
            to_remove: false,
        }
    }

    pub fn fireball(pos: Vec2, vel: Vec2, cfg: &Config) -> Self {
        Self {
            // id assigned by the tick loop when the scratch list is merged
            id: 0,
            pos,
            size: cfg.fireball_size,
            phase: 0.0,
            kind: EnemyKind::Fireball {
                vel,
                life: FIREBALL_LIFE_TICKS,
            },
            to_remove: false,
        }
    }

    pub fn boss(id: u32, pos: Vec2, cfg: &Config) -> Self {
        Self {
            id,
            pos,
            size: cfg.boss_size,
            phase: 0.0,
            kind: EnemyKind::Boss(BossState::new()),
            to_remove: false,
        }
    }

    /// Cap-accounting tag, if this variant is density-spawned
    pub fn tag(&self) -> Option<EnemyTag> {
        match self.kind {
            EnemyKind::Jellyfish { .. } => Some(EnemyTag::Jellyfish),
            EnemyKind::Mine { .. } => Some(EnemyTag::Mine),
            EnemyKind::Urchin => Some(EnemyTag::Urchin),
            EnemyKind::SideJellyfish { .. } => Some(EnemyTag::SideJellyfish),
            EnemyKind::Shark { .. } => Some(EnemyTag::Shark),
            EnemyKind::Bomb { .. } => Some(EnemyTag::Bomb),
            EnemyKind::Fishhook { .. } => Some(EnemyTag::Fishhook),
            _ => None,
        }
    }

    /// Advance one tick. Boss attacks push fireballs into `spawned` and
    /// phase changes into `events`.
    pub fn update(
        &mut self,
        ctx: &EnemyCtx,
        rng: &mut Pcg32,
        spawned: &mut Vec<Enemy>,
        events: &mut Vec<GameEvent>,
    ) {
        let cfg = &ctx.config;
        self.phase += 0.05;
        match &mut self.kind {
            EnemyKind::Jellyfish { base_y } => {
                self.pos.y = *base_y + (self.phase * 2.5).sin() * 30.0 * cfg.scale_y;
            }
            EnemyKind::Crab { min_x, max_x, dir } => {
                self.pos.x += *dir * 1.5 * cfg.scale_x;
                if self.pos.x <= *min_x {
                    self.pos.x = *min_x;
                    *dir = 1.0;
                } else if self.pos.x >= *max_x {
                    self.pos.x = *max_x;
                    *dir = -1.0;
                }
            }
            EnemyKind::Mine { base_y } => {
                self.pos.y = *base_y + self.phase.sin() * 8.0 * cfg.scale_y;
            }
            EnemyKind::Urchin => {}
            EnemyKind::SideJellyfish { vx, base_y } => {
                self.pos.x += *vx;
                self.pos.y = *base_y + self.phase.sin() * 40.0 * cfg.scale_y;
            }
            EnemyKind::Shark { vx } => {
                self.pos.x += *vx;
            }
            EnemyKind::Bomb { vx, fuse } => match fuse {
                Some(ticks) => {
                    // Blast swells for the fuse duration, then disappears
                    self.size += 4.0 * cfg.scale;
                    *ticks -= 1;
                    if *ticks == 0 {
                        self.to_remove = true;
                    }
                }
                None => {
                    self.pos.x += *vx;
                }
            },
            EnemyKind::Fishhook { base_y } => {
                self.pos.y = *base_y + (self.phase * 0.5).sin() * 15.0 * cfg.scale_y;
            }
            EnemyKind::Fireball { vel, life } => {
                self.pos += *vel;
                *life -= 1;
                if *life == 0 {
                    self.to_remove = true;
                }
            }
            EnemyKind::Boss(boss) => {
                boss.update(&mut self.pos, self.size, ctx, rng, spawned, events);
            }
        }
    }

    /// Overlap test against the player. The boss uses a tighter factor so
    /// grazing its corona does not count as contact. A bomb mid-blast is
    /// already spent and never collides again.
    pub fn collides_with_player(&self, player: &Player) -> bool {
        let factor = match self.kind {
            EnemyKind::Bomb { fuse: Some(_), .. } => return false,
            EnemyKind::Boss(_) => 0.6,
            _ => 0.7,
        };
        player.overlaps(self.pos, self.size, factor)
    }

    /// True once this enemy has drifted far enough from the camera (or, for
    /// horizontal crossers, past the far edge) to be culled. The boss is
    /// exempt; crabs follow the platform despawn line below the view.
    pub fn out_of_bounds(&self, camera_y: f32, cfg: &Config) -> bool {
        let margin = cfg.width * 0.2;
        match self.kind {
            EnemyKind::Boss(_) => false,
            EnemyKind::Crab { .. } => {
                self.pos.y > camera_y + cfg.height + PLATFORM_DESPAWN_MARGIN
            }
            EnemyKind::SideJellyfish { vx, .. }
            | EnemyKind::Shark { vx }
            | EnemyKind::Bomb { vx, .. } => {
                (vx > 0.0 && self.pos.x > cfg.width + margin)
                    || (vx < 0.0 && self.pos.x < -margin)
            }
            EnemyKind::Fireball { .. } => {
                self.pos.x < -margin
                    || self.pos.x > cfg.width + margin
                    || (self.pos.y - camera_y).abs() > cfg.height * ENEMY_REMOVAL_SCREENS
            }
            _ => {
                let view_center = camera_y + cfg.height / 2.0;
                (self.pos.y - view_center).abs() > cfg.height * ENEMY_REMOVAL_SCREENS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx(cfg: Config) -> EnemyCtx {
        EnemyCtx {
            config: cfg,
            player_pos: Vec2::new(10_000.0, 10_000.0),
            player_vel: Vec2::ZERO,
            camera_y: 0.0,
            time_ticks: 0,
        }
    }

    fn step(e: &mut Enemy, ctx: &EnemyCtx, n: usize) {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        for _ in 0..n {
            e.update(ctx, &mut rng, &mut spawned, &mut events);
        }
    }

    #[test]
    fn test_jellyfish_bobs_around_its_anchor() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::jellyfish(1, Vec2::new(500.0, 500.0), &cfg);
        let c = ctx(cfg);
        let sway = 30.0 * cfg.scale_y + 1e-3;
        for _ in 0..600 {
            step(&mut e, &c, 1);
            assert!((e.pos.x - 500.0).abs() < 1e-3);
            assert!((e.pos.y - 500.0).abs() <= sway);
        }
    }

    #[test]
    fn test_urchin_holds_position() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::urchin(1, Vec2::new(500.0, 500.0), &cfg);
        step(&mut e, &ctx(cfg), 600);
        assert_eq!(e.pos, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_fishhook_stays_anchored_while_swaying() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::fishhook(1, Vec2::new(700.0, 300.0), &cfg);
        let c = ctx(cfg);
        let sway = 15.0 * cfg.scale_y + 1e-3;
        for _ in 0..60 {
            step(&mut e, &c, 1);
            assert!((e.pos.x - 700.0).abs() < 1e-3);
            assert!((e.pos.y - 300.0).abs() <= sway);
        }
        assert!(!e.to_remove);
    }

    #[test]
    fn test_fishhook_culled_by_camera_distance() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let e = Enemy::fishhook(1, Vec2::new(700.0, 300.0), &cfg);
        assert!(!e.out_of_bounds(0.0, &cfg));
        assert!(e.out_of_bounds(300.0 + cfg.height * 3.0, &cfg));
    }

    #[test]
    fn test_crab_stays_within_patrol_bounds() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::crab(1, Vec2::new(120.0, 400.0), 100.0, 180.0, &cfg);
        let c = ctx(cfg);
        for _ in 0..600 {
            step(&mut e, &c, 1);
            assert!(e.pos.x >= 100.0 && e.pos.x <= 180.0);
        }
    }

    #[test]
    fn test_bomb_crosses_without_detonating_on_approach() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::bomb(1, Vec2::new(500.0, 500.0), 2.0, &cfg);
        let mut c = ctx(cfg);
        // Close but not touching; only contact lights the fuse
        c.player_pos = Vec2::new(570.0, 500.0);
        step(&mut e, &c, 10);
        assert!(matches!(e.kind, EnemyKind::Bomb { fuse: None, .. }));
        assert!((e.pos.x - 520.0).abs() < 1e-3);
    }

    #[test]
    fn test_detonating_bomb_swells_harmlessly_then_expires() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::bomb(1, Vec2::new(500.0, 500.0), 2.0, &cfg);
        if let EnemyKind::Bomb { fuse, .. } = &mut e.kind {
            *fuse = Some(30);
        }
        let mut player = Player::new(&cfg);
        player.pos = Vec2::new(570.0, 500.0);
        let c = ctx(cfg);
        for _ in 0..29 {
            step(&mut e, &c, 1);
            // The blast keeps growing but never registers contact
            assert!(!e.collides_with_player(&player));
            assert!(!e.to_remove);
        }
        step(&mut e, &c, 1);
        assert!(e.to_remove);
        assert!(e.size > 35.0 * cfg.scale + 100.0);
    }

    #[test]
    fn test_fireball_expires_after_lifetime() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::fireball(Vec2::new(500.0, 500.0), Vec2::new(0.1, 0.0), &cfg);
        step(&mut e, &ctx(cfg), FIREBALL_LIFE_TICKS as usize);
        assert!(e.to_remove);
    }

    #[test]
    fn test_shark_culled_past_far_edge() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::shark(1, Vec2::new(0.0, 500.0), 6.0, &cfg);
        e.pos.x = cfg.width + cfg.width * 0.25;
        assert!(e.out_of_bounds(0.0, &cfg));
    }

    #[test]
    fn test_boss_never_culled_by_distance() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let mut e = Enemy::boss(1, Vec2::new(960.0, -30_000.0), &cfg);
        e.pos.y = 50_000.0;
        assert!(!e.out_of_bounds(0.0, &cfg));
    }

    #[test]
    fn test_variant_caps() {
        assert_eq!(EnemyTag::Jellyfish.cap(), 5);
        assert_eq!(EnemyTag::Mine.cap(), 4);
        assert_eq!(EnemyTag::Urchin.cap(), 3);
        assert_eq!(EnemyTag::SideJellyfish.cap(), 5);
        assert_eq!(EnemyTag::Shark.cap(), 3);
        assert_eq!(EnemyTag::Bomb.cap(), 3);
        assert_eq!(EnemyTag::Fishhook.cap(), 3);
    }
}
