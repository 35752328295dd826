//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here. Particles
//! and pending events are cosmetic/transient and are skipped by serde.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossMode;
use super::enemy::{Enemy, EnemyKind, EnemyTag};
use crate::consts::*;
use crate::{Config, time_parts};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Waiting,
    /// Active gameplay
    Playing,
    /// Game is paused, timer frozen
    Paused,
    /// Out of lives
    GameOver,
    /// Run completed
    Won,
}

/// Gameplay events for the shell (sound, flashes, persistence)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player lost a life
    Hit,
    /// Shield absorbed a hit
    ShieldBreak,
    PowerUpCollected(PowerUpKind),
    /// Water healing restored a life
    LifeHealed,
    BossPhaseChanged(u8),
    BossDefeated,
    GameOver,
    Win { time: f64, new_record: bool },
}

/// The player organism
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Speed multiplier from the boost power-up (1.0 when inactive)
    pub boost: f32,
    pub boost_ticks: u32,
    /// Post-hit invincibility window
    pub invincible_ticks: u32,
    pub shield: bool,
    /// Standing on the seabed or a platform this tick
    pub grounded: bool,
    /// Platform stood on, by id (lookup only, may have despawned)
    pub on_platform: Option<u32>,
    /// Input lock during the boss intro
    pub frozen: bool,
    /// Jump input latch so holding the key fires once per press
    pub jump_held: bool,
}

impl Player {
    pub fn new(cfg: &Config) -> Self {
        Self {
            pos: Vec2::new(
                cfg.width / 2.0,
                cfg.seabed_y - cfg.player_size,
            ),
            vel: Vec2::ZERO,
            size: cfg.player_size,
            boost: 1.0,
            boost_ticks: 0,
            invincible_ticks: 0,
            shield: false,
            grounded: false,
            on_platform: None,
            frozen: false,
            jump_held: false,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Axis-aligned center/half-extent overlap against a square entity
    pub fn overlaps(&self, other_pos: Vec2, other_size: f32, factor: f32) -> bool {
        let reach = (self.size + other_size) * 0.5 * factor;
        (self.pos.x - other_pos.x).abs() < reach && (self.pos.y - other_pos.y).abs() < reach
    }
}

/// A climbable platform. Position is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Flagged at generation time to carry patrol enemies
    pub spawns_enemies: bool,
    /// Flagged at generation time to carry a power-up
    pub spawns_powerup: bool,
    /// Boss-arena platforms never despawn
    pub permanent: bool,
    #[serde(default)]
    pub to_remove: bool,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
}

/// A collectible power-up, bobbing in place above its platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Rest y the bob oscillates around
    pub base_y: f32,
    pub size: f32,
    #[serde(default)]
    pub to_remove: bool,
}

impl PowerUp {
    /// Sine bob around the rest position
    pub fn update(&mut self, time_ticks: u64) {
        let t = time_ticks as f32 * 0.05;
        self.pos.y = self.base_y + (t + self.id as f32).sin() * 5.0;
    }
}

/// Particle categories for the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Bubble,
    Splash,
    Spark,
    Ember,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// 255 at spawn, fades by 5 per tick
    pub life: u8,
}

impl Particle {
    /// Advance one tick; returns false when expired
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(5);
        self.life > 0
    }
}

/// HUD snapshot for the shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub lives: u8,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
    pub speed_multiplier: f32,
    pub shield: bool,
    pub boss_health: Option<i32>,
    pub boss_phase: Option<u8>,
    pub best_time: Option<f64>,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG stream
    pub rng: Pcg32,
    /// Cosmetic RNG stream; decorative draws never perturb gameplay
    pub fx_rng: Pcg32,
    pub config: Config,
    pub phase: GamePhase,
    pub lives: u8,
    /// Top edge of the camera view in world space
    pub camera_y: f32,
    /// Highest y (lowest value) platform generation has reached
    pub frontier_y: f32,
    /// Wall-clock epoch of the run start; shifted forward on resume so
    /// `now - started_at` excludes paused intervals
    pub started_at: f64,
    /// Wall-clock instant the current pause began
    pub paused_at: f64,
    /// Elapsed run time in seconds, updated each playing tick
    pub elapsed: f64,
    pub best_time: Option<f64>,
    /// Boss-mode latches and intro bookkeeping
    pub boss_mode: BossMode,
    /// Consecutive ticks of sustained ascent past the goal (non-boss win)
    pub fly_up_ticks: u32,
    /// Submerged ticks toward the next healed life
    pub water_heal_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Pending events, drained by the shell via `take_events`
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state in the waiting phase
    pub fn new(seed: u64, config: Config) -> Self {
        let player = Player::new(&config);
        let camera_y = player.pos.y - config.height / 2.0;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x5eed_f00d),
            config,
            phase: GamePhase::Waiting,
            lives: STARTING_LIVES,
            camera_y,
            // First band generates one gap above the seabed
            frontier_y: config.seabed_y,
            started_at: 0.0,
            paused_at: 0.0,
            elapsed: 0.0,
            best_time: None,
            boss_mode: BossMode::default(),
            fly_up_ticks: 0,
            water_heal_ticks: 0,
            time_ticks: 0,
            player,
            platforms: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True while the given y is below the water surface
    pub fn is_underwater(&self, y: f32) -> bool {
        y > self.config.surface_goal_y
    }

    /// Live enemy count (boss excluded, it ignores population caps)
    pub fn live_enemy_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| !matches!(e.kind, EnemyKind::Boss(_)))
            .count()
    }

    /// Live count for one variant
    pub fn count_tag(&self, tag: EnemyTag) -> usize {
        self.enemies.iter().filter(|e| e.tag() == Some(tag)).count()
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| matches!(e.kind, EnemyKind::Boss(_)))
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events for the shell
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a cosmetic particle if under the cap
    pub fn spawn_particle(&mut self, pos: Vec2, vel: Vec2, kind: ParticleKind) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(Particle {
                pos,
                vel,
                kind,
                life: 255,
            });
        }
    }

    /// HUD snapshot
    pub fn hud(&self) -> Hud {
        let (minutes, seconds, millis) = time_parts(self.elapsed);
        let (boss_health, boss_phase) = match self.boss() {
            Some(e) => match &e.kind {
                EnemyKind::Boss(b) => (Some(b.health), Some(b.phase())),
                _ => (None, None),
            },
            None => (None, None),
        };
        Hud {
            lives: self.lives,
            minutes,
            seconds,
            millis,
            speed_multiplier: self.player.boost,
            shield: self.player.shield,
            boss_health,
            boss_phase,
            best_time: self.best_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> GameState {
        GameState::new(7, Config::for_viewport(1920.0, 980.0))
    }

    #[test]
    fn test_new_state_waits_with_full_lives() {
        let state = test_state();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.platforms.is_empty());
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = test_state();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_underwater_classification() {
        let state = test_state();
        assert!(state.is_underwater(state.config.seabed_y));
        assert!(!state.is_underwater(state.config.surface_goal_y - 100.0));
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = test_state();
        state.push_event(GameEvent::Hit);
        assert_eq!(state.take_events(), vec![GameEvent::Hit]);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = test_state();
        for _ in 0..(MAX_PARTICLES + 50) {
            state.spawn_particle(Vec2::ZERO, Vec2::ZERO, ParticleKind::Bubble);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_player_overlap_reach() {
        let cfg = Config::for_viewport(1920.0, 980.0);
        let player = Player::new(&cfg);
        // Just inside combined half-extent
        let near = player.pos + Vec2::splat((player.size + 30.0) * 0.5 - 1.0);
        assert!(player.overlaps(near, 30.0, 1.0));
        let far = player.pos + Vec2::new(player.size + 30.0, 0.0);
        assert!(!player.overlaps(far, 30.0, 1.0));
    }
}
