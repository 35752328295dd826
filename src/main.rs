//! Tideward entry point
//!
//! Headless demo driver: runs a scripted ascent at the fixed tick rate and
//! prints HUD snapshots and gameplay events. A real shell would render the
//! entity lists and feed device input instead.

use tideward::besttime::{self, BestTime};
use tideward::consts::SIM_DT;
use tideward::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use tideward::{Config, format_time};

/// Ten simulated minutes before the demo gives up
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() {
    env_logger::init();
    log::info!("Tideward (headless) starting...");

    let best_path = besttime::default_path();
    let best = besttime::load(&best_path);

    let config = Config::for_viewport(1920.0, 980.0);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed, config);
    state.best_time = best.map(|b| b.seconds);
    log::info!("Game initialized with seed: {}", seed);

    let mut now = 0.0f64;
    tick(&mut state, &TickInput { start: true, now, ..TickInput::default() });

    for i in 0..MAX_TICKS {
        now += SIM_DT as f64;
        // Scripted input: swim straight up, jump whenever grounded topside
        let input = TickInput {
            up: true,
            jump: state.player.grounded,
            now,
            ..TickInput::default()
        };
        tick(&mut state, &input);

        for event in state.take_events() {
            report(&state, event, &best_path);
        }

        if i % 300 == 0 {
            let hud = state.hud();
            println!(
                "t={}:{:02}.{:03} lives={} depth={:.0} speed=x{:.1}{}",
                hud.minutes,
                hud.seconds,
                hud.millis,
                hud.lives,
                state.player.pos.y - state.config.surface_goal_y,
                hud.speed_multiplier,
                match (hud.boss_health, hud.boss_phase) {
                    (Some(hp), Some(phase)) => format!(" boss={hp}hp p{phase}"),
                    _ => String::new(),
                }
            );
        }

        if matches!(state.phase, GamePhase::GameOver | GamePhase::Won) {
            break;
        }
    }

    match state.phase {
        GamePhase::Won => println!("Run complete in {}", format_time(state.elapsed)),
        GamePhase::GameOver => println!("Run lost at {}", format_time(state.elapsed)),
        _ => println!("Demo window elapsed without a result"),
    }
}

fn report(state: &GameState, event: GameEvent, best_path: &std::path::Path) {
    match event {
        GameEvent::Hit => println!("* hit! {} lives left", state.lives),
        GameEvent::ShieldBreak => println!("* shield absorbed a hit"),
        GameEvent::PowerUpCollected(kind) => println!("* power-up: {kind:?}"),
        GameEvent::LifeHealed => println!("* the water heals: {} lives", state.lives),
        GameEvent::BossPhaseChanged(phase) => println!("* boss enters phase {phase}"),
        GameEvent::BossDefeated => println!("* the sun goes down"),
        GameEvent::GameOver => println!("* game over"),
        GameEvent::Win { time, new_record } => {
            println!("* victory in {}", format_time(time));
            if new_record {
                let record = BestTime {
                    seconds: time,
                    timestamp: std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_millis() as f64)
                        .unwrap_or(0.0),
                };
                if let Err(e) = besttime::store(best_path, &record) {
                    log::warn!("Could not save best time: {e}");
                }
            }
        }
    }
}
