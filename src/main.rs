//! Spheroids headless driver
//!
//! Runs a scripted match with the simulation kernel and prints the final
//! arena snapshot as JSON. Usage: `spheroids [settings.json]`

use std::time::Duration;

use glam::{IVec2, Vec2};
use spheroids::Settings;
use spheroids::sim::{AgentIntent, Arena, ArenaEvent, TickInput};

/// Ticks to simulate (one minute at a 10 ms period)
const DEMO_TICKS: u64 = 6000;

/// Offsets smaller than this are treated as "arrived"
const STEER_DEADZONE: f32 = 3.0;

fn main() {
    env_logger::init();
    log::info!("Spheroids (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    log::info!("Arena seed: {}", settings.seed);

    let mut arena = Arena::new(settings);
    let mut hits = 0;
    for _ in 0..DEMO_TICKS {
        let input = demo_input(&arena);
        for event in arena.tick(&input) {
            match event {
                ArenaEvent::Hit { .. } => {
                    hits += 1;
                    log::info!("{:?}", event);
                }
                _ => log::debug!("{:?}", event),
            }
        }
    }
    let elapsed = Duration::from_millis(arena.time_ticks() * arena.settings().tick_ms);
    log::info!(
        "{} hits in {} ticks ({:.1}s simulated), scores {:?}",
        hits,
        arena.time_ticks(),
        elapsed.as_secs_f32(),
        arena.scores()
    );

    match serde_json::to_string_pretty(&arena.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

/// Simple scripted opponents: fetch the nearest idle projectile, then chase
/// the other agent and fire when lined up.
fn demo_input(arena: &Arena) -> TickInput {
    let agents = arena.agents();
    let intents = agents
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            let pos = agent.shape().position();
            if agent.is_loaded() {
                let Some((_, target)) = agents.iter().enumerate().find(|(j, _)| *j != i) else {
                    return AgentIntent::default();
                };
                let target = target.shape().position();
                let dir = steer(pos, target);
                AgentIntent {
                    dir,
                    // Launches follow the heading, so only fire along an axis or a diagonal
                    fire: dir.x == 0 || dir.y == 0 || lined_up(pos, target),
                }
            } else {
                let nearest = arena
                    .projectiles()
                    .iter()
                    .filter(|p| p.is_idle())
                    .map(|p| p.shape().position())
                    .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));
                AgentIntent {
                    dir: nearest.map(|p| steer(pos, p)).unwrap_or(IVec2::ZERO),
                    fire: false,
                }
            }
        })
        .collect();

    TickInput { intents }
}

fn steer(from: Vec2, to: Vec2) -> IVec2 {
    let delta = to - from;
    let axis = |d: f32| {
        if d.abs() < STEER_DEADZONE {
            0
        } else {
            d.signum() as i32
        }
    };
    IVec2::new(axis(delta.x), axis(delta.y))
}

fn lined_up(from: Vec2, to: Vec2) -> bool {
    let delta = (to - from).abs();
    (delta.x - delta.y).abs() < STEER_DEADZONE
}
