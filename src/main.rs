//! Headless driver: plays a seeded session at a fixed step and logs what happens.

use std::env;

use anyhow::Context;
use maze_chase::constants::LOOP_TIME;
use maze_chase::game::events::RoundEvent;
use maze_chase::game::Round;
use maze_chase::map::direction::Direction;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const STARTING_LIVES: u32 = 3;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value.parse().with_context(|| format!("invalid value for {name}: {value:?}")),
        Err(_) => Ok(default),
    }
}

fn setup_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish()
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).context("could not set global default subscriber")
}

pub fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let seed: u64 = env_or("MAZE_CHASE_SEED", 0)?;
    let seconds: f32 = env_or("MAZE_CHASE_SECONDS", 120.0)?;

    let mut round = Round::with_default_board(seed)?;
    let mut input = SmallRng::seed_from_u64(seed.wrapping_add(1));

    let dt = LOOP_TIME.as_secs_f32();
    let ticks = (seconds / dt).ceil() as u64;
    let mut lives = STARTING_LIVES;
    let mut collected = 0u32;
    let mut eaten = 0u32;

    info!(seed, seconds, "Starting headless session");

    for tick in 0..ticks {
        // Roughly twice a second, steer somewhere new.
        if input.random_ratio(1, 30) {
            if let Some(direction) = Direction::DIRECTIONS.choose(&mut input) {
                round.input(*direction);
            }
        }

        for event in round.tick(dt) {
            match event {
                RoundEvent::PelletCollected { .. } | RoundEvent::PowerPelletCollected { .. } => collected += 1,
                RoundEvent::PursuerEaten(archetype) => {
                    eaten += 1;
                    debug!(tick, %archetype, "Pursuer eaten");
                }
                RoundEvent::PlayerCaught(archetype) => {
                    lives = lives.saturating_sub(1);
                    info!(tick, %archetype, lives, "Player caught");
                    round.reset_agents();
                }
                RoundEvent::MazeCleared => round.advance_level(),
            }
        }

        if lives == 0 {
            info!(tick, "Game over");
            break;
        }
    }

    info!(
        level = round.level(),
        lives,
        collected,
        eaten,
        remaining = round.grid().items_remaining(),
        "Session finished"
    );

    Ok(())
}
