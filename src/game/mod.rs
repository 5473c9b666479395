//! The round controller: owns the grid and every agent, and advances them one tick at a time.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::constants::collider::CONTACT_DISTANCE_CELLS;
use crate::constants::speed::{self, LEVEL_INCREMENT};
use crate::constants::RAW_BOARD;
use crate::entity::behavior::Timings;
use crate::entity::collision::Collidable;
use crate::entity::player::Player;
use crate::entity::pursuer::Pursuer;
use crate::entity::targeting::Archetype;
use crate::error::{GameResult, MapError};
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::map::grid::{Cell, Grid};

use self::events::RoundEvent;

pub mod events;

/// Tunable parameters of a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    pub timings: Timings,
    pub player_speed: f32,
    pub pursuer_speed: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            player_speed: speed::PLAYER,
            pursuer_speed: speed::PURSUER_BASE,
        }
    }
}

impl RoundConfig {
    fn validate(&self) -> Result<(), MapError> {
        let Timings {
            scatter,
            chase,
            frightened,
        } = self.timings;
        if scatter.is_zero() || chase.is_zero() || frightened.is_zero() {
            return Err(MapError::InvalidConfig(format!("mode durations must be non-zero: {:?}", self.timings)));
        }
        for (name, value) in [("player", self.player_speed), ("pursuer", self.pursuer_speed)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MapError::InvalidConfig(format!("{name} speed must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

/// A single round of play.
///
/// Agents are updated in a fixed order every tick: the player, then the pursuers sorted by
/// archetype. The flanker therefore sees the direct pursuer's position after it has moved.
pub struct Round {
    maze: Maze,
    grid: Grid,
    player: Player,
    pursuers: Vec<Pursuer>,
    rng: SmallRng,
    config: RoundConfig,
    level: u32,
}

impl Round {
    pub fn new(maze: Maze, config: RoundConfig, seed: u64) -> GameResult<Round> {
        config.validate()?;

        let grid = maze.grid().clone();
        let player = Player::new(&grid, maze.player_start(), config.player_speed);
        let pursuers = maze
            .pursuer_starts()
            .iter()
            .map(|&(archetype, start)| Pursuer::new(&grid, archetype, start, config.pursuer_speed, config.timings))
            .collect();

        debug!(seed, items = grid.items_remaining(), "Round created");

        Ok(Round {
            maze,
            grid,
            player,
            pursuers,
            rng: SmallRng::seed_from_u64(seed),
            config,
            level: 1,
        })
    }

    /// A round on the built-in board with default settings.
    pub fn with_default_board(seed: u64) -> GameResult<Round> {
        let maze = Maze::parse(&RAW_BOARD)?;
        Self::new(maze, RoundConfig::default(), seed)
    }

    /// Advances the round by `dt` seconds and reports what happened.
    pub fn tick(&mut self, dt: f32) -> Vec<RoundEvent> {
        let mut events = Vec::new();

        self.player.update(&self.grid, dt);
        let snapshot = self.player.snapshot(&self.grid);

        let mut leader = None;
        for pursuer in &mut self.pursuers {
            pursuer.update(&self.grid, &snapshot, leader, dt, &mut self.rng);
            if pursuer.archetype() == Archetype::Direct {
                leader = Some(pursuer.position());
            }
        }

        self.collect_item(&mut events);

        let contact = self.grid.cell_size() * CONTACT_DISTANCE_CELLS;
        for pursuer in &mut self.pursuers {
            if !self.player.is_touching(&*pursuer, contact) {
                continue;
            }
            if pursuer.is_frightened() {
                debug!(archetype = %pursuer.archetype(), "Pursuer eaten");
                events.push(RoundEvent::PursuerEaten(pursuer.archetype()));
                pursuer.reset(&self.grid);
            } else {
                debug!(archetype = %pursuer.archetype(), "Player caught");
                events.push(RoundEvent::PlayerCaught(pursuer.archetype()));
                return events;
            }
        }

        events
    }

    fn collect_item(&mut self, events: &mut Vec<RoundEvent>) {
        let cell = self.player.cell(&self.grid);
        let Some(item) = self.grid.take_item(cell) else {
            return;
        };

        trace!(?cell, ?item, remaining = self.grid.items_remaining(), "Item collected by player");
        if item == Cell::PowerPellet {
            events.push(RoundEvent::PowerPelletCollected { cell });
            let frightened = self.apply_fright_effect();
            debug!(frightened, "Power item collected, frightening pursuers");
        } else {
            events.push(RoundEvent::PelletCollected { cell });
        }

        if self.grid.items_remaining() == 0 {
            info!(level = self.level, "Maze cleared");
            events.push(RoundEvent::MazeCleared);
        }
    }

    /// Frightens every pursuer outside the pen, returning how many were affected.
    pub fn apply_fright_effect(&mut self) -> usize {
        self.pursuers
            .iter_mut()
            .map(|pursuer| pursuer.frighten())
            .filter(|frightened| *frightened)
            .count()
    }

    /// Buffers a turn for the player.
    pub fn input(&mut self, direction: Direction) {
        self.player.set_next_direction(direction);
    }

    /// Puts the player back on its start cell, stopped.
    pub fn unstick_player(&mut self) {
        self.player.force_unstick(&self.grid);
    }

    /// Returns every agent to its start without touching the collected items.
    pub fn reset_agents(&mut self) {
        self.player.reset(&self.grid);
        for pursuer in &mut self.pursuers {
            pursuer.reset(&self.grid);
        }
    }

    /// Restores the maze from its template and resets every agent.
    pub fn reset_round(&mut self) {
        self.grid = self.maze.grid().clone();
        self.reset_agents();
        debug!(level = self.level, items = self.grid.items_remaining(), "Round reset");
    }

    /// Moves to the next level: a fresh maze and faster pursuers.
    pub fn advance_level(&mut self) {
        let increase = self.level as f32 * LEVEL_INCREMENT;
        self.level += 1;
        self.reset_round();

        for pursuer in &mut self.pursuers {
            pursuer.increase_speed(increase);
        }
        info!(level = self.level, increase, "Level advanced");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    /// Finds a pursuer by archetype.
    pub fn pursuer(&self, archetype: Archetype) -> Option<&Pursuer> {
        self.pursuers.iter().find(|pursuer| pursuer.archetype() == archetype)
    }

    pub fn pursuer_mut(&mut self, archetype: Archetype) -> Option<&mut Pursuer> {
        self.pursuers.iter_mut().find(|pursuer| pursuer.archetype() == archetype)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }
}
