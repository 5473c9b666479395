//! Maze construction and load-time validation.

use std::collections::HashSet;

use glam::IVec2;
use pathfinding::prelude::bfs_reach;
use tracing::debug;

use crate::constants::collider::AGENT_RADIUS_CELLS;
use crate::entity::collision;
use crate::entity::pathing;
use crate::entity::targeting::Archetype;
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::grid::{Barrier, Grid};
use crate::map::parser::MazeParser;

/// A validated maze template: the grid plus every agent's starting cell.
///
/// Construction checks the invariants the tick loop relies on, so a round
/// built from a `Maze` never has to deal with an agent that cannot move.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    player_start: IVec2,
    pursuer_starts: Vec<(Archetype, IVec2)>,
}

impl Maze {
    /// Parses and validates a raw board layout.
    pub fn parse<S: AsRef<str>>(raw_board: &[S]) -> GameResult<Maze> {
        let parsed = MazeParser::parse_board(raw_board)?;
        Ok(Self::new(parsed.grid, parsed.player_start, parsed.pursuer_starts)?)
    }

    /// Validates a grid and its starting cells.
    pub fn new(grid: Grid, player_start: IVec2, mut pursuer_starts: Vec<(Archetype, IVec2)>) -> Result<Maze, MapError> {
        pursuer_starts.sort_by_key(|(archetype, _)| *archetype);
        if let Some(pair) = pursuer_starts.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(MapError::InvalidConfig(format!("archetype {} starts twice", pair[0].0)));
        }

        Self::validate_player_start(&grid, player_start)?;

        // Cells reachable from the player start when only true walls block.
        let reachable: HashSet<IVec2> = bfs_reach(player_start, |&cell| {
            Direction::DIRECTIONS
                .iter()
                .map(move |dir| cell + dir.as_ivec2())
                .filter(|next| grid.in_bounds(*next) && !grid.is_wall(*next))
                .collect::<Vec<_>>()
        })
        .collect();

        for &(archetype, cell) in &pursuer_starts {
            if !grid.in_bounds(cell) {
                return Err(MapError::OutOfBounds(cell));
            }
            if grid.is_wall(cell) {
                return Err(MapError::PursuerInWall { archetype, cell });
            }
            if grid.is_spawn(cell) && pathing::find_spawn_exit(&grid, cell).is_none() {
                return Err(MapError::NoPenExit { archetype, cell });
            }
            if !reachable.contains(&cell) {
                return Err(MapError::Unreachable { archetype, cell });
            }
        }

        debug!(
            width = grid.width(),
            height = grid.height(),
            items = grid.items_remaining(),
            pursuers = pursuer_starts.len(),
            "Maze validated"
        );

        Ok(Maze {
            grid,
            player_start,
            pursuer_starts,
        })
    }

    fn validate_player_start(grid: &Grid, start: IVec2) -> Result<(), MapError> {
        if !grid.in_bounds(start) {
            return Err(MapError::OutOfBounds(start));
        }
        if grid.blocks(start, Barrier::WallsAndPen) {
            return Err(MapError::PlayerWalledIn(start));
        }

        // The reset relocation searches the start and its four neighbours; one must be free.
        let radius = grid.cell_size() * AGENT_RADIUS_CELLS;
        let center = grid.cell_center(start);
        let offsets = std::iter::once(IVec2::ZERO).chain(Direction::DIRECTIONS.iter().map(Direction::as_ivec2));
        let mut candidates = offsets.map(|offset| center + offset.as_vec2() * grid.cell_size());
        if candidates.any(|position| !collision::overlaps(grid, position, radius, Barrier::WallsAndPen)) {
            Ok(())
        } else {
            Err(MapError::PlayerWalledIn(start))
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    pub fn pursuer_starts(&self) -> &[(Archetype, IVec2)] {
        &self.pursuer_starts
    }
}
