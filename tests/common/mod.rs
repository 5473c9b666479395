#![allow(dead_code)]

use glam::{IVec2, Vec2};
use maze_chase::constants::RAW_BOARD;
use maze_chase::entity::targeting::PlayerSnapshot;
use maze_chase::game::events::RoundEvent;
use maze_chase::game::Round;
use maze_chase::map::builder::Maze;
use maze_chase::map::grid::Grid;
use maze_chase::map::parser::MazeParser;

/// One frame at 60 Hz.
pub const STEP: f32 = 1.0 / 60.0;

pub fn default_maze() -> Maze {
    Maze::parse(&RAW_BOARD).unwrap()
}

pub fn default_grid() -> Grid {
    default_maze().grid().clone()
}

/// Parses a small board; it must contain exactly one `P`.
pub fn grid_from(rows: &[&str]) -> Grid {
    MazeParser::parse_board(rows).unwrap().grid
}

pub fn center(grid: &Grid, x: i32, y: i32) -> Vec2 {
    grid.cell_center(IVec2::new(x, y))
}

/// A stationary player standing on the centre of a cell.
pub fn player_at(grid: &Grid, x: i32, y: i32) -> PlayerSnapshot {
    PlayerSnapshot {
        position: center(grid, x, y),
        heading: IVec2::ZERO,
        cell: IVec2::new(x, y),
    }
}

/// Ticks the round `ticks` times at 60 Hz, gathering every event.
pub fn run(round: &mut Round, ticks: usize) -> Vec<RoundEvent> {
    (0..ticks).flat_map(|_| round.tick(STEP)).collect()
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 1e-3, "expected {expected}, got {actual}");
}
