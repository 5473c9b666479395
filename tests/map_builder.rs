use std::time::Duration;

use glam::IVec2;
use maze_chase::constants::{BOARD_CELL_SIZE, RAW_BOARD};
use maze_chase::entity::behavior::Timings;
use maze_chase::entity::targeting::Archetype;
use maze_chase::error::{GameError, MapError, ParseError};
use maze_chase::game::{Round, RoundConfig};
use maze_chase::map::builder::Maze;
use maze_chase::map::grid::Cell;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{default_grid, grid_from};

#[test]
fn test_default_maze() {
    let maze = Maze::parse(&RAW_BOARD).unwrap();

    assert_eq!(maze.grid().width(), BOARD_CELL_SIZE.x as i32);
    assert_eq!(maze.grid().height(), BOARD_CELL_SIZE.y as i32);
    assert_eq!(maze.player_start(), IVec2::new(14, 23));

    let archetypes: Vec<Archetype> = maze.pursuer_starts().iter().map(|(a, _)| *a).collect();
    assert_eq!(
        archetypes,
        vec![Archetype::Direct, Archetype::Ambusher, Archetype::Flanker, Archetype::Opportunist]
    );
    assert_that(&maze.grid().items_remaining()).is_greater_than(0);
}

#[test]
fn test_items_counted_and_taken() {
    let mut grid = default_grid();
    let total = grid.items_remaining();
    let counted = grid.iter().filter(|(_, cell)| cell.is_collectible()).count();
    assert_eq!(total, counted);

    assert_eq!(grid.take_item(IVec2::new(1, 3)), Some(Cell::PowerPellet));
    assert_eq!(grid.take_item(IVec2::new(1, 3)), None);
    assert_eq!(grid.get(IVec2::new(1, 3)), Some(Cell::Open));
    assert_eq!(grid.items_remaining(), total - 1);
}

#[test]
fn test_columns_wrap_rows_do_not() {
    let grid = default_grid();

    assert_eq!(grid.get(IVec2::new(-1, 14)), grid.get(IVec2::new(27, 14)));
    assert_eq!(grid.get(IVec2::new(28, 14)), grid.get(IVec2::new(0, 14)));
    assert_eq!(grid.get(IVec2::new(5, -1)), None);
    assert!(grid.is_wall(IVec2::new(5, 31)));
}

#[test]
fn test_pursuer_in_wall() {
    let grid = default_grid();
    let result = Maze::new(grid, IVec2::new(14, 23), vec![(Archetype::Direct, IVec2::new(0, 0))]);
    assert_eq!(
        result.unwrap_err(),
        MapError::PursuerInWall {
            archetype: Archetype::Direct,
            cell: IVec2::new(0, 0)
        }
    );
}

#[test]
fn test_pen_without_exit() {
    let result = Maze::parse(&["#######", "#P    #", "#######", "##0G###", "#######"]);
    assert!(matches!(
        result,
        Err(GameError::Map(MapError::NoPenExit {
            archetype: Archetype::Direct,
            ..
        }))
    ));
}

#[test]
fn test_unreachable_pursuer() {
    let grid = grid_from(&["#######", "#P  # #", "#######"]);
    let result = Maze::new(grid, IVec2::new(1, 1), vec![(Archetype::Ambusher, IVec2::new(5, 1))]);
    assert_eq!(
        result.unwrap_err(),
        MapError::Unreachable {
            archetype: Archetype::Ambusher,
            cell: IVec2::new(5, 1)
        }
    );
}

#[test]
fn test_player_start_checks() {
    let grid = default_grid();
    assert_eq!(
        Maze::new(grid.clone(), IVec2::new(40, 3), vec![]).unwrap_err(),
        MapError::OutOfBounds(IVec2::new(40, 3))
    );
    assert_eq!(
        Maze::new(grid.clone(), IVec2::new(0, 0), vec![]).unwrap_err(),
        MapError::PlayerWalledIn(IVec2::new(0, 0))
    );
    assert_eq!(
        Maze::new(grid, IVec2::new(13, 13), vec![]).unwrap_err(),
        MapError::PlayerWalledIn(IVec2::new(13, 13))
    );
}

#[test]
fn test_duplicate_archetype() {
    let grid = default_grid();
    let result = Maze::new(
        grid,
        IVec2::new(14, 23),
        vec![(Archetype::Flanker, IVec2::new(1, 1)), (Archetype::Flanker, IVec2::new(2, 1))],
    );
    assert!(matches!(result, Err(MapError::InvalidConfig(_))));
}

#[test]
fn test_parse_errors_surface() {
    let result = Maze::parse(&["###", "#?#", "###"]);
    assert!(matches!(result, Err(GameError::MapParse(ParseError::UnknownCharacter('?')))));
}

#[test]
fn test_cell_size_override() {
    let grid = default_grid().with_cell_size(8.0).unwrap();
    assert_eq!(grid.cell_center(IVec2::new(1, 1)), glam::Vec2::new(12.0, 12.0));
    assert!(default_grid().with_cell_size(0.0).is_err());
}

#[test]
fn test_round_config_validation() {
    let maze = Maze::parse(&RAW_BOARD).unwrap();
    let config = RoundConfig {
        timings: Timings {
            scatter: Duration::ZERO,
            ..Timings::default()
        },
        ..RoundConfig::default()
    };
    assert!(matches!(
        Round::new(maze.clone(), config, 0),
        Err(GameError::Map(MapError::InvalidConfig(_)))
    ));

    let config = RoundConfig {
        pursuer_speed: -1.0,
        ..RoundConfig::default()
    };
    assert!(Round::new(maze, config, 0).is_err());
}
