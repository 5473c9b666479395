//! This module contains all the constants used by the simulation core.

use std::time::Duration;

use glam::UVec2;

/// The fixed simulation step used by the headless driver.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each cell, in world units.
pub const CELL_SIZE: f32 = 20.0;
/// The size of the default game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);

/// Agent geometry shared by the player and the pursuers.
pub mod collider {
    /// Radius of every agent, in cells.
    pub const AGENT_RADIUS_CELLS: f32 = 0.5;
    /// Fraction of the radius used as the half-width of the wall-probe box.
    pub const PROBE_SCALE: f32 = 0.8;
    /// Player and pursuer closer than this many cells are in contact.
    pub const CONTACT_DISTANCE_CELLS: f32 = 1.0;
    /// A pursuer this close (per axis) to its cell centre is at an intersection.
    pub const INTERSECTION_TOLERANCE: f32 = 1.0;
}

/// Movement speeds, in world units per second, and their multipliers.
pub mod speed {
    /// Player movement speed.
    pub const PLAYER: f32 = 150.0;
    /// Pursuer base speed at level one.
    pub const PURSUER_BASE: f32 = 120.0;
    /// Applied to the base speed while frightened.
    pub const FRIGHTENED_MULTIPLIER: f32 = 0.5;
    /// Applied to the base speed while leaving the pen.
    pub const SPAWN_EXIT_MULTIPLIER: f32 = 1.5;
    /// Base speed gained per level when the maze is cleared.
    pub const LEVEL_INCREMENT: f32 = 0.1;
}

/// Behaviour timers.
pub mod timing {
    use std::time::Duration;

    pub const SCATTER_DURATION: Duration = Duration::from_secs(7);
    pub const CHASE_DURATION: Duration = Duration::from_secs(20);
    pub const FRIGHTENED_DURATION: Duration = Duration::from_secs(8);

    /// Time each archetype waits in the pen after a reset, in archetype order.
    pub const RELEASE_DELAYS: [Duration; 4] = [
        Duration::from_secs(1),
        Duration::from_secs(3),
        Duration::from_secs(5),
        Duration::from_secs(7),
    ];
}

/// Parameters of the four targeting heuristics.
pub mod targeting {
    /// Cells ahead of the player targeted by the ambusher.
    pub const AMBUSH_LOOKAHEAD: i32 = 4;
    /// Cells ahead of the player used as the flanker's pivot.
    pub const FLANK_PIVOT_LOOKAHEAD: f32 = 2.0;
    /// Distance, in cells, inside which the opportunist retreats.
    pub const RETREAT_RADIUS_CELLS: f32 = 8.0;
    /// Node expansions allowed per A* search.
    pub const ASTAR_EXPANSION_LIMIT: usize = 1000;
}

/// The raw layout of the default game board.
///
/// `#` wall, `.` collectible, `o` power item, ` ` open floor, `G` pen cell,
/// `0`..`3` pen cell holding the start of archetype A..D, `P` player start.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###GG### ##.#     ",
    "######.## #GG0GGG# ##.######",
    "      .   #G1G2G3#   .      ",
    "######.## #GGGGGG# ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##....... P.......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_board_cell_size() {
        assert_eq!(BOARD_CELL_SIZE.x, 28);
        assert_eq!(BOARD_CELL_SIZE.y, 31);
    }

    #[test]
    fn test_raw_board_dimensions() {
        assert_eq!(RAW_BOARD.len(), BOARD_CELL_SIZE.y as usize);
        for row in RAW_BOARD.iter() {
            assert_eq!(row.chars().count(), BOARD_CELL_SIZE.x as usize, "row {row:?}");
        }
    }

    #[test]
    fn test_raw_board_boundaries() {
        assert!(RAW_BOARD[0].chars().all(|c| c == '#'));
        assert!(RAW_BOARD[RAW_BOARD.len() - 1].chars().all(|c| c == '#'));

        // The tunnel row is open at both edges
        assert_eq!(RAW_BOARD[14].chars().next(), Some(' '));
        assert_eq!(RAW_BOARD[14].chars().last(), Some(' '));
    }

    #[test]
    fn test_raw_board_markers() {
        let joined: String = RAW_BOARD.concat();
        assert_eq!(joined.matches('P').count(), 1);
        for digit in ['0', '1', '2', '3'] {
            assert_eq!(joined.matches(digit).count(), 1, "archetype start {digit}");
        }
    }

    #[test]
    fn test_speed_multipliers() {
        assert_eq!(speed::PURSUER_BASE * speed::FRIGHTENED_MULTIPLIER, 60.0);
        assert!(speed::SPAWN_EXIT_MULTIPLIER > 1.0);
    }
}
