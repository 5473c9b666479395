//! Turning a target cell into a movement direction.
//!
//! Three procedures live here: the local greedy choice made at every intersection, a bounded A*
//! search for the archetypes that plan whole routes, and the breadth-first search that finds the
//! way out of the pen.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::IVec2;
use pathfinding::prelude::bfs;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::map::direction::Direction;
use crate::map::grid::{Barrier, Grid};

/// Result of a bounded A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// The first step of a shortest path.
    Step(Direction),
    /// No usable path: the target is blocked, already reached, or cut off.
    Unreachable,
    /// The expansion budget ran out before the target was found.
    Exhausted,
}

/// Picks a direction out of `cell` toward `target`.
///
/// Reversing `heading` is only allowed when nothing else is open. Among the remaining directions
/// the one whose neighbouring cell centre is closest to the target centre wins, ties going to the
/// earlier of Up, Right, Down, Left. A frightened pursuer picks uniformly at random instead.
pub fn choose_direction<R: Rng + ?Sized>(
    grid: &Grid,
    cell: IVec2,
    heading: IVec2,
    target: IVec2,
    frightened: bool,
    rng: &mut R,
) -> Direction {
    let reverse = Direction::from_step(-heading);
    let open = |dir: &Direction| !grid.blocks(cell + dir.as_ivec2(), Barrier::WallsAndPen);

    let options: SmallVec<[Direction; 4]> = Direction::DIRECTIONS
        .iter()
        .copied()
        .filter(|dir| Some(*dir) != reverse)
        .filter(|dir| open(dir))
        .collect();

    if options.is_empty() {
        return match reverse {
            Some(dir) if open(&dir) => {
                trace!(?cell, direction = ?dir, "Pursuer forced to reverse direction");
                dir
            }
            Some(dir) => {
                warn!(?cell, "Pursuer boxed in with no open directions");
                dir
            }
            None => {
                warn!(?cell, "Pursuer boxed in with no open directions");
                Direction::Up
            }
        };
    }

    if frightened {
        if let Some(dir) = options.choose(rng) {
            return *dir;
        }
    }

    let goal = grid.cell_center(target);
    options
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = grid.cell_center(cell + a.as_ivec2()).distance_squared(goal);
            let db = grid.cell_center(cell + b.as_ivec2()).distance_squared(goal);
            da.total_cmp(&db)
        })
        .unwrap_or(Direction::Up)
}

/// Bounded A* from `start` to `target` over cells that do not block roaming pursuers.
///
/// The search is 4-connected and does not use the tunnel. The target is clamped into the grid;
/// equal priorities are expanded in insertion order. More than `limit` expansions gives
/// [`PathOutcome::Exhausted`].
pub fn astar(grid: &Grid, start: IVec2, target: IVec2, limit: usize) -> PathOutcome {
    let start = grid.clamp(grid.wrap(start));
    let target = grid.clamp(target);
    if start == target || grid.blocks(target, Barrier::WallsAndPen) {
        return PathOutcome::Unreachable;
    }

    let width = grid.width();
    let index = |cell: IVec2| (cell.y * width + cell.x) as usize;
    let heuristic = |cell: IVec2| (cell - target).abs().element_sum() as u32;
    let size = (grid.width() * grid.height()) as usize;

    let mut cost = vec![u32::MAX; size];
    let mut parent: Vec<Option<IVec2>> = vec![None; size];
    let mut closed = vec![false; size];
    let mut open = BinaryHeap::new();
    let mut sequence = 0usize;

    cost[index(start)] = 0;
    open.push((Reverse(heuristic(start)), Reverse(sequence), start.x, start.y));

    let mut expansions = 0;
    while let Some((_, _, x, y)) = open.pop() {
        let cell = IVec2::new(x, y);
        if closed[index(cell)] {
            continue;
        }
        closed[index(cell)] = true;

        if cell == target {
            return first_step(&parent, index, start, target);
        }

        expansions += 1;
        if expansions > limit {
            trace!(?start, ?target, expansions, "A* expansion budget exhausted");
            return PathOutcome::Exhausted;
        }

        let next_cost = cost[index(cell)] + 1;
        for dir in Direction::DIRECTIONS {
            let next = cell + dir.as_ivec2();
            if !grid.in_bounds(next) || grid.blocks(next, Barrier::WallsAndPen) || closed[index(next)] {
                continue;
            }
            if next_cost < cost[index(next)] {
                cost[index(next)] = next_cost;
                parent[index(next)] = Some(cell);
                sequence += 1;
                open.push((Reverse(next_cost + heuristic(next)), Reverse(sequence), next.x, next.y));
            }
        }
    }

    PathOutcome::Unreachable
}

fn first_step(parent: &[Option<IVec2>], index: impl Fn(IVec2) -> usize, start: IVec2, target: IVec2) -> PathOutcome {
    let mut cell = target;
    while let Some(previous) = parent[index(cell)] {
        if previous == start {
            return Direction::from_step(cell - start).map_or(PathOutcome::Unreachable, PathOutcome::Step);
        }
        cell = previous;
    }
    PathOutcome::Unreachable
}

fn pen_successors(grid: &Grid, cell: IVec2) -> SmallVec<[IVec2; 4]> {
    Direction::DIRECTIONS
        .iter()
        .map(|dir| cell + dir.as_ivec2())
        .filter(|next| grid.in_bounds(*next) && !grid.is_wall(*next))
        .collect()
}

/// The nearest cell outside the pen reachable from `cell` without crossing a wall.
pub fn find_spawn_exit(grid: &Grid, cell: IVec2) -> Option<IVec2> {
    if !grid.in_bounds(cell) || grid.is_wall(cell) {
        return None;
    }
    bfs(&cell, |&current| pen_successors(grid, current), |current| !grid.is_spawn(*current))
        .and_then(|path| path.last().copied())
}

/// The next cell on the shortest wall-free route from `cell` to `exit`.
///
/// Returns `exit` itself once `cell` is the exit.
pub fn spawn_exit_step(grid: &Grid, cell: IVec2, exit: IVec2) -> Option<IVec2> {
    if cell == exit {
        return Some(exit);
    }
    bfs(&cell, |&current| pen_successors(grid, current), |current| *current == exit)
        .and_then(|path| path.get(1).copied())
}
