//! Continuous-position collision queries against the discrete cell grid.

use glam::{IVec2, Vec2};

use crate::constants::collider::PROBE_SCALE;
use crate::map::grid::{Barrier, Grid};

/// Trait for agents that take part in proximity checks.
pub trait Collidable {
    /// Returns the current continuous position of this agent.
    fn position(&self) -> Vec2;

    /// Checks whether this agent is closer than `distance` to another one.
    fn is_touching(&self, other: &dyn Collidable, distance: f32) -> bool {
        self.position().distance_squared(other.position()) < distance * distance
    }
}

/// The inclusive range of cells covered by an agent's probe box.
pub fn covered_cells(grid: &Grid, position: Vec2, radius: f32) -> (IVec2, IVec2) {
    let half = Vec2::splat(radius * PROBE_SCALE);
    (grid.cell_of(position - half), grid.cell_of(position + half))
}

/// Whether a square box of half-width `radius * PROBE_SCALE` centred at
/// `position` touches any cell that blocks under `barrier`.
///
/// Rows outside the grid always block. Columns wrap, so a box hanging over
/// the tunnel edge is tested against the cells on the far side instead of
/// being treated as a wall.
pub fn overlaps(grid: &Grid, position: Vec2, radius: f32, barrier: Barrier) -> bool {
    let (min, max) = covered_cells(grid, position, radius);
    (min.y..=max.y).any(|y| (min.x..=max.x).any(|x| grid.blocks(IVec2::new(x, y), barrier)))
}

/// Whether the agent's box touches a true wall (or leaves the grid vertically).
pub fn overlaps_wall(grid: &Grid, position: Vec2, radius: f32) -> bool {
    overlaps(grid, position, radius, Barrier::WallsOnly)
}
