//! The player-controlled agent: buffered turns, wall sliding and tunnel wraparound.

use glam::{IVec2, Vec2};
use tracing::{error, trace, warn};

use crate::constants::collider::AGENT_RADIUS_CELLS;
use crate::constants::speed;
use crate::entity::collision::{self, Collidable};
use crate::entity::targeting::PlayerSnapshot;
use crate::map::direction::Direction;
use crate::map::grid::{Barrier, Grid};

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    start: Vec2,
    /// Current movement step; zero when stopped.
    heading: IVec2,
    /// The most recent input, applied as soon as the turn is clear.
    buffered: Option<Direction>,
    /// Presentation only.
    facing: f32,
    radius: f32,
    speed: f32,
}

impl Player {
    /// Places a new player on the centre of `start`, relocating it if that spot is blocked.
    pub fn new(grid: &Grid, start: IVec2, speed: f32) -> Self {
        let mut player = Self {
            position: Vec2::ZERO,
            start: grid.cell_center(start),
            heading: IVec2::ZERO,
            buffered: None,
            facing: 0.0,
            radius: grid.cell_size() * AGENT_RADIUS_CELLS,
            speed,
        };
        player.reset(grid);
        player
    }

    /// A player using the default speed.
    pub fn with_default_speed(grid: &Grid, start: IVec2) -> Self {
        Self::new(grid, start, speed::PLAYER)
    }

    fn blocked(&self, grid: &Grid, position: Vec2) -> bool {
        collision::overlaps(grid, position, self.radius, Barrier::WallsAndPen)
    }

    /// Advances the player by `dt` seconds.
    pub fn update(&mut self, grid: &Grid, dt: f32) {
        let distance = self.speed * dt;

        // A buffered turn is committed only if a full step in that direction is clear.
        if let Some(dir) = self.buffered {
            if !self.blocked(grid, self.position + dir.as_vec2() * distance) {
                if self.heading != dir.as_ivec2() {
                    trace!(direction = ?dir, "Player turned");
                }
                self.heading = dir.as_ivec2();
            }
        }

        if self.heading != IVec2::ZERO {
            let step = self.heading.as_vec2() * distance;
            let next = self.position + step;

            if !self.blocked(grid, next) {
                self.position = next;
            } else {
                let vertical = self.position + Vec2::new(0.0, step.y);
                let horizontal = self.position + Vec2::new(step.x, 0.0);

                if step.y != 0.0 && !self.blocked(grid, vertical) {
                    self.position = vertical;
                    self.heading.x = 0;
                } else if step.x != 0.0 && !self.blocked(grid, horizontal) {
                    self.position = horizontal;
                    self.heading.y = 0;
                } else {
                    self.heading = IVec2::ZERO;
                }
            }
        }

        if self.heading != IVec2::ZERO {
            self.facing = self.heading.as_vec2().to_angle();
        }

        self.wrap_tunnel(grid);
    }

    fn wrap_tunnel(&mut self, grid: &Grid) {
        let world_width = grid.world_width();
        if self.position.x < 0.0 {
            self.position.x = world_width;
        } else if self.position.x > world_width {
            self.position.x = 0.0;
        }
    }

    /// Returns to the start with no heading and no buffered turn.
    ///
    /// When the start overlaps a wall the four cells around it are tried in Up, Right, Down, Left
    /// order.
    pub fn reset(&mut self, grid: &Grid) {
        self.position = self.start;
        self.heading = IVec2::ZERO;
        self.buffered = None;
        self.facing = 0.0;

        if !self.blocked(grid, self.position) {
            return;
        }

        let free = Direction::DIRECTIONS
            .iter()
            .map(|dir| self.start + dir.as_vec2() * grid.cell_size())
            .find(|candidate| !self.blocked(grid, *candidate));

        match free {
            Some(candidate) => {
                warn!(start = ?self.start, relocated = ?candidate, "Player start blocked, relocated");
                self.position = candidate;
            }
            None => error!(start = ?self.start, "Player start blocked with no free neighbour"),
        }
    }

    /// Escape hatch for an unrecoverable stuck state.
    pub fn force_unstick(&mut self, grid: &Grid) {
        warn!(position = ?self.position, "Forcing player back to its start");
        self.reset(grid);
    }

    pub fn set_next_direction(&mut self, direction: Direction) {
        self.buffered = Some(direction);
    }

    pub fn set_heading(&mut self, heading: IVec2) {
        self.heading = heading;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> IVec2 {
        self.heading
    }

    pub fn buffered(&self) -> Option<Direction> {
        self.buffered
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn cell(&self, grid: &Grid) -> IVec2 {
        grid.wrap(grid.cell_of(self.position))
    }

    /// The view of the player handed to pursuer targeting.
    pub fn snapshot(&self, grid: &Grid) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            heading: self.heading,
            cell: self.cell(grid),
        }
    }
}

impl Collidable for Player {
    fn position(&self) -> Vec2 {
        self.position
    }
}
