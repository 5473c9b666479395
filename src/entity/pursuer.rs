//! An autonomous pursuer: behaviour timers, targeting, direction choice and movement.

use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::constants::collider::{AGENT_RADIUS_CELLS, INTERSECTION_TOLERANCE};
use crate::constants::speed::{FRIGHTENED_MULTIPLIER, SPAWN_EXIT_MULTIPLIER};
use crate::constants::targeting::ASTAR_EXPANSION_LIMIT;
use crate::entity::behavior::{Behavior, Mode, Timings, Transition};
use crate::entity::collision::{self, Collidable};
use crate::entity::pathing::{self, PathOutcome};
use crate::entity::targeting::{self, Archetype, PlayerSnapshot, Resolver, TargetContext, TargetingStrategy};
use crate::map::direction::Direction;
use crate::map::grid::{Barrier, Grid};

#[derive(Debug)]
pub struct Pursuer {
    archetype: Archetype,
    strategy: Box<dyn TargetingStrategy>,
    start: IVec2,
    position: Vec2,
    heading: IVec2,
    base_speed: f32,
    radius: f32,
    behavior: Behavior,
    target: IVec2,
    /// Where this pursuer leaves the pen; found once per reset.
    exit_cell: Option<IVec2>,
    /// Whether the pursuer currently occupies a pen cell.
    in_pen: bool,
    /// The cell where the last intersection decision was made.
    decided_at: Option<IVec2>,
}

impl Pursuer {
    /// Creates a pursuer at the centre of `start`, already released: it scatters straight away, or
    /// heads for the exit first when `start` is inside the pen.
    pub fn new(grid: &Grid, archetype: Archetype, start: IVec2, base_speed: f32, timings: Timings) -> Self {
        let strategy = archetype.strategy();
        let in_pen = grid.is_spawn(start);
        let target = strategy.scatter_corner(grid);

        Self {
            archetype,
            strategy,
            start,
            position: grid.cell_center(start),
            heading: IVec2::ZERO,
            base_speed,
            radius: grid.cell_size() * AGENT_RADIUS_CELLS,
            behavior: Behavior::released(timings, in_pen),
            target,
            exit_cell: Self::locate_exit(grid, archetype, start),
            in_pen,
            decided_at: None,
        }
    }

    fn locate_exit(grid: &Grid, archetype: Archetype, start: IVec2) -> Option<IVec2> {
        if !grid.is_spawn(start) {
            return None;
        }
        let exit = pathing::find_spawn_exit(grid, start);
        if exit.is_none() {
            warn!(%archetype, ?start, "No way out of the pen");
        }
        exit
    }

    /// Returns to the start cell and waits out this archetype's release delay.
    pub fn reset(&mut self, grid: &Grid) {
        self.position = grid.cell_center(self.start);
        self.heading = IVec2::ZERO;
        self.behavior.reset(self.archetype.release_delay());
        self.target = self.strategy.scatter_corner(grid);
        self.exit_cell = Self::locate_exit(grid, self.archetype, self.start);
        self.in_pen = grid.is_spawn(self.start);
        self.decided_at = None;
        debug!(archetype = %self.archetype, delay = ?self.archetype.release_delay(), "Pursuer reset");
    }

    /// Advances the pursuer by `dt` seconds.
    ///
    /// `leader` is the direct pursuer's position after its own update for this tick.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        player: &PlayerSnapshot,
        leader: Option<Vec2>,
        dt: f32,
        rng: &mut R,
    ) {
        let elapsed = Duration::from_secs_f32(dt.max(0.0));
        match self.behavior.advance(elapsed) {
            Some(Transition::Released) => {
                debug!(archetype = %self.archetype, exit = ?self.exit_cell, "Pursuer released");
                self.heading = self.exit_heading(grid);
                return;
            }
            Some(Transition::Cycled(mode)) => {
                debug!(archetype = %self.archetype, ?mode, "Pursuer mode changed");
            }
            Some(Transition::FrightEnded) => {
                debug!(archetype = %self.archetype, "Pursuer no longer frightened");
            }
            None => {}
        }

        match self.mode() {
            Mode::SpawnWait => return,
            Mode::SpawnExit => {
                self.leave_pen(grid, dt);
                return;
            }
            _ => {}
        }

        let context = TargetContext {
            grid,
            player: *player,
            leader,
            position: self.position,
        };
        match targeting::select_target(self.strategy.as_ref(), self.mode(), &context, rng) {
            Ok(target) => self.target = target,
            Err(error) => {
                warn!(archetype = %self.archetype, %error, target = ?self.target, "Keeping previous target")
            }
        }

        self.roam(grid, dt, rng);
    }

    /// Direction of the next step toward the pen exit.
    fn exit_heading(&self, grid: &Grid) -> IVec2 {
        let cell = grid.cell_of(self.position);
        self.exit_cell
            .and_then(|exit| pathing::spawn_exit_step(grid, cell, exit))
            .map(|next| (next - cell).clamp(IVec2::NEG_ONE, IVec2::ONE))
            .unwrap_or(IVec2::ZERO)
    }

    fn leave_pen(&mut self, grid: &Grid, dt: f32) {
        let cell = grid.cell_of(self.position);
        self.in_pen = grid.is_spawn(cell);

        if !self.in_pen {
            self.position = grid.cell_center(cell);
            self.behavior.finish_exit();
            self.decided_at = None;
            debug!(archetype = %self.archetype, ?cell, "Pursuer left the pen");
            return;
        }

        let Some(next) = self.exit_cell.and_then(|exit| pathing::spawn_exit_step(grid, cell, exit)) else {
            // Unreachable for a validated maze; drift upward so the pursuer is never frozen.
            warn!(archetype = %self.archetype, ?cell, "Pursuer has no route out of the pen");
            self.heading = Direction::Up.as_ivec2();
            let next = self.position + Direction::Up.as_vec2() * self.effective_speed() * dt;
            if !collision::overlaps(grid, next, self.radius, Barrier::WallsOnly) {
                self.position = next;
            }
            return;
        };

        // Line up with the current cell centre before turning toward the next one.
        let step = next - cell;
        let center = grid.cell_center(cell);
        let offset = self.position - center;
        let aim = if offset.perp_dot(step.as_vec2()).abs() < 0.01 {
            grid.cell_center(next)
        } else {
            center
        };

        let to_aim = aim - self.position;
        let travel = (self.effective_speed() * dt).min(to_aim.length());
        let moved = self.position + to_aim.normalize_or_zero() * travel;

        if collision::overlaps(grid, moved, self.radius, Barrier::WallsOnly) {
            trace!(archetype = %self.archetype, ?cell, "Pen exit blocked, snapping to cell centre");
            self.position = center;
        } else {
            self.position = moved;
        }
        self.heading = step.clamp(IVec2::NEG_ONE, IVec2::ONE);
    }

    fn roam<R: Rng + ?Sized>(&mut self, grid: &Grid, dt: f32, rng: &mut R) {
        let mut remaining = self.effective_speed() * dt;
        if remaining <= 0.0 {
            return;
        }

        // Travel is split at every cell centre on the way, so each one gets its decision.
        let max_segments = (remaining / grid.cell_size()).ceil() as usize * 2 + 2;
        for _ in 0..max_segments {
            if remaining <= 0.0 {
                break;
            }

            let cell = grid.cell_of(self.position);
            let center = grid.cell_center(cell);
            let wrapped = grid.wrap(cell);

            let offset = (self.position - center).abs();
            if offset.max_element() <= INTERSECTION_TOLERANCE && self.decided_at != Some(wrapped) {
                self.position = center;
                self.heading = self.resolve(grid, cell, rng).as_ivec2();
                self.decided_at = Some(wrapped);
            }

            if self.heading == IVec2::ZERO {
                self.heading = self.greedy(grid, cell, rng).as_ivec2();
            }

            // Distance to the next centre along the heading: this cell's if still ahead, else the
            // neighbour's.
            let ahead = (center - self.position).dot(self.heading.as_vec2());
            let segment = if ahead > 0.0 { ahead } else { ahead + grid.cell_size() };
            let travel = remaining.min(segment);

            let next = self.position + self.heading.as_vec2() * travel;
            if collision::overlaps(grid, next, self.radius, Barrier::WallsAndPen) {
                let dir = self.greedy(grid, cell, rng);
                trace!(archetype = %self.archetype, ?cell, direction = ?dir, "Pursuer blocked, choosing again");
                self.heading = dir.as_ivec2();
                self.decided_at = None;
                return;
            }

            self.position = next;
            remaining -= travel;

            let world_width = grid.world_width();
            if self.position.x < 0.0 {
                self.position.x = world_width;
            } else if self.position.x > world_width {
                self.position.x = 0.0;
            }
        }

        self.in_pen = grid.is_spawn(grid.cell_of(self.position));
    }

    fn greedy<R: Rng + ?Sized>(&self, grid: &Grid, cell: IVec2, rng: &mut R) -> Direction {
        pathing::choose_direction(grid, cell, self.heading, self.target, self.is_frightened(), rng)
    }

    /// Picks a direction at an intersection using this archetype's resolver.
    fn resolve<R: Rng + ?Sized>(&self, grid: &Grid, cell: IVec2, rng: &mut R) -> Direction {
        match self.strategy.resolver(self.mode()) {
            Resolver::Greedy => self.greedy(grid, cell, rng),
            Resolver::AStar => match pathing::astar(grid, cell, self.target, ASTAR_EXPANSION_LIMIT) {
                PathOutcome::Step(dir) => dir,
                PathOutcome::Unreachable => {
                    trace!(archetype = %self.archetype, target = ?self.target, "No path, falling back to greedy");
                    self.greedy(grid, cell, rng)
                }
                PathOutcome::Exhausted => match Direction::from_step(self.heading) {
                    Some(dir) if !grid.blocks(cell + dir.as_ivec2(), Barrier::WallsAndPen) => dir,
                    _ => self.greedy(grid, cell, rng),
                },
            },
        }
    }

    /// Starts or restarts the fright timer, reversing direction. Ignored inside the pen.
    pub fn frighten(&mut self) -> bool {
        if !self.behavior.frighten() {
            return false;
        }
        self.heading = -self.heading;
        debug!(archetype = %self.archetype, heading = ?self.heading, "Pursuer frightened");
        true
    }

    /// Raises the base speed, as happens on each level advance.
    pub fn increase_speed(&mut self, amount: f32) {
        self.base_speed += amount;
    }

    /// Speed after mode modifiers are applied.
    pub fn effective_speed(&self) -> f32 {
        match self.mode() {
            Mode::SpawnWait => 0.0,
            Mode::SpawnExit => self.base_speed * SPAWN_EXIT_MULTIPLIER,
            Mode::Frightened => self.base_speed * FRIGHTENED_MULTIPLIER,
            Mode::Scatter | Mode::Chase => self.base_speed,
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn mode(&self) -> Mode {
        self.behavior.mode()
    }

    pub fn is_frightened(&self) -> bool {
        self.behavior.is_frightened()
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn heading(&self) -> IVec2 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: IVec2) {
        self.heading = heading;
    }

    pub fn target(&self) -> IVec2 {
        self.target
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn start(&self) -> IVec2 {
        self.start
    }

    pub fn exit_cell(&self) -> Option<IVec2> {
        self.exit_cell
    }

    pub fn in_pen(&self) -> bool {
        self.in_pen
    }

    pub fn cell(&self, grid: &Grid) -> IVec2 {
        grid.wrap(grid.cell_of(self.position))
    }
}

impl Collidable for Pursuer {
    fn position(&self) -> Vec2 {
        self.position
    }
}
