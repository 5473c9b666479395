//! Target cell selection for the four pursuer archetypes.
//!
//! Each archetype is a [`TargetingStrategy`] chosen once when its pursuer is built, so the rest of
//! the pursuer logic never branches on identity.

use std::fmt::Debug;
use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::Rng;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::constants::targeting::{AMBUSH_LOOKAHEAD, FLANK_PIVOT_LOOKAHEAD, RETREAT_RADIUS_CELLS};
use crate::constants::timing::RELEASE_DELAYS;
use crate::entity::behavior::Mode;
use crate::error::EntityError;
use crate::map::grid::Grid;

/// The four fixed pursuer identities, in update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
pub enum Archetype {
    /// Heads straight for the player.
    Direct,
    /// Aims a few cells ahead of the player.
    Ambusher,
    /// Mirrors a point ahead of the player through the direct pursuer.
    Flanker,
    /// Chases from afar, retreats when close.
    Opportunist,
}

impl Archetype {
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// How long this archetype waits in the pen after a reset.
    pub fn release_delay(self) -> Duration {
        RELEASE_DELAYS[self as usize]
    }

    /// Builds the targeting strategy for this archetype.
    pub fn strategy(self) -> Box<dyn TargetingStrategy> {
        match self {
            Archetype::Direct => Box::new(DirectPursuit),
            Archetype::Ambusher => Box::new(Ambush),
            Archetype::Flanker => Box::new(Flank),
            Archetype::Opportunist => Box::new(Opportunism),
        }
    }
}

/// How a pursuer turns its target cell into a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Local distance scoring over the neighbouring cells.
    Greedy,
    /// Bounded A* search over the whole grid.
    AStar,
}

/// The player state a strategy may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub heading: IVec2,
    pub cell: IVec2,
}

/// Everything a strategy needs to pick a chase target.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub grid: &'a Grid,
    pub player: PlayerSnapshot,
    /// Position of the direct pursuer after its update for this tick, if it exists.
    pub leader: Option<Vec2>,
    /// Position of the pursuer asking.
    pub position: Vec2,
}

pub trait TargetingStrategy: Debug {
    fn archetype(&self) -> Archetype;

    /// The corner this archetype heads for while scattering.
    fn scatter_corner(&self, grid: &Grid) -> IVec2;

    /// The target while chasing.
    fn chase_target(&self, context: &TargetContext) -> Result<IVec2, EntityError>;

    /// Which resolver moves the pursuer in the given mode.
    fn resolver(&self, mode: Mode) -> Resolver {
        let _ = mode;
        Resolver::Greedy
    }
}

/// Picks the target cell for a pursuer in `mode`.
///
/// Frightened pursuers wander toward a uniformly random cell; pursuers inside the pen keep their
/// scatter corner as a placeholder since their movement ignores the target.
pub fn select_target<R: Rng + ?Sized>(
    strategy: &dyn TargetingStrategy,
    mode: Mode,
    context: &TargetContext,
    rng: &mut R,
) -> Result<IVec2, EntityError> {
    match mode {
        Mode::Frightened => Ok(IVec2::new(
            rng.random_range(0..context.grid.width()),
            rng.random_range(0..context.grid.height()),
        )),
        Mode::Chase => strategy.chase_target(context),
        Mode::Scatter | Mode::SpawnWait | Mode::SpawnExit => Ok(strategy.scatter_corner(context.grid)),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DirectPursuit;

impl TargetingStrategy for DirectPursuit {
    fn archetype(&self) -> Archetype {
        Archetype::Direct
    }

    fn scatter_corner(&self, grid: &Grid) -> IVec2 {
        grid.corners()[1]
    }

    fn chase_target(&self, context: &TargetContext) -> Result<IVec2, EntityError> {
        Ok(context.player.cell)
    }

    fn resolver(&self, mode: Mode) -> Resolver {
        match mode {
            Mode::Chase => Resolver::AStar,
            _ => Resolver::Greedy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ambush;

impl TargetingStrategy for Ambush {
    fn archetype(&self) -> Archetype {
        Archetype::Ambusher
    }

    fn scatter_corner(&self, grid: &Grid) -> IVec2 {
        grid.corners()[0]
    }

    fn chase_target(&self, context: &TargetContext) -> Result<IVec2, EntityError> {
        Ok(context.player.cell + context.player.heading * AMBUSH_LOOKAHEAD)
    }

    fn resolver(&self, mode: Mode) -> Resolver {
        match mode {
            Mode::Frightened => Resolver::Greedy,
            _ => Resolver::AStar,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Flank;

impl TargetingStrategy for Flank {
    fn archetype(&self) -> Archetype {
        Archetype::Flanker
    }

    fn scatter_corner(&self, grid: &Grid) -> IVec2 {
        grid.corners()[2]
    }

    fn chase_target(&self, context: &TargetContext) -> Result<IVec2, EntityError> {
        let leader = context.leader.ok_or(EntityError::MissingArchetype(Archetype::Direct))?;
        let lookahead = FLANK_PIVOT_LOOKAHEAD * context.grid.cell_size();
        let pivot = context.player.position + context.player.heading.as_vec2() * lookahead;
        Ok(context.grid.cell_of(pivot * 2.0 - leader))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Opportunism;

impl TargetingStrategy for Opportunism {
    fn archetype(&self) -> Archetype {
        Archetype::Opportunist
    }

    fn scatter_corner(&self, grid: &Grid) -> IVec2 {
        grid.corners()[3]
    }

    fn chase_target(&self, context: &TargetContext) -> Result<IVec2, EntityError> {
        let radius = RETREAT_RADIUS_CELLS * context.grid.cell_size();
        if context.position.distance(context.player.position) < radius {
            Ok(self.scatter_corner(context.grid))
        } else {
            Ok(context.player.cell)
        }
    }
}
