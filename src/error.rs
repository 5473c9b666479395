//! Centralized error types for the simulation core.
//!
//! Only maze loading can fail. Problems found while ticking are recovered
//! where they happen and reported through `tracing` instead.

use glam::IVec2;

use crate::entity::targeting::Archetype;

/// Main error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),
}

/// Error type for maze parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board has no rows")]
    Empty,
    #[error("Player start must appear exactly once, found {0}")]
    PlayerStartCount(usize),
    #[error("Start of archetype {0} appears more than once")]
    DuplicateStart(Archetype),
}

/// Errors raised while validating a maze before a round starts.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MapError {
    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),

    #[error("Start cell {0} is outside the grid")]
    OutOfBounds(IVec2),

    #[error("Player start {0} is walled in")]
    PlayerWalledIn(IVec2),

    #[error("Pursuer start {cell} for {archetype} is a wall")]
    PursuerInWall { archetype: Archetype, cell: IVec2 },

    #[error("Pursuer {archetype} cannot leave the pen from {cell}")]
    NoPenExit { archetype: Archetype, cell: IVec2 },

    #[error("Pursuer {archetype} at {cell} is unreachable from the player start")]
    Unreachable { archetype: Archetype, cell: IVec2 },
}

/// Errors related to entity operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {
    #[error("No pursuer with archetype {0} in this round")]
    MissingArchetype(Archetype),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
