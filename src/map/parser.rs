//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;

use crate::entity::targeting::Archetype;
use crate::error::ParseError;
use crate::map::grid::{Cell, Grid};

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMaze {
    /// The parsed cell layout.
    pub grid: Grid,
    /// The player's starting cell.
    pub player_start: IVec2,
    /// Starting cells of the pursuers, in archetype order.
    pub pursuer_starts: Vec<(Archetype, IVec2)>,
}

/// A single parsed board character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Cell(Cell),
    PlayerStart,
    PursuerStart(Archetype),
}

impl Glyph {
    pub fn cell(self) -> Cell {
        match self {
            Glyph::Cell(cell) => cell,
            Glyph::PlayerStart => Cell::Open,
            Glyph::PursuerStart(_) => Cell::PursuerSpawn,
        }
    }
}

/// Parser for converting raw board layouts into structured maze data.
pub struct MazeParser;

impl MazeParser {
    /// Parses a single board character.
    pub fn parse_character(c: char) -> Result<Glyph, ParseError> {
        match c {
            '#' => Ok(Glyph::Cell(Cell::Wall)),
            '.' => Ok(Glyph::Cell(Cell::Pellet)),
            'o' => Ok(Glyph::Cell(Cell::PowerPellet)),
            ' ' => Ok(Glyph::Cell(Cell::Open)),
            'G' => Ok(Glyph::Cell(Cell::PursuerSpawn)),
            'P' => Ok(Glyph::PlayerStart),
            '0'..='3' => {
                let index = c as usize - '0' as usize;
                Archetype::from_index(index)
                    .map(Glyph::PursuerStart)
                    .ok_or(ParseError::UnknownCharacter(c))
            }
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured maze data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, has rows of different lengths,
    /// contains unknown characters, does not have exactly one player start, or
    /// names an archetype start twice.
    pub fn parse_board<S: AsRef<str>>(raw_board: &[S]) -> Result<ParsedMaze, ParseError> {
        let mut rows = Vec::with_capacity(raw_board.len());
        let mut player_starts = Vec::new();
        let mut pursuer_starts: Vec<(Archetype, IVec2)> = Vec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let mut row = Vec::with_capacity(line.as_ref().len());
            for (x, character) in line.as_ref().chars().enumerate() {
                let glyph = Self::parse_character(character)?;
                let position = IVec2::new(x as i32, y as i32);

                match glyph {
                    Glyph::PlayerStart => player_starts.push(position),
                    Glyph::PursuerStart(archetype) => {
                        if pursuer_starts.iter().any(|(existing, _)| *existing == archetype) {
                            return Err(ParseError::DuplicateStart(archetype));
                        }
                        pursuer_starts.push((archetype, position));
                    }
                    Glyph::Cell(_) => {}
                }

                row.push(glyph.cell());
            }
            rows.push(row);
        }

        let grid = Grid::from_rows(rows)?;

        let [player_start] = player_starts[..] else {
            return Err(ParseError::PlayerStartCount(player_starts.len()));
        };

        pursuer_starts.sort_by_key(|(archetype, _)| *archetype);

        Ok(ParsedMaze {
            grid,
            player_start,
            pursuer_starts,
        })
    }
}
