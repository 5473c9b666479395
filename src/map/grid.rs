//! The cell grid shared by every agent in a round.

use glam::{IVec2, Vec2};

use crate::constants::CELL_SIZE;
use crate::error::{MapError, ParseError};

/// The contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Walkable floor with nothing on it.
    Open,
    /// A regular collectible.
    Pellet,
    /// A power item; collecting it frightens every pursuer.
    PowerPellet,
    /// Solid for everyone.
    Wall,
    /// Part of the pursuer pen.
    PursuerSpawn,
}

impl Cell {
    pub fn is_collectible(self) -> bool {
        matches!(self, Cell::Pellet | Cell::PowerPellet)
    }
}

/// Which cells count as solid for a movement or collision query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Barrier {
    /// Only true walls block. Used while a pursuer is waiting in or leaving the pen.
    WallsOnly,
    /// Walls and pen cells block. Used by the player and by roaming pursuers.
    WallsAndPen,
}

/// A rectangular matrix of cells.
///
/// Columns wrap around (the horizontal tunnel), rows do not: any row outside
/// the grid behaves as a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    cells: Vec<Cell>,
    items: usize,
}

impl Grid {
    /// Builds a grid from rows of cells. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, ParseError> {
        let expected = rows.first().map(Vec::len).ok_or(ParseError::Empty)?;
        if expected == 0 {
            return Err(ParseError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.len() != expected {
                return Err(ParseError::RaggedRow {
                    row,
                    expected,
                    found: line.len(),
                });
            }
            cells.extend_from_slice(line);
        }

        let items = cells.iter().filter(|cell| cell.is_collectible()).count();
        Ok(Self {
            width: expected as i32,
            height: rows.len() as i32,
            cell_size: CELL_SIZE,
            cells,
            items,
        })
    }

    /// Overrides the world-unit size of a cell.
    pub fn with_cell_size(mut self, cell_size: f32) -> Result<Self, MapError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MapError::InvalidConfig(format!("cell size must be positive, got {cell_size}")));
        }
        self.cell_size = cell_size;
        Ok(self)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Width of the grid in world units; the tunnel wraps at this coordinate.
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.y < 0 || cell.y >= self.height {
            return None;
        }
        let x = cell.x.rem_euclid(self.width);
        Some((cell.y * self.width + x) as usize)
    }

    /// Returns the cell, wrapping the column. `None` when the row is outside the grid.
    pub fn get(&self, cell: IVec2) -> Option<Cell> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// True for walls and for anything above or below the grid.
    pub fn is_wall(&self, cell: IVec2) -> bool {
        matches!(self.get(cell), None | Some(Cell::Wall))
    }

    pub fn is_spawn(&self, cell: IVec2) -> bool {
        matches!(self.get(cell), Some(Cell::PursuerSpawn))
    }

    /// Whether `cell` stops movement under the given barrier rules.
    pub fn blocks(&self, cell: IVec2, barrier: Barrier) -> bool {
        match self.get(cell) {
            None | Some(Cell::Wall) => true,
            Some(Cell::PursuerSpawn) => barrier == Barrier::WallsAndPen,
            Some(_) => false,
        }
    }

    /// The cell containing a continuous position. The column is not wrapped.
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        (position / self.cell_size).floor().as_ivec2()
    }

    /// Maps a cell onto the grid's column range, leaving the row untouched.
    pub fn wrap(&self, cell: IVec2) -> IVec2 {
        IVec2::new(cell.x.rem_euclid(self.width), cell.y)
    }

    /// Clamps a cell into the grid bounds.
    pub fn clamp(&self, cell: IVec2) -> IVec2 {
        cell.clamp(IVec2::ZERO, IVec2::new(self.width - 1, self.height - 1))
    }

    /// The continuous position of a cell's centre.
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    /// The four grid corners: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [IVec2; 4] {
        [
            IVec2::ZERO,
            IVec2::new(self.width - 1, 0),
            IVec2::new(self.width - 1, self.height - 1),
            IVec2::new(0, self.height - 1),
        ]
    }

    /// Removes a collectible from the cell, returning what was there.
    pub fn take_item(&mut self, cell: IVec2) -> Option<Cell> {
        let index = self.index(cell)?;
        let taken = self.cells[index];
        if !taken.is_collectible() {
            return None;
        }
        self.cells[index] = Cell::Open;
        self.items -= 1;
        Some(taken)
    }

    /// Number of collectibles and power items still on the grid.
    pub fn items_remaining(&self) -> usize {
        self.items
    }

    /// Iterates over every in-bounds cell with its coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (IVec2::new(index as i32 % self.width, index as i32 / self.width), *cell))
    }
}
