use serde::{Deserialize, Serialize};

/// Integer cell coordinate. Rows run along world Z, columns along world X.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSquare {
    pub row: usize,
    pub col: usize,
}

impl GridSquare {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour at a signed offset, or `None` below zero.
    #[inline]
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    #[inline]
    pub fn chebyshev_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> usize {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr * dr + dc * dc
    }
}

/// Inclusive rectangle of cells that clips a single query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathfindRange {
    pub min: GridSquare,
    pub max: GridSquare,
}

impl PathfindRange {
    pub fn new(min: GridSquare, max: GridSquare) -> Self {
        Self {
            min: GridSquare::new(min.row.min(max.row), min.col.min(max.col)),
            max: GridSquare::new(min.row.max(max.row), min.col.max(max.col)),
        }
    }

    #[inline]
    pub fn contains(&self, square: GridSquare) -> bool {
        square.row >= self.min.row
            && square.row <= self.max.row
            && square.col >= self.min.col
            && square.col <= self.max.col
    }

    pub fn rows(&self) -> usize {
        self.max.row - self.min.row + 1
    }

    pub fn cols(&self) -> usize {
        self.max.col - self.min.col + 1
    }

    /// Overlap of two ranges, or `None` when disjoint.
    pub fn intersect(&self, other: &PathfindRange) -> Option<PathfindRange> {
        let min = GridSquare::new(self.min.row.max(other.min.row), self.min.col.max(other.min.col));
        let max = GridSquare::new(self.max.row.min(other.max.row), self.max.col.min(other.max.col));
        (min.row <= max.row && min.col <= max.col).then_some(PathfindRange { min, max })
    }
}

/// Compass directions on the grid. North is +row (+Z), east is +col (+X).
///
/// `ALL` is the fixed scan order used wherever neighbours or ring candidates
/// must be visited deterministically: E, N, W, S, NE, NW, SW, SE.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthWest = 6,
    SouthEast = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// `(d_row, d_col)` of one step in this direction.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::North => (1, 0),
            Direction::West => (0, -1),
            Direction::South => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (1, -1),
            Direction::SouthWest => (-1, -1),
            Direction::SouthEast => (-1, 1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) >= 4
    }
}
