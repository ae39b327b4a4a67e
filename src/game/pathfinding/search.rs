use bevy::prelude::*;
use smallvec::SmallVec;

use crate::game::navigation::{Direction, GridSquare, NavigationGrid, PathfindRange};

/// The cells one search may touch, flattened into local indices.
///
/// Both strategies share this: what is passable, who the neighbours are, and
/// how a came-from chain turns back into cells.
pub(super) struct SearchSpace<'a> {
    pub grid: &'a NavigationGrid,
    pub range: PathfindRange,
    pub mover: Option<Entity>,
    pub start: GridSquare,
    pub destination: GridSquare,
}

impl<'a> SearchSpace<'a> {
    /// `None` when `range` and the grid don't overlap or either endpoint
    /// falls outside the searchable range.
    pub fn new(
        grid: &'a NavigationGrid,
        range: Option<&PathfindRange>,
        mover: Option<Entity>,
        start: GridSquare,
        destination: GridSquare,
    ) -> Option<Self> {
        let full = grid.full_range();
        let range = match range {
            Some(r) => r.intersect(&full)?,
            None => full,
        };
        if !range.contains(start) || !range.contains(destination) {
            return None;
        }
        Some(Self { grid, range, mover, start, destination })
    }

    pub fn len(&self) -> usize {
        self.range.rows() * self.range.cols()
    }

    #[inline]
    pub fn local_index(&self, square: GridSquare) -> usize {
        (square.row - self.range.min.row) * self.range.cols() + (square.col - self.range.min.col)
    }

    #[inline]
    pub fn square_at(&self, index: usize) -> GridSquare {
        let cols = self.range.cols();
        GridSquare::new(self.range.min.row + index / cols, self.range.min.col + index % cols)
    }

    /// In range, not steep, and free. The destination skips the occupancy
    /// check; cells held by the mover count as free.
    pub fn is_passable(&self, square: GridSquare) -> bool {
        if !self.range.contains(square) {
            return false;
        }
        let Some(cell) = self.grid.square(square) else {
            return false;
        };
        if cell.steep {
            return false;
        }
        !cell.occupied
            || square == self.destination
            || (self.mover.is_some() && cell.occupant == self.mover)
    }

    /// Passable 8-connected neighbours in the fixed compass order.
    pub fn neighbours(&self, square: GridSquare) -> SmallVec<[(GridSquare, Direction); 8]> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| {
                let (dr, dc) = dir.offset();
                let next = square.offset(dr, dc)?;
                self.is_passable(next).then_some((next, dir))
            })
            .collect()
    }

    /// Walk `came_from` back from the destination. The start cell is not
    /// included.
    pub fn trace_back(&self, came_from: &[Option<usize>]) -> Vec<GridSquare> {
        let start = self.local_index(self.start);
        let mut current = self.local_index(self.destination);
        let mut cells = Vec::new();

        while current != start {
            cells.push(self.square_at(current));
            match came_from[current] {
                Some(previous) => current = previous,
                None => {
                    error!("[PATHFINDING] Broken came-from chain at {:?}", self.square_at(current));
                    return Vec::new();
                }
            }
        }

        cells.reverse();
        cells
    }
}
