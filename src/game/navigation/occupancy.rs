use bevy::prelude::*;

use super::grid::{range_squares, NavigationGrid};
use super::types::{GridSquare, PathfindRange};
use crate::game::collision::{BoundingBox, CollisionIndex};

impl NavigationGrid {
    /// Set or clear occupancy on every cell under `bounds`' footprint.
    ///
    /// Clearing also drops the occupant. Footprints partly off the grid are
    /// clipped; fully off the grid is a no-op.
    pub fn mark_area(&mut self, bounds: &BoundingBox, occupied: bool, occupant: Option<Entity>) {
        let Some(range) = self.squares_under(bounds) else {
            return;
        };
        for square in range_squares(range) {
            self.set_occupied(square, occupied, occupant);
        }
    }

    /// Like [`mark_area`](Self::mark_area), but only touches steep cells.
    pub fn mark_area_if_steep(&mut self, bounds: &BoundingBox, occupied: bool) {
        let Some(range) = self.squares_under(bounds) else {
            return;
        };
        for square in range_squares(range) {
            if self.square(square).is_some_and(|s| s.steep) {
                self.set_occupied(square, occupied, None);
            }
        }
    }

    pub fn mark_squares(&mut self, squares: &[GridSquare], occupied: bool, occupant: Option<Entity>) {
        for &square in squares {
            self.set_occupied(square, occupied, occupant);
        }
    }

    fn set_occupied(&mut self, square: GridSquare, occupied: bool, occupant: Option<Entity>) {
        if let Some(cell) = self.square_mut(square) {
            cell.occupied = occupied;
            cell.occupant = if occupied { occupant } else { None };
        }
    }

    /// Occupy the cells under `bounds` on behalf of `occupant` and report
    /// which cells were marked.
    pub fn occupy_area(&mut self, bounds: &BoundingBox, occupant: Entity) -> Vec<GridSquare> {
        let Some(range) = self.squares_under(bounds) else {
            return Vec::new();
        };
        let squares: Vec<GridSquare> = range_squares(range).collect();
        self.mark_squares(&squares, true, Some(occupant));
        squares
    }

    /// Free the given cells, but only those still held by `occupant`.
    /// Returns the cells actually freed.
    pub fn release_squares(&mut self, squares: &[GridSquare], occupant: Entity) -> Vec<GridSquare> {
        let mut freed = Vec::new();
        for &square in squares {
            if self.occupant_of(square) == Some(occupant) {
                self.set_occupied(square, false, None);
                freed.push(square);
            }
        }
        freed
    }

    /// Free every cell under `bounds` still held by `occupant`. Returns the
    /// cells actually freed.
    pub fn release_area(&mut self, bounds: &BoundingBox, occupant: Entity) -> Vec<GridSquare> {
        let Some(range) = self.squares_under(bounds) else {
            return Vec::new();
        };
        let squares: Vec<GridSquare> = range_squares(range).collect();
        self.release_squares(&squares, occupant)
    }

    /// Re-occupy any of `freed` that an active blocker in `index` still
    /// covers. Cells only record one occupant, so releasing one blocker can
    /// uncover another lying underneath it.
    pub fn restamp_freed(&mut self, freed: &[GridSquare], index: &CollisionIndex) -> usize {
        if freed.is_empty() {
            return 0;
        }

        let mut restamped = 0;
        for volume in index.blocking_volumes() {
            let Some(range) = self.squares_under(&volume.world_box) else {
                continue;
            };
            for &square in freed {
                if range.contains(square) && !self.is_occupied(square) {
                    self.set_occupied(square, true, Some(volume.entity));
                    restamped += 1;
                }
            }
        }
        restamped
    }

    /// Free every cell held by `occupant` anywhere on the grid. Returns the
    /// number of cells freed.
    pub fn release_occupant(&mut self, occupant: Entity) -> usize {
        let mut released = 0;
        for cell in self.squares.iter_mut().filter(|c| c.occupant == Some(occupant)) {
            cell.occupied = false;
            cell.occupant = None;
            released += 1;
        }
        released
    }

    pub fn is_occupied(&self, square: GridSquare) -> bool {
        self.square(square).is_some_and(|s| s.occupied)
    }

    pub fn occupant_of(&self, square: GridSquare) -> Option<Entity> {
        self.square(square).and_then(|s| s.occupant)
    }

    pub fn is_point_occupied(&self, position: Vec3) -> bool {
        self.world_to_grid(position).is_some_and(|sq| self.is_occupied(sq))
    }

    pub fn point_occupant(&self, position: Vec3) -> Option<Entity> {
        self.world_to_grid(position).and_then(|sq| self.occupant_of(sq))
    }

    /// Whether a mover may stand on `square`: on the grid, not steep, and
    /// either free or held by `mover` itself.
    pub fn is_walkable_for(&self, square: GridSquare, mover: Option<Entity>) -> bool {
        let Some(cell) = self.square(square) else {
            return false;
        };
        !cell.steep && (!cell.occupied || (mover.is_some() && cell.occupant == mover))
    }

    /// Whether a box of `footprint`'s size centred on `center` fits: every
    /// covered cell is on the grid, not steep, and free or held by `ignore`.
    pub fn is_area_unoccupied(&self, center: GridSquare, footprint: &BoundingBox, ignore: Option<Entity>) -> bool {
        let Some(bounds) = self.footprint_at(center, footprint) else {
            return false;
        };
        let (min_row, min_col, max_row, max_col) = self.footprint_span(&bounds);
        let last = self.slices as isize - 1;
        if min_row < 0 || min_col < 0 || max_row > last || max_col > last {
            return false;
        }

        let range = PathfindRange::new(
            GridSquare::new(min_row as usize, min_col as usize),
            GridSquare::new(max_row as usize, max_col as usize),
        );
        range_squares(range).all(|square| self.is_walkable_for(square, ignore))
    }

    /// First occupant (row-major) of the cells a `footprint` centred on
    /// `center` would cover.
    pub fn area_occupant(&self, center: GridSquare, footprint: &BoundingBox) -> Option<Entity> {
        let bounds = self.footprint_at(center, footprint)?;
        let range = self.squares_under(&bounds)?;
        range_squares(range).find_map(|square| self.occupant_of(square))
    }

    /// Whether every occupied cell under the footprint belongs to `entity`.
    /// Free cells do not count against it.
    pub fn is_area_occupied_only_by(&self, entity: Entity, center: GridSquare, footprint: &BoundingBox) -> bool {
        let Some(range) = self
            .footprint_at(center, footprint)
            .and_then(|bounds| self.squares_under(&bounds))
        else {
            return false;
        };
        range_squares(range)
            .filter_map(|square| self.square(square))
            .filter(|cell| cell.occupied)
            .all(|cell| cell.occupant == Some(entity))
    }

    /// Whether `mover` could step onto `point` within `range`.
    pub fn is_valid_move(&self, point: Vec3, mover: Option<Entity>, range: Option<&PathfindRange>) -> bool {
        self.world_to_grid_in_range(point, range)
            .is_some_and(|square| self.is_walkable_for(square, mover))
    }
}
