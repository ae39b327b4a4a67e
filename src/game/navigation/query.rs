use bevy::prelude::*;

use super::grid::NavigationGrid;
use super::types::{Direction, GridSquare, PathfindRange};
use crate::game::collision::BoundingBox;

impl NavigationGrid {
    /// Nearest usable cell to `target`, for when `target` itself is blocked.
    ///
    /// Returns `target` if it is in range, not steep and unoccupied. Otherwise
    /// searches Chebyshev rings of growing radius around `target`; within the
    /// first ring holding any usable cell, the one closest to `from` wins,
    /// ties going to the fixed scan order (compass points E, N, W, S, NE, NW,
    /// SW, SE first, then the rest of the ring row by row). Falls back to
    /// `from` when nothing in range is usable.
    pub fn find_next_best_location(
        &self,
        from: GridSquare,
        target: GridSquare,
        range: Option<&PathfindRange>,
    ) -> GridSquare {
        self.find_next_best_location_for(from, target, range, None, None)
    }

    /// [`find_next_best_location`](Self::find_next_best_location) for a
    /// particular mover: cells held by `mover` count as free, and with a
    /// `footprint` the whole box must fit around the candidate.
    pub fn find_next_best_location_for(
        &self,
        from: GridSquare,
        target: GridSquare,
        range: Option<&PathfindRange>,
        mover: Option<Entity>,
        footprint: Option<&BoundingBox>,
    ) -> GridSquare {
        let full = self.full_range();
        let Some(bounds) = range.map_or(Some(full), |r| r.intersect(&full)) else {
            return from;
        };

        let usable = |square: GridSquare| {
            bounds.contains(square)
                && self.is_walkable_for(square, mover)
                && footprint.map_or(true, |fp| self.is_area_unoccupied(square, fp, mover))
        };

        if usable(target) {
            return target;
        }

        let t_row = target.row as isize;
        let t_col = target.col as isize;
        let max_radius = [
            (bounds.min.row as isize, bounds.min.col as isize),
            (bounds.max.row as isize, bounds.max.col as isize),
        ]
        .iter()
        .map(|&(row, col)| (row - t_row).abs().max((col - t_col).abs()))
        .max()
        .unwrap_or(0);

        let at = |row: isize, col: isize| -> Option<GridSquare> {
            (row >= 0 && col >= 0).then(|| GridSquare::new(row as usize, col as usize))
        };

        for radius in 1..=max_radius {
            let mut best: Option<(usize, GridSquare)> = None;
            let mut consider = |square: GridSquare| {
                if !usable(square) {
                    return;
                }
                let dist = square.distance_squared(from);
                if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                    best = Some((dist, square));
                }
            };

            for dir in Direction::ALL {
                let (dr, dc) = dir.offset();
                if let Some(square) = at(t_row + dr * radius, t_col + dc * radius) {
                    consider(square);
                }
            }

            // Ring perimeter, row by row: full top and bottom rows, only the
            // two end columns in between.
            let side = (2 * radius) as usize;
            for row in (t_row - radius)..=(t_row + radius) {
                let d_row = row - t_row;
                let step = if d_row.abs() == radius { 1 } else { side };
                for col in ((t_col - radius)..=(t_col + radius)).step_by(step) {
                    let d_col = col - t_col;
                    if is_compass_point(d_row, d_col) {
                        continue;
                    }
                    if let Some(square) = at(row, col) {
                        consider(square);
                    }
                }
            }

            if let Some((_, square)) = best {
                return square;
            }
        }

        from
    }

    /// Walk the grid from the center of `start` along `direction` (x along
    /// columns, y along rows) and return the first steep or occupied cell
    /// within `max_distance` cells. The start cell itself is not tested.
    pub fn cast_ray(&self, start: GridSquare, direction: Vec2, max_distance: f32) -> Option<GridSquare> {
        let dir = direction.try_normalize()?;
        if !self.in_bounds(start) {
            return None;
        }

        let origin = [start.col as f32 + 0.5, start.row as f32 + 0.5];
        let dir = [dir.x, dir.y];
        let mut cell = [start.col as isize, start.row as isize];
        let mut step = [0isize; 2];
        let mut t_max = [f32::INFINITY; 2];
        let mut t_delta = [f32::INFINITY; 2];

        for axis in 0..2 {
            if dir[axis].abs() > f32::EPSILON {
                step[axis] = if dir[axis] > 0.0 { 1 } else { -1 };
                t_delta[axis] = (1.0 / dir[axis]).abs();
                let boundary = if dir[axis] > 0.0 { cell[axis] as f32 + 1.0 } else { cell[axis] as f32 };
                t_max[axis] = (boundary - origin[axis]) / dir[axis];
            }
        }

        loop {
            let axis = if t_max[0] < t_max[1] { 0 } else { 1 };
            let t = t_max[axis];
            if t > max_distance {
                return None;
            }
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            if cell[0] < 0 || cell[1] < 0 {
                return None;
            }
            let square = GridSquare::new(cell[1] as usize, cell[0] as usize);
            let blocked = self.square(square).map(|s| s.steep || s.occupied)?;
            if blocked {
                return Some(square);
            }
        }
    }
}

#[inline]
fn is_compass_point(d_row: isize, d_col: isize) -> bool {
    d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs()
}
