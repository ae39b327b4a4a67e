use bevy::prelude::*;

use super::types::{GridSquare, PathfindRange};
use crate::game::collision::BoundingBox;
use crate::game::EntityTransforms;

/// One walkable-or-not cell of the navigation grid.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationGridSquare {
    pub grid_pos: GridSquare,
    /// Cell center at terrain height.
    pub world_pos: Vec3,
    pub terrain_height: f32,
    pub normal: Vec3,
    /// Terrain here is too steep to walk on.
    pub steep: bool,
    pub occupied: bool,
    /// Entity holding `occupied`, if any. Cleared whenever the cell frees.
    pub occupant: Option<Entity>,
}

/// Square grid of walkable cells laid over the terrain's XZ plane.
///
/// Cells are stored row-major in a flat `Vec`; row `r`, column `c` covers
/// world X in `[origin.x + c*spacing, origin.x + (c+1)*spacing)` and world Z
/// in `[origin.y + r*spacing, origin.y + (r+1)*spacing)`.
///
/// # Example
///
/// ```rust,ignore
/// let grid = NavigationGrid::new(64, 1.0);
/// if let Some(square) = grid.world_to_grid(unit_pos) {
///     let center = grid.grid_to_world(square);
/// }
/// ```
///
/// A default grid has no cells. Any query that needs cells on such a grid
/// is a usage error and panics.
#[derive(Resource, Default, Clone, Debug)]
pub struct NavigationGrid {
    pub(super) slices: usize,
    pub(super) spacing: f32,
    /// World XZ of the outer corner of cell (0, 0).
    pub(super) origin: Vec2,
    pub(super) squares: Vec<NavigationGridSquare>,
}

impl NavigationGrid {
    /// Grid of `slices` × `slices` cells centred on the world origin.
    pub fn new(slices: usize, spacing: f32) -> Self {
        let half = slices as f32 * spacing * 0.5;
        Self::with_origin(slices, spacing, Vec2::splat(-half))
    }

    pub fn with_origin(slices: usize, spacing: f32, origin: Vec2) -> Self {
        assert!(spacing > 0.0, "[NAV_GRID] Grid spacing must be positive, got {}", spacing);

        let mut squares = Vec::with_capacity(slices * slices);
        for row in 0..slices {
            for col in 0..slices {
                let x = origin.x + (col as f32 + 0.5) * spacing;
                let z = origin.y + (row as f32 + 0.5) * spacing;
                squares.push(NavigationGridSquare {
                    grid_pos: GridSquare::new(row, col),
                    world_pos: Vec3::new(x, 0.0, z),
                    terrain_height: 0.0,
                    normal: Vec3::Y,
                    steep: false,
                    occupied: false,
                    occupant: None,
                });
            }
        }

        Self { slices, spacing, origin, squares }
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn is_initialized(&self) -> bool {
        !self.squares.is_empty()
    }

    pub(crate) fn assert_initialized(&self) {
        assert!(self.is_initialized(), "[NAV_GRID] Navigation grid queried before initialization");
    }

    #[inline]
    pub fn in_bounds(&self, square: GridSquare) -> bool {
        square.row < self.slices && square.col < self.slices
    }

    #[inline]
    pub fn index(&self, square: GridSquare) -> usize {
        square.row * self.slices + square.col
    }

    pub fn square(&self, square: GridSquare) -> Option<&NavigationGridSquare> {
        if !self.in_bounds(square) {
            return None;
        }
        self.squares.get(self.index(square))
    }

    pub fn square_mut(&mut self, square: GridSquare) -> Option<&mut NavigationGridSquare> {
        if !self.in_bounds(square) {
            return None;
        }
        let index = self.index(square);
        self.squares.get_mut(index)
    }

    pub fn squares(&self) -> impl Iterator<Item = &NavigationGridSquare> {
        self.squares.iter()
    }

    /// Cell containing `position` (Y ignored), or `None` off the grid.
    pub fn world_to_grid(&self, position: Vec3) -> Option<GridSquare> {
        let local_x = position.x - self.origin.x;
        let local_z = position.z - self.origin.y;
        if local_x < 0.0 || local_z < 0.0 {
            return None;
        }

        let col = (local_x / self.spacing).floor() as usize;
        let row = (local_z / self.spacing).floor() as usize;
        let square = GridSquare::new(row, col);
        self.in_bounds(square).then_some(square)
    }

    pub fn world_to_grid_in_range(&self, position: Vec3, range: Option<&PathfindRange>) -> Option<GridSquare> {
        self.world_to_grid(position)
            .filter(|&square| self.is_within_range(square, range))
    }

    /// Cell center at terrain height.
    pub fn grid_to_world(&self, square: GridSquare) -> Option<Vec3> {
        self.square(square).map(|s| s.world_pos)
    }

    /// Every cell of the grid as a range.
    pub fn full_range(&self) -> PathfindRange {
        self.assert_initialized();
        let last = self.slices - 1;
        PathfindRange::new(GridSquare::new(0, 0), GridSquare::new(last, last))
    }

    /// Whether `square` is on the grid and inside `range` (the whole grid
    /// when `range` is `None`).
    pub fn is_within_range(&self, square: GridSquare, range: Option<&PathfindRange>) -> bool {
        self.in_bounds(square) && range.map_or(true, |r| r.contains(square))
    }

    pub fn is_point_within_range(&self, position: Vec3, range: Option<&PathfindRange>) -> bool {
        self.world_to_grid_in_range(position, range).is_some()
    }

    /// Square range of `radius` cells around the cell under `center`,
    /// clamped to the grid. `None` when `center` is off the grid.
    pub fn grid_range_around(&self, center: Vec3, radius: usize) -> Option<PathfindRange> {
        let square = self.world_to_grid(center)?;
        let last = self.slices - 1;
        Some(PathfindRange::new(
            GridSquare::new(square.row.saturating_sub(radius), square.col.saturating_sub(radius)),
            GridSquare::new((square.row + radius).min(last), (square.col + radius).min(last)),
        ))
    }

    pub fn grid_range_for_box(&self, bounds: &BoundingBox, radius: usize) -> Option<PathfindRange> {
        self.grid_range_around(bounds.center(), radius)
    }

    /// Range of `radius` cells around `entity`'s current position.
    ///
    /// # Panics
    ///
    /// If `transforms` has no transform for `entity`.
    pub fn get_pathfind_range<T: EntityTransforms + ?Sized>(
        &self,
        entity: Entity,
        radius: usize,
        transforms: &T,
    ) -> Option<PathfindRange> {
        let Some(transform) = transforms.transform_of(entity) else {
            panic!("[NAV_GRID] No transform for {:?} when computing its pathfind range", entity);
        };
        self.grid_range_around(transform.translation, radius)
    }

    /// Inclusive cell span covered by `bounds`' XZ footprint, unclamped.
    ///
    /// A cell is covered when the footprint overlaps its interior, so a box
    /// whose edge lies exactly on a cell boundary does not spill into the
    /// neighbour.
    pub(super) fn footprint_span(&self, bounds: &BoundingBox) -> (isize, isize, isize, isize) {
        let to_cell = |value: f32, origin: f32| (value - origin) / self.spacing;

        let min_col = to_cell(bounds.min.x, self.origin.x).floor() as isize;
        let min_row = to_cell(bounds.min.z, self.origin.y).floor() as isize;
        let max_col = (to_cell(bounds.max.x, self.origin.x).ceil() as isize - 1).max(min_col);
        let max_row = (to_cell(bounds.max.z, self.origin.y).ceil() as isize - 1).max(min_row);

        (min_row, min_col, max_row, max_col)
    }

    /// Cells under `bounds`' footprint, clamped to the grid. `None` when the
    /// footprint misses the grid entirely.
    pub fn squares_under(&self, bounds: &BoundingBox) -> Option<PathfindRange> {
        if !self.is_initialized() {
            return None;
        }
        let (min_row, min_col, max_row, max_col) = self.footprint_span(bounds);
        let last = self.slices as isize - 1;
        if max_row < 0 || max_col < 0 || min_row > last || min_col > last {
            return None;
        }

        Some(PathfindRange::new(
            GridSquare::new(min_row.clamp(0, last) as usize, min_col.clamp(0, last) as usize),
            GridSquare::new(max_row.clamp(0, last) as usize, max_col.clamp(0, last) as usize),
        ))
    }

    /// World box of `footprint`'s size centred on `square`.
    pub(super) fn footprint_at(&self, square: GridSquare, footprint: &BoundingBox) -> Option<BoundingBox> {
        let center = self.grid_to_world(square)?;
        Some(BoundingBox::from_center_half_extents(center, footprint.size() * 0.5))
    }
}

pub(super) fn range_squares(range: PathfindRange) -> impl Iterator<Item = GridSquare> {
    (range.min.row..=range.max.row)
        .flat_map(move |row| (range.min.col..=range.max.col).map(move |col| GridSquare::new(row, col)))
}
