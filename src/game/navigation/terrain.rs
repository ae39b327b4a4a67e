use bevy::prelude::*;

use super::grid::NavigationGrid;
use crate::game::collision::CollisionIndex;

/// Terrain heights in `[0, 1]`, one per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    pub width: usize,
    pub height: usize,
    samples: Vec<f32>,
}

impl HeightMap {
    /// From an 8-bit greyscale image. `None` if `pixels` doesn't match the
    /// dimensions.
    pub fn from_luma8(width: usize, height: usize, pixels: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return None;
        }
        let samples = pixels.iter().map(|&p| p as f32 / 255.0).collect();
        Some(Self { width, height, samples })
    }

    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        assert!(width > 0 && height > 0, "[NAV_GRID] Height map must be at least 1x1, got {}x{}", width, height);
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y).clamp(0.0, 1.0));
            }
        }
        Self { width, height, samples }
    }

    pub fn flat(width: usize, height: usize) -> Self {
        Self::from_fn(width, height, |_, _| 0.0)
    }

    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> f32 {
        self.samples[y.min(self.height - 1) * self.width + x.min(self.width - 1)]
    }
}

/// Unit surface normals, one per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalMap {
    pub width: usize,
    pub height: usize,
    normals: Vec<Vec3>,
}

impl NormalMap {
    /// From a tightly packed 8-bit RGB image, channels mapped from
    /// `[0, 255]` to `[-1, 1]`.
    pub fn from_rgb8(width: usize, height: usize, pixels: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height * 3 {
            return None;
        }
        let decode = |c: u8| c as f32 / 255.0 * 2.0 - 1.0;
        let normals = pixels
            .chunks_exact(3)
            .map(|rgb| {
                Vec3::new(decode(rgb[0]), decode(rgb[1]), decode(rgb[2]))
                    .try_normalize()
                    .unwrap_or(Vec3::Y)
            })
            .collect();
        Some(Self { width, height, normals })
    }

    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Vec3) -> Self {
        assert!(width > 0 && height > 0, "[NAV_GRID] Normal map must be at least 1x1, got {}x{}", width, height);
        let mut normals = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                normals.push(f(x, y).try_normalize().unwrap_or(Vec3::Y));
            }
        }
        Self { width, height, normals }
    }

    pub fn flat(width: usize, height: usize) -> Self {
        Self::from_fn(width, height, |_, _| Vec3::Y)
    }

    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> Vec3 {
        self.normals[y.min(self.height - 1) * self.width + x.min(self.width - 1)]
    }
}

/// Height and normal maps for the current terrain.
///
/// Inserting or replacing this resource rebuilds the grid's terrain data on
/// the next fixed tick.
#[derive(Resource, Clone, Debug)]
pub struct TerrainMaps {
    pub height: HeightMap,
    pub normal: NormalMap,
}

/// Options for [`NavigationGrid::populate`].
#[derive(Clone, Copy, Debug)]
pub struct TerrainSettings {
    /// World height of a full-white height map pixel.
    pub max_height: f32,
    /// Steepest walkable slope, in degrees from horizontal.
    pub max_walkable_slope_degrees: f32,
}

impl NavigationGrid {
    /// Fill per-cell terrain height, normal and steepness from the maps, then
    /// rebuild occupancy from the collision index.
    ///
    /// Each cell samples the map pixel under it (nearest, no filtering), so
    /// maps of any resolution can drive grids of any size. All previous
    /// occupancy is discarded and every active navigation-blocking volume is
    /// stamped back in.
    pub fn populate(
        &mut self,
        heights: &HeightMap,
        normals: &NormalMap,
        settings: TerrainSettings,
        index: &CollisionIndex,
    ) {
        self.assert_initialized();

        let slices = self.slices;
        let max_angle = settings.max_walkable_slope_degrees.to_radians();

        for cell in self.squares.iter_mut() {
            let pos = cell.grid_pos;
            let hx = pos.col * heights.width / slices;
            let hy = pos.row * heights.height / slices;
            let nx = pos.col * normals.width / slices;
            let ny = pos.row * normals.height / slices;

            let height = heights.sample(hx, hy) * settings.max_height;
            let normal = normals.sample(nx, ny);

            cell.terrain_height = height;
            cell.world_pos.y = height;
            cell.normal = normal;
            cell.steep = normal.angle_between(Vec3::Y) > max_angle;
            cell.occupied = false;
            cell.occupant = None;
        }

        let mut blockers = 0;
        for volume in index.blocking_volumes() {
            self.mark_area(&volume.world_box, true, Some(volume.entity));
            blockers += 1;
        }

        let steep = self.squares.iter().filter(|c| c.steep).count();
        info!(
            "[NAV_GRID] Populated {}x{} grid: {} steep cells, {} blocking volumes",
            slices, slices, steep, blockers
        );
    }

    /// Terrain height at the cell under `position`, if on the grid.
    pub fn terrain_height_at(&self, position: Vec3) -> Option<f32> {
        self.world_to_grid(position)
            .and_then(|sq| self.square(sq))
            .map(|cell| cell.terrain_height)
    }
}
