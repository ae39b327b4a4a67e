use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::layers::CollisionLayer;

/// Axis-aligned box given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }

    /// Closed-interval overlap on all three axes. Touching faces overlap.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// World box enclosing this box after `transform`.
    ///
    /// All eight corners are transformed, so rotated and scaled owners still
    /// get a box that fully encloses them.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = transform.transform_point(corner);
            min = min.min(world);
            max = max.max(world);
        }
        Self { min, max }
    }
}

/// Registered collision volume for one entity.
///
/// `world_box` always equals `local_box` transformed by the owner's latest
/// transform; it is recomputed eagerly in [`CollisionIndex::update_world_box`].
///
/// [`CollisionIndex::update_world_box`]: super::CollisionIndex::update_world_box
#[derive(Clone, Debug)]
pub struct BoundingVolume {
    pub entity: Entity,
    pub local_box: BoundingBox,
    pub world_box: BoundingBox,
    pub layer: CollisionLayer,
    /// Marks grid cells under the world box as occupied.
    pub blocks_navigation: bool,
    /// Inactive volumes are skipped by every query.
    pub active: bool,
}

/// Attach to an entity to register it with the [`CollisionIndex`].
///
/// The world box follows the entity's `Transform`. With `blocks_navigation`
/// set, the cells under the world box are kept occupied in the navigation
/// grid.
///
/// [`CollisionIndex`]: super::CollisionIndex
#[derive(Component, Debug, Clone, Copy)]
pub struct Collideable {
    pub local_box: BoundingBox,
    pub layer: CollisionLayer,
    pub blocks_navigation: bool,
}

impl Collideable {
    pub fn new(local_box: BoundingBox, layer: CollisionLayer) -> Self {
        Self { local_box, layer, blocks_navigation: false }
    }

    pub fn blocking(local_box: BoundingBox, layer: CollisionLayer) -> Self {
        Self { local_box, layer, blocks_navigation: true }
    }
}
