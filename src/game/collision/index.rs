use bevy::prelude::*;
use rustc_hash::FxHashMap;

use super::layers::{CollisionLayer, CollisionMatrix};
use super::ray::{ray_box_intersection, MeshRaycast, RayHit};
use super::volume::{BoundingBox, BoundingVolume};

/// Flat store of every registered bounding volume.
///
/// Volumes live in a dense `Vec` in registration order and queries scan it
/// linearly; `slots` maps an entity to its position. Registration order is
/// also the tie-break order for hits at equal distance.
///
/// # Failure semantics
///
/// Asking about an entity that was never registered is a programming error
/// and panics. Queries that simply find nothing return empty results.
#[derive(Resource, Default)]
pub struct CollisionIndex {
    volumes: Vec<BoundingVolume>,
    slots: FxHashMap<Entity, usize>,
    matrix: CollisionMatrix,
    /// Entities whose `active` flag flipped since the last drain.
    activation_changes: Vec<Entity>,
}

impl CollisionIndex {
    pub fn new(matrix: CollisionMatrix) -> Self {
        Self {
            volumes: Vec::new(),
            slots: FxHashMap::default(),
            matrix,
            activation_changes: Vec::new(),
        }
    }

    pub fn matrix(&self) -> &CollisionMatrix {
        &self.matrix
    }

    pub fn set_matrix(&mut self, matrix: CollisionMatrix) {
        self.matrix = matrix;
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    fn slot(&self, entity: Entity) -> usize {
        match self.slots.get(&entity) {
            Some(&slot) => slot,
            None => panic!("[COLLISION] Entity {:?} has no registered bounding volume", entity),
        }
    }

    /// Register (or re-register) `entity` with its world box computed from
    /// `transform`.
    pub fn register(
        &mut self,
        entity: Entity,
        local_box: BoundingBox,
        layer: CollisionLayer,
        blocks_navigation: bool,
        transform: &Transform,
    ) -> BoundingBox {
        let volume = BoundingVolume {
            entity,
            local_box,
            world_box: local_box.transformed(transform),
            layer,
            blocks_navigation,
            active: true,
        };
        let world_box = volume.world_box;

        if let Some(&slot) = self.slots.get(&entity) {
            self.volumes[slot] = volume;
        } else {
            self.slots.insert(entity, self.volumes.len());
            self.volumes.push(volume);
        }
        world_box
    }

    /// Drop `entity`'s volume. Returns it, or `None` if it was never registered.
    pub fn remove(&mut self, entity: Entity) -> Option<BoundingVolume> {
        let slot = self.slots.remove(&entity)?;
        // Order-preserving removal keeps the equal-distance tie-break stable.
        let removed = self.volumes.remove(slot);
        for (i, volume) in self.volumes.iter().enumerate().skip(slot) {
            self.slots.insert(volume.entity, i);
        }
        Some(removed)
    }

    pub fn volume(&self, entity: Entity) -> &BoundingVolume {
        &self.volumes[self.slot(entity)]
    }

    pub fn world_box(&self, entity: Entity) -> BoundingBox {
        self.volume(entity).world_box
    }

    pub fn layer(&self, entity: Entity) -> CollisionLayer {
        self.volume(entity).layer
    }

    /// Recompute `entity`'s world box from its local box and `transform`.
    ///
    /// Must run before any query in the same frame that should see the move.
    pub fn update_world_box(&mut self, entity: Entity, transform: &Transform) -> BoundingBox {
        let slot = self.slot(entity);
        let volume = &mut self.volumes[slot];
        volume.world_box = volume.local_box.transformed(transform);
        volume.world_box
    }

    /// Explicit reclassification of an existing volume.
    pub fn set_layer(&mut self, entity: Entity, layer: CollisionLayer) {
        let slot = self.slot(entity);
        self.volumes[slot].layer = layer;
    }

    /// Enable or disable a volume. Flips are queued so grid occupancy can
    /// follow on the next fixed tick.
    pub fn set_active(&mut self, entity: Entity, active: bool) {
        let slot = self.slot(entity);
        if self.volumes[slot].active != active {
            self.volumes[slot].active = active;
            self.activation_changes.push(entity);
        }
    }

    /// Entities whose volume was enabled or disabled since the last call.
    pub fn take_activation_changes(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.activation_changes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundingVolume> {
        self.volumes.iter()
    }

    pub fn iter_layer(&self, layer: CollisionLayer) -> impl Iterator<Item = &BoundingVolume> {
        self.volumes.iter().filter(move |v| v.active && v.layer == layer)
    }

    /// Active volumes that occupy navigation grid cells.
    pub fn blocking_volumes(&self) -> impl Iterator<Item = &BoundingVolume> {
        self.volumes.iter().filter(|v| v.active && v.blocks_navigation)
    }

    /// All hits along `ray`, nearest first.
    ///
    /// `navigation` and `background` volumes are never hit. Hits on layers
    /// that need mesh precision are re-tested through `mesh`: a confirmed hit
    /// takes the mesh's distance, point and normal, a rejected one is dropped
    /// and the next-closest hit moves up. Equal distances keep registration
    /// order.
    pub fn query_ray<M: MeshRaycast + ?Sized>(&self, ray: &Ray3d, mesh: &M) -> Vec<RayHit> {
        let mut hits = Vec::new();

        for volume in &self.volumes {
            if !volume.active || volume.layer.is_ray_transparent() {
                continue;
            }
            let Some((distance, normal)) = ray_box_intersection(ray, &volume.world_box) else {
                continue;
            };

            let mut hit = RayHit {
                entity: volume.entity,
                layer: volume.layer,
                world_box: volume.world_box,
                distance,
                point: ray.get_point(distance),
                normal,
            };

            if volume.layer.needs_mesh_refinement() {
                match mesh.mesh_hit(&hit, ray) {
                    Some(refined) => {
                        hit.distance = refined.distance;
                        hit.point = refined.point;
                        hit.normal = refined.normal;
                    }
                    None => continue,
                }
            }

            hits.push(hit);
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Entities whose world box overlaps `entity`'s and whose layer the
    /// collision matrix pairs with `entity`'s layer.
    pub fn query_overlaps(&self, entity: Entity) -> Vec<Entity> {
        let target = self.volume(entity);
        if !target.active {
            return Vec::new();
        }

        self.volumes
            .iter()
            .filter(|other| other.entity != entity && other.active)
            .filter(|other| self.matrix.can_collide(target.layer, other.layer))
            .filter(|other| target.world_box.intersects(&other.world_box))
            .map(|other| other.entity)
            .collect()
    }

    /// Whether `entity` overlaps any building.
    ///
    /// Checks the `building` layer only and skips the collision matrix; used
    /// as a cheap placement/exclusion test.
    pub fn query_building_overlap(&self, entity: Entity) -> bool {
        let target = self.volume(entity).world_box;
        self.volumes.iter().any(|other| {
            other.active
                && other.layer == CollisionLayer::Building
                && other.entity != entity
                && target.intersects(&other.world_box)
        })
    }

    /// Building overlap test for a box not (yet) registered, e.g. a
    /// placement preview.
    pub fn box_overlaps_building(&self, bounds: &BoundingBox) -> bool {
        self.iter_layer(CollisionLayer::Building)
            .any(|other| bounds.intersects(&other.world_box))
    }
}
