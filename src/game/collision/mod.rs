//! Collision index: bounding volumes tagged by layer.
//!
//! This module handles:
//! - **volume**: local/world box pairs and the `Collideable` component
//! - **layers**: the closed layer set and the layer-pair collision matrix
//! - **ray**: ray/box intersection and the mesh-precision collaborator trait
//! - **index**: the `CollisionIndex` resource answering ray and overlap queries
//! - **systems**: keeping the index in step with ECS transforms

use bevy::prelude::*;

use crate::game::SpatialSet;

mod index;
mod layers;
mod ray;
mod systems;
mod volume;


pub use index::CollisionIndex;
pub use layers::{CollisionLayer, CollisionMatrix};
pub use ray::{ray_box_intersection, BoxOnly, MeshHit, MeshRaycast, RayHit};
pub use systems::VolumeRemoved;
pub use volume::{BoundingBox, BoundingVolume, Collideable};

/// Mesh-precision ray test provided by the rendering side.
///
/// When absent, complex-geometry hits are accepted at box precision.
#[derive(Resource)]
pub struct MeshRaycaster(pub Box<dyn MeshRaycast + Send + Sync>);

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionIndex>();
        app.add_message::<VolumeRemoved>();

        app.add_systems(FixedUpdate, (
            systems::unregister_removed,
            systems::register_collideables,
            systems::sync_world_boxes,
        ).chain().in_set(SpatialSet::Collision));
    }
}
