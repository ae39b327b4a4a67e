use bevy::prelude::*;

use super::index::CollisionIndex;
use super::volume::{BoundingBox, Collideable};

/// Published when a volume leaves the index, so grid occupancy can follow.
#[derive(Message, Debug, Clone)]
pub struct VolumeRemoved {
    pub entity: Entity,
    pub world_box: BoundingBox,
    pub blocks_navigation: bool,
}

/// Register newly added (or replaced) collideables.
pub fn register_collideables(
    query: Query<(Entity, &Collideable, Option<&Transform>), Changed<Collideable>>,
    mut index: ResMut<CollisionIndex>,
) {
    for (entity, collideable, transform) in query.iter() {
        let transform = transform.copied().unwrap_or_default();
        index.register(
            entity,
            collideable.local_box,
            collideable.layer,
            collideable.blocks_navigation,
            &transform,
        );
        debug!("[COLLISION] Registered {:?} on layer {:?}", entity, collideable.layer);
    }
}

/// Recompute world boxes for every collideable whose transform changed.
pub fn sync_world_boxes(
    query: Query<(Entity, &Transform), (With<Collideable>, Changed<Transform>)>,
    mut index: ResMut<CollisionIndex>,
) {
    for (entity, transform) in query.iter() {
        index.update_world_box(entity, transform);
    }
}

/// Drop volumes whose `Collideable` was removed or whose entity despawned.
pub fn unregister_removed(
    mut removed: RemovedComponents<Collideable>,
    mut index: ResMut<CollisionIndex>,
    mut writer: MessageWriter<VolumeRemoved>,
) {
    for entity in removed.read() {
        if let Some(volume) = index.remove(entity) {
            writer.write(VolumeRemoved {
                entity,
                world_box: volume.world_box,
                blocks_navigation: volume.blocks_navigation,
            });
        }
    }
}
