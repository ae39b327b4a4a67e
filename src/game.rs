use bevy::prelude::*;

pub mod math;
pub mod config;
pub mod collision;
pub mod navigation;
pub mod pathfinding;
pub mod cursor;

use collision::CollisionPlugin;
use config::SpatialConfigPlugin;
use cursor::CursorPlugin;
use navigation::NavigationPlugin;
use pathfinding::PathfindingPlugin;

/// Per-frame ordering of the spatial systems.
///
/// Collision volumes are synced first so every later query sees this frame's
/// world boxes. Grid occupancy is written last, after path requests have been
/// answered against the previous frame's layout.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SpatialSet {
    Collision,
    Targeting,
    Pathfinding,
    Occupancy,
}

/// Provides world transforms for entities owned by an external store.
///
/// Implemented for Bevy transform queries and for plain maps, so grid and
/// pathfinding helpers can be exercised without a running `App`.
pub trait EntityTransforms {
    fn transform_of(&self, entity: Entity) -> Option<Transform>;
}

impl EntityTransforms for Query<'_, '_, &Transform> {
    fn transform_of(&self, entity: Entity) -> Option<Transform> {
        self.get(entity).ok().copied()
    }
}

impl EntityTransforms for rustc_hash::FxHashMap<Entity, Transform> {
    fn transform_of(&self, entity: Entity) -> Option<Transform> {
        self.get(&entity).copied()
    }
}

pub struct SpatialPlugin;

impl Plugin for SpatialPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(FixedUpdate, (
            SpatialSet::Collision,
            SpatialSet::Targeting,
            SpatialSet::Pathfinding,
            SpatialSet::Occupancy,
        ).chain());

        app.add_plugins((
            SpatialConfigPlugin,
            CollisionPlugin,
            NavigationPlugin,
            PathfindingPlugin,
            CursorPlugin,
        ));
    }
}
