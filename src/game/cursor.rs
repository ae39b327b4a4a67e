//! Mouse-ray targeting against the collision index.
//!
//! Input code writes the world-space pick ray into [`CursorRay`]; once per
//! fixed tick the ray is cast and [`CursorTarget`] records the nearest hit
//! plus the nearest floor hit beneath it. Consumers poll the resource or drain
//! [`CursorTargetChanged`].

use bevy::diagnostic::FrameCount;
use bevy::prelude::*;

use crate::game::collision::{BoxOnly, CollisionIndex, CollisionLayer, MeshRaycaster, RayHit};
use crate::game::navigation::{NavigationGrid, PathfindRange};
use crate::game::SpatialSet;

/// World-space pick ray under the mouse, or `None` when the cursor is off
/// the viewport.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorRay(pub Option<Ray3d>);

/// Entity under the cursor long enough to count as hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverInfo {
    pub target: Entity,
    pub began_frame: u32,
}

#[derive(Resource, Default, Debug, Clone)]
pub struct CursorTarget {
    /// Nearest hit along the ray.
    pub primary: Option<RayHit>,
    /// Nearest floor hit (simple geometry, complex geometry or stairs).
    pub navigation: Option<RayHit>,
    /// Set while `primary` is on a hoverable layer.
    pub hover: Option<HoverInfo>,
}

impl CursorTarget {
    /// Refresh from a distance-sorted hit list.
    pub fn update_from_hits(&mut self, hits: &[RayHit], frame: u32) {
        self.primary = hits.first().copied();
        self.navigation = hits.iter().find(|hit| hit.layer.is_floor()).copied();

        let hovered = self.primary.filter(|hit| hit.layer.is_hoverable()).map(|hit| hit.entity);
        self.hover = match (hovered, self.hover) {
            (Some(target), Some(current)) if current.target == target => Some(current),
            (Some(target), _) => Some(HoverInfo { target, began_frame: frame }),
            (None, _) => None,
        };
    }

    pub fn primary_entity(&self) -> Option<Entity> {
        self.primary.map(|hit| hit.entity)
    }

    pub fn is_floor_hit(&self) -> bool {
        self.primary.is_some_and(|hit| hit.layer.is_floor())
    }

    /// Frames the current hover target has been under the cursor.
    pub fn hover_frames(&self, now: u32) -> Option<u32> {
        self.hover.map(|hover| now.wrapping_sub(hover.began_frame))
    }

    /// Whether `mover` could be sent to the floor point under the cursor.
    ///
    /// False with no floor under the cursor or when that point is outside
    /// `range`. When the cursor is directly on the floor, the cell must also
    /// be walkable for `mover`; pointing at an entity standing on the floor
    /// only needs the floor point to be in range.
    pub fn is_valid_destination(
        &self,
        grid: &NavigationGrid,
        mover: Option<Entity>,
        range: Option<&PathfindRange>,
    ) -> bool {
        let Some(navigation) = self.navigation else {
            return false;
        };
        if !grid.is_point_within_range(navigation.point, range) {
            return false;
        }
        !self.is_floor_hit() || grid.is_valid_move(navigation.point, mover, range)
    }
}

/// Published when the entity nearest under the cursor changes.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct CursorTargetChanged {
    pub previous: Option<Entity>,
    pub current: Option<Entity>,
    pub layer: Option<CollisionLayer>,
}

pub struct CursorPlugin;

impl Plugin for CursorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorRay>();
        app.init_resource::<CursorTarget>();
        app.add_message::<CursorTargetChanged>();

        app.add_systems(FixedUpdate, update_cursor_target.in_set(SpatialSet::Targeting));
    }
}

fn update_cursor_target(
    ray: Res<CursorRay>,
    index: Res<CollisionIndex>,
    mesh: Option<Res<MeshRaycaster>>,
    mut target: ResMut<CursorTarget>,
    mut changed: MessageWriter<CursorTargetChanged>,
    frame: Res<FrameCount>,
) {
    let previous = target.primary_entity();

    let hits = match ray.0 {
        Some(ray) => match mesh.as_deref() {
            Some(raycaster) => index.query_ray(&ray, raycaster.0.as_ref()),
            None => index.query_ray(&ray, &BoxOnly),
        },
        None => Vec::new(),
    };
    target.update_from_hits(&hits, frame.0);

    let current = target.primary_entity();
    if current != previous {
        let layer = target.primary.map(|hit| hit.layer);
        trace!("[CURSOR] Target {:?} -> {:?} ({:?})", previous, current, layer);
        changed.write(CursorTargetChanged { previous, current, layer });
    }
}
