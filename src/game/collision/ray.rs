use bevy::prelude::*;

use super::layers::CollisionLayer;
use super::volume::BoundingBox;

/// One ray/volume intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub layer: CollisionLayer,
    /// World box of the volume at query time.
    pub world_box: BoundingBox,
    /// Distance along the ray from its origin.
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Surface hit reported by a mesh-precision ray test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Mesh-level ray test supplied by the rendering side.
///
/// Consulted only for layers where the bounding box is a poor stand-in for
/// the surface (complex geometry, stairs), with the box hit as a starting
/// point. Returning `None` discards the box hit.
pub trait MeshRaycast {
    fn mesh_hit(&self, box_hit: &RayHit, ray: &Ray3d) -> Option<MeshHit>;
}

/// Accepts every box hit as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxOnly;

impl MeshRaycast for BoxOnly {
    fn mesh_hit(&self, box_hit: &RayHit, _ray: &Ray3d) -> Option<MeshHit> {
        Some(MeshHit {
            distance: box_hit.distance,
            point: box_hit.point,
            normal: box_hit.normal,
        })
    }
}

/// Slab test of a ray against an axis-aligned box.
///
/// Returns the entry distance and the outward normal of the face entered.
/// A ray starting inside the box hits at distance zero with a normal facing
/// back along the ray.
pub fn ray_box_intersection(ray: &Ray3d, bounds: &BoundingBox) -> Option<(f32, Vec3)> {
    let origin = ray.origin;
    let dir: Vec3 = *ray.direction;

    if bounds.contains_point(origin) {
        return Some((0.0, -dir));
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
        // Entering through the min face when travelling in +axis.
        let mut face = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            face = 1.0;
        }

        if t0 > t_enter {
            t_enter = t0;
            enter_normal = Vec3::ZERO;
            enter_normal[axis] = face;
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 || t_enter < 0.0 {
        return None;
    }

    Some((t_enter, enter_normal))
}
