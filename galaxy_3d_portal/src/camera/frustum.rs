/// Frustum - six clipping planes for visibility culling.
///
/// Each plane is a Vec4 (A, B, C, D) with an inward-pointing unit normal.
/// A point P is inside when `dot(plane, (P, 1)) >= 0` for all six planes.

use glam::{Mat4, Vec3, Vec4};
use super::bounds::AABB;
use super::camera::Camera;

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract planes from a view-projection matrix (Gribb & Hartmann).
    ///
    /// Assumes [0, 1] clip depth, so the near plane is row 2 alone.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);

        let mut planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2];
        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Conservative AABB test (positive-vertex method).
    ///
    /// Never reports a visible box as outside; may keep a few boxes near
    /// frustum corners that are not actually visible.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter().all(|plane| {
            let normal = plane.truncate();
            let p_vertex = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            normal.dot(p_vertex) + plane.w >= 0.0
        })
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let p = point.extend(1.0);
        self.planes.iter().all(|plane| plane.dot(p) >= 0.0)
    }
}

/// Whether a world-space bounding box can be seen by `camera`.
pub fn visible_from_camera(world_bounds: &AABB, camera: &Camera) -> bool {
    camera.frustum().intersects_aabb(world_bounds)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
