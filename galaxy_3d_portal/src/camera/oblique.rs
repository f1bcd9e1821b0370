/// Oblique near-plane projection.
///
/// A portal render camera sits behind the partner portal's surface. Anything
/// between it and that surface must be clipped, so the near plane of its
/// projection is tilted onto the surface plane (Lengyel, "Oblique View
/// Frustum Depth Projection and Clipping", adapted to [0, 1] depth).
///
/// The tilt costs depth precision. Depth-based screen-space effects may
/// show artifacts through portals.

use glam::{Mat4, Vec3, Vec4};

/// Camera-space plane for a world-space surface.
///
/// The normal is flipped to point away from the camera, leaving the camera
/// on the negative side of the plane, which is what `oblique_projection`
/// expects. A positive `offset` moves the plane toward the camera.
pub fn portal_clip_plane(
    view: &Mat4,
    plane_point: Vec3,
    plane_normal: Vec3,
    camera_position: Vec3,
    offset: f32,
) -> Vec4 {
    let side = if plane_normal.dot(plane_point - camera_position) < 0.0 { -1.0 } else { 1.0 };

    let point = view.transform_point3(plane_point);
    let normal = view.transform_vector3(plane_normal).normalize() * side;
    let distance = -point.dot(normal) + offset;

    normal.extend(distance)
}

/// Replace the near plane of `base` with `clip_plane` (camera space).
///
/// Row 2 of the projection becomes `C / dot(C, q)`, where `q` is the
/// camera-space far corner opposite the plane. The far plane is skewed as a
/// side effect but still encloses the original frustum.
pub fn oblique_projection(base: &Mat4, clip_plane: Vec4) -> Mat4 {
    let corner = Vec4::new(clip_plane.x.signum(), clip_plane.y.signum(), 1.0, 1.0);
    let q = base.inverse() * corner;

    let denom = clip_plane.dot(q);
    if denom.abs() <= f32::EPSILON {
        return *base;
    }
    let c = clip_plane / denom;

    let mut projection = *base;
    projection.x_axis.z = c.x;
    projection.y_axis.z = c.y;
    projection.z_axis.z = c.z;
    projection.w_axis.z = c.w;
    projection
}

#[cfg(test)]
#[path = "oblique_tests.rs"]
mod tests;
