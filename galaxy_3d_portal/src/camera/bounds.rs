/// Bounding volumes and their screen-space footprint.

use glam::{Mat4, Vec2, Vec3};
use super::camera::Camera;

/// Axis-Aligned Bounding Box
///
/// Screens store theirs in local space and transform it by the screen's
/// world matrix at test time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on the origin.
    pub fn from_size(size: Vec3) -> Self {
        let half = size * 0.5;
        Self { min: -half, max: half }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Transform this box by a matrix, returning the enclosing box.
    ///
    /// Arvo's method: project each matrix axis onto the extents instead of
    /// transforming all eight corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut min = translation;
        let mut max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            min += a.min(b);
            max += a.max(b);
        }

        AABB { min, max }
    }

    /// Overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Screen-space footprint of a box seen from a camera.
///
/// `min`/`max` are viewport coordinates in [0, 1] (outside when partially
/// off screen), depths are view-space distances along the view axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl ScreenRect {
    /// Project a world-space box through `camera`.
    ///
    /// Returns `None` when every corner is behind the eye. If only some are,
    /// the projection of the box wraps around, so the rect widens to the whole
    /// viewport and its nearest depth drops to zero.
    pub fn from_bounds(bounds: &AABB, camera: &Camera) -> Option<ScreenRect> {
        let view = camera.view_matrix();
        let projection = *camera.projection_matrix();

        let mut rect = ScreenRect {
            min: Vec2::splat(f32::MAX),
            max: Vec2::splat(f32::MIN),
            min_depth: f32::MAX,
            max_depth: f32::MIN,
        };
        let mut in_front = 0;
        let mut behind = false;

        for corner in bounds.corners() {
            let eye = view.transform_point3(corner);
            let depth = -eye.z;
            if depth <= 0.0 {
                behind = true;
                continue;
            }
            in_front += 1;

            let clip = projection * eye.extend(1.0);
            let viewport = clip.truncate().truncate() / clip.w * 0.5 + Vec2::splat(0.5);
            rect.min = rect.min.min(viewport);
            rect.max = rect.max.max(viewport);
            rect.min_depth = rect.min_depth.min(depth);
            rect.max_depth = rect.max_depth.max(depth);
        }

        if in_front == 0 {
            return None;
        }
        if behind {
            rect.min = Vec2::ZERO;
            rect.max = Vec2::ONE;
            rect.min_depth = 0.0;
        }
        Some(rect)
    }

    pub fn overlaps_xy(&self, other: &ScreenRect) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Whether `far` can be seen through `near` from `camera`.
///
/// True when `far` reaches deeper than the nearest point of `near` and the
/// two footprints overlap on screen. Conservative: it may keep a pair whose
/// true silhouettes do not touch.
pub fn bounds_overlap(near: &AABB, far: &AABB, camera: &Camera) -> bool {
    match (ScreenRect::from_bounds(near, camera), ScreenRect::from_bounds(far, camera)) {
        (Some(near), Some(far)) => far.max_depth > near.min_depth && far.overlaps_xy(&near),
        _ => false,
    }
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
