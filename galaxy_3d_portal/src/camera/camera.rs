/// Camera - a viewpoint with a perspective lens and an output size.
///
/// The observer camera is owned and moved by the caller. Portal render
/// cameras are derived from it each frame; they share its lens but may
/// carry an oblique projection override.

use glam::{Mat4, Vec3};
use crate::math::Transform;
use super::frustum::Frustum;

/// Perspective lens parameters.
///
/// Projection is right-handed with [0, 1] depth (`Mat4::perspective_rh`),
/// so the camera looks down its local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Perspective {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { fov_y, aspect, near, far }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Distance from the eye to a corner of the near clip rectangle.
    pub fn near_plane_corner_distance(&self) -> f32 {
        let half_height = self.near * (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;
        Vec3::new(half_width, half_height, self.near).length()
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Viewpoint: world transform, lens, active projection, output extent.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    perspective: Perspective,
    projection_matrix: Mat4,
    extent: Extent2D,
}

impl Camera {
    pub fn new(transform: Transform, perspective: Perspective, extent: Extent2D) -> Self {
        Self {
            transform,
            perspective,
            projection_matrix: perspective.matrix(),
            extent,
        }
    }

    // ===== GETTERS =====

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn perspective(&self) -> &Perspective {
        &self.perspective
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    /// World-to-camera matrix (inverse of the transform).
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.inverse_matrix()
    }

    /// Active projection: the lens matrix unless overridden.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Frustum planes of the active projection.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection_matrix())
    }

    // ===== SETTERS =====

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Replace the lens. Drops any projection override.
    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.perspective = perspective;
        self.projection_matrix = perspective.matrix();
    }

    /// Override the projection (e.g. oblique near plane).
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    /// Back to the lens projection.
    pub fn reset_projection(&mut self) {
        self.projection_matrix = self.perspective.matrix();
    }

    pub fn set_extent(&mut self, extent: Extent2D) {
        self.extent = extent;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
