/// PortalScreen - the surface a portal shows its partner's view on.
///
/// The screen is a child of the portal: its local transform is a scale plus
/// an offset along the portal forward axis. Width and height are fixed at
/// setup; depth and offset change every frame to keep the observer's near
/// plane from cutting through it.

use glam::{Mat4, Vec3};
use crate::camera::AABB;
use crate::math::Transform;
use crate::renderer::{MaterialId, ScreenHandle};
use super::config::{PortalScreenDesc, DEFAULT_SCREEN_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalScreen {
    handle: ScreenHandle,
    material: MaterialId,
    local_bounds: AABB,
    scale: Vec3,
    /// Local translation along the portal forward axis
    offset: f32,
}

impl PortalScreen {
    pub fn new(desc: &PortalScreenDesc) -> Self {
        Self {
            handle: desc.handle,
            material: desc.material,
            local_bounds: desc.local_bounds,
            scale: Vec3::new(desc.width, desc.height, DEFAULT_SCREEN_DEPTH),
            offset: 0.0,
        }
    }

    pub fn handle(&self) -> ScreenHandle {
        self.handle
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn local_bounds(&self) -> &AABB {
        &self.local_bounds
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn depth(&self) -> f32 {
        self.scale.z
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn set_depth(&mut self, depth: f32, offset: f32) {
        self.scale.z = depth;
        self.offset = offset;
    }

    /// Screen-to-world matrix for a screen mounted on `portal`
    pub fn world_matrix(&self, portal: &Transform) -> Mat4 {
        portal.matrix()
            * Mat4::from_translation(Vec3::Z * self.offset)
            * Mat4::from_scale(self.scale)
    }

    pub fn world_bounds(&self, portal: &Transform) -> AABB {
        self.local_bounds.transformed(&self.world_matrix(portal))
    }
}

#[cfg(test)]
#[path = "screen_tests.rs"]
mod tests;
