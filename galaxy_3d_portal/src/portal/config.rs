/// Portal setup descriptors.
///
/// Plain data handed to `PortalManager::create_portal_pair`, which validates
/// them before any portal exists.

use glam::{Vec2, Vec3};
use crate::camera::AABB;
use crate::error::{Error, Result};
use crate::math::Transform;
use crate::renderer::{MaterialId, ScreenHandle};

/// Thickness given to a screen before the first near-clip adjustment
pub const DEFAULT_SCREEN_DEPTH: f32 = 0.01;

/// Per-portal tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalConfig {
    /// Maximum number of nested views rendered (>= 1)
    pub recursion_limit: u32,
    /// Pulls the oblique clip plane toward the render camera, hiding the seam
    /// at the screen edge
    pub near_clip_offset: f32,
    /// Below this camera-space distance to the portal plane the oblique
    /// projection degenerates; the observer projection is used instead
    pub near_clip_limit: f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 5,
            near_clip_offset: 0.05,
            near_clip_limit: 0.2,
        }
    }
}

impl PortalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.recursion_limit == 0 {
            return Err(Error::InvalidConfiguration(
                "recursion_limit must be at least 1".to_string(),
            ));
        }
        if !self.near_clip_offset.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "near_clip_offset must be finite (got {})",
                self.near_clip_offset
            )));
        }
        if !self.near_clip_limit.is_finite() || self.near_clip_limit < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "near_clip_limit must be finite and >= 0 (got {})",
                self.near_clip_limit
            )));
        }
        Ok(())
    }
}

/// The flat surface a portal displays its partner's view on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalScreenDesc {
    /// Host-side renderable for the screen mesh
    pub handle: ScreenHandle,
    /// Material that samples the partner's render target
    pub material: MaterialId,
    /// Mesh bounds in screen local space, before scaling
    pub local_bounds: AABB,
    pub width: f32,
    pub height: f32,
}

impl PortalScreenDesc {
    /// Unit-cube mesh scaled to `size`
    pub fn new(handle: ScreenHandle, material: MaterialId, size: Vec2) -> Self {
        Self {
            handle,
            material,
            local_bounds: AABB::from_size(Vec3::ONE),
            width: size.x,
            height: size.y,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let sized = |v: f32| v.is_finite() && v > 0.0;
        if !sized(self.width) || !sized(self.height) {
            return Err(Error::InvalidConfiguration(format!(
                "screen size must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Everything needed to place one side of a portal pair
#[derive(Debug, Clone, PartialEq)]
pub struct PortalDesc {
    pub name: String,
    /// World pose of the surface; local +Z is the forward axis
    pub transform: Transform,
    pub screen: PortalScreenDesc,
    pub config: PortalConfig,
}

impl PortalDesc {
    pub(crate) fn validate(&self) -> Result<()> {
        let t = &self.transform;
        if !t.position.is_finite() || !t.rotation.is_finite() || !t.rotation.is_normalized() {
            return Err(Error::InvalidConfiguration(format!(
                "portal '{}' has a degenerate transform",
                self.name
            )));
        }
        self.config.validate()?;
        self.screen.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
