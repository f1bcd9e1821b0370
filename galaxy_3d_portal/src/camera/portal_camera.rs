/// PortalCamera - a portal's private render viewpoint and its target.
///
/// The camera is repositioned for every recursive pass; the target persists
/// across frames and is rebuilt only when the output extent changes.

use crate::error::{Error, Result};
use crate::renderer::{RenderTarget, RenderTargetDesc, RenderTargetId, Renderer};
use super::camera::{Camera, Extent2D};

pub struct PortalCamera {
    name: String,
    camera: Camera,
    target: Option<RenderTarget>,
}

impl PortalCamera {
    pub fn new(name: impl Into<String>, camera: Camera) -> Self {
        Self {
            name: name.into(),
            camera,
            target: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// Make sure a target of `extent` exists.
    ///
    /// Returns the new id when a target was (re)created, `None` when the
    /// current one already fits. The replacement is created before the old
    /// target is released, so on failure the previous image stays valid.
    pub fn ensure_target<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        extent: Extent2D,
    ) -> Result<Option<RenderTargetId>> {
        if self.target.is_some_and(|target| target.matches(extent)) {
            return Ok(None);
        }

        let desc = RenderTargetDesc {
            name: format!("{}_view", self.name),
            width: extent.width.max(1),
            height: extent.height.max(1),
        };
        let id = renderer.create_render_target(&desc)?;

        if let Some(old) = self.target.replace(RenderTarget::new(id, extent)) {
            renderer.release_render_target(old.id());
        }
        self.camera.set_extent(extent);
        Ok(Some(id))
    }

    /// Draw the current viewpoint into the target.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        let target = self.target.ok_or_else(|| {
            Error::InvalidResource(format!("'{}' has no render target", self.name))
        })?;
        renderer.render(&self.camera, target.id())
    }

    pub fn release<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(target) = self.target.take() {
            renderer.release_render_target(target.id());
        }
    }
}

#[cfg(test)]
#[path = "portal_camera_tests.rs"]
mod tests;
