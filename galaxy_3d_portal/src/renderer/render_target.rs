/// Render target - the 2D image a portal renders into.
///
/// Owned by the portal that writes it, sampled by the partner portal's
/// screen material.

use crate::camera::Extent2D;
use super::renderer::RenderTargetId;

/// Creation parameters passed to `Renderer::create_render_target`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    /// Debug name
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// A live render target and the size it was created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    id: RenderTargetId,
    extent: Extent2D,
}

impl RenderTarget {
    pub(crate) fn new(id: RenderTargetId, extent: Extent2D) -> Self {
        Self { id, extent }
    }

    pub fn id(&self) -> RenderTargetId {
        self.id
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub fn matches(&self, extent: Extent2D) -> bool {
        self.extent == extent
    }
}
