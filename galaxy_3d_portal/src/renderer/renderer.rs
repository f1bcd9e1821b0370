/// Renderer and MaterialSink traits plus the handles they exchange.

use glam::{Mat4, Vec3};
use crate::camera::Camera;
use crate::error::Result;
use super::render_target::RenderTargetDesc;

// ============================================================================
// Handles (issued by the host renderer)
// ============================================================================

/// Render target owned by a portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

/// Material instance (screen material, traveler slice materials)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// Renderable object of a portal screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenHandle(pub u64);

// ============================================================================
// Material parameters
// ============================================================================

/// World-space point on the slicing plane (Vec3)
pub const PARAM_SLICE_CENTER: &str = "sliceCenter";
/// Slicing plane normal; zero disables slicing (Vec3)
pub const PARAM_SLICE_NORMAL: &str = "sliceNormal";
/// 0 = draw the screen as a cutout, 1 = draw the portal texture (Int)
pub const PARAM_DISPLAY_MASK: &str = "displayMask";
/// Texture shown on a portal screen (Texture)
pub const PARAM_MAIN_TEXTURE: &str = "mainTexture";

/// Value of a named material parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParam {
    Int(i32),
    Vec3(Vec3),
    Texture(RenderTargetId),
}

/// Opaque key-value sink for material parameters.
pub trait MaterialSink {
    fn set_material_param(&mut self, material: MaterialId, name: &str, value: MaterialParam);
}

// ============================================================================
// Renderer
// ============================================================================

/// How a screen takes part in the main render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowCastingMode {
    /// Drawn normally
    On,
    /// Invisible to cameras, still casts shadows
    ShadowsOnly,
}

/// Host renderer driven by the portal core.
///
/// All calls happen on the frame thread, between physics and present.
pub trait Renderer: MaterialSink {
    /// Allocate a color target of the requested size.
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetId>;

    fn release_render_target(&mut self, target: RenderTargetId);

    /// Draw the scene from `camera` (its view and active projection) into `target`.
    fn render(&mut self, camera: &Camera, target: RenderTargetId) -> Result<()>;

    fn set_shadow_casting(&mut self, screen: ScreenHandle, mode: ShadowCastingMode);

    /// Move a screen's renderable (near-clip protection resizes it every frame).
    fn set_screen_transform(&mut self, screen: ScreenHandle, world: Mat4);
}
