/// Renderer module - the host renderer as seen by the portal core.
///
/// The core never draws. It asks a `Renderer` for render targets, asks it to
/// draw the scene from a camera into one, and pushes named parameters into
/// materials through a `MaterialSink`.

mod renderer;
mod render_target;
mod scoped_state;
#[cfg(test)]
pub(crate) mod mock_renderer;

pub use renderer::*;
pub use render_target::{RenderTarget, RenderTargetDesc};
pub use scoped_state::{ScopedShadowCasting, ScopedDisplayMask};
