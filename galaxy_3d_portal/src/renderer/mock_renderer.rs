/// Mock Renderer for unit tests (no GPU required)
///
/// Records every call in order and keeps the latest value of each material
/// parameter, so tests can check both sequencing and end state.

use glam::Mat4;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::math::Transform;
use super::render_target::RenderTargetDesc;
use super::renderer::{
    MaterialId, MaterialParam, MaterialSink, RenderTargetId, Renderer, ScreenHandle,
    ShadowCastingMode, PARAM_DISPLAY_MASK,
};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateTarget { id: RenderTargetId, width: u32, height: u32 },
    ReleaseTarget(RenderTargetId),
    Render { target: RenderTargetId, camera: Transform, projection: Mat4 },
    ShadowCasting { screen: ScreenHandle, mode: ShadowCastingMode },
    ScreenTransform { screen: ScreenHandle, world: Mat4 },
    Param { material: MaterialId, name: String, value: MaterialParam },
}

#[derive(Default)]
pub struct MockRenderer {
    pub calls: Vec<RenderCall>,
    pub live_targets: FxHashSet<RenderTargetId>,
    pub params: FxHashMap<(MaterialId, String), MaterialParam>,
    /// Next create_render_target returns OutOfMemory
    pub fail_allocations: bool,
    /// Next render returns BackendError
    pub fail_renders: bool,
    next_id: u64,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(&self, material: MaterialId, name: &str) -> Option<MaterialParam> {
        self.params.get(&(material, name.to_string())).copied()
    }

    pub fn render_calls(&self) -> Vec<(RenderTargetId, Transform, Mat4)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Render { target, camera, projection } => Some((*target, *camera, *projection)),
                _ => None,
            })
            .collect()
    }

    pub fn render_count(&self) -> usize {
        self.render_calls().len()
    }

    pub fn shadow_modes(&self, screen: ScreenHandle) -> Vec<ShadowCastingMode> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::ShadowCasting { screen: s, mode } if *s == screen => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Every displayMask value written to `material`, in order
    pub fn display_masks(&self, material: MaterialId) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Param { material: m, name, value: MaterialParam::Int(v) }
                    if *m == material && name == PARAM_DISPLAY_MASK => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MaterialSink for MockRenderer {
    fn set_material_param(&mut self, material: MaterialId, name: &str, value: MaterialParam) {
        self.params.insert((material, name.to_string()), value);
        self.calls.push(RenderCall::Param { material, name: name.to_string(), value });
    }
}

impl Renderer for MockRenderer {
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetId> {
        if self.fail_allocations {
            return Err(Error::OutOfMemory);
        }
        self.next_id += 1;
        let id = RenderTargetId(self.next_id);
        self.live_targets.insert(id);
        self.calls.push(RenderCall::CreateTarget { id, width: desc.width, height: desc.height });
        Ok(id)
    }

    fn release_render_target(&mut self, target: RenderTargetId) {
        self.live_targets.remove(&target);
        self.calls.push(RenderCall::ReleaseTarget(target));
    }

    fn render(&mut self, camera: &Camera, target: RenderTargetId) -> Result<()> {
        if self.fail_renders {
            return Err(Error::BackendError("mock render failure".to_string()));
        }
        if !self.live_targets.contains(&target) {
            return Err(Error::InvalidResource(format!("render target {:?} not alive", target)));
        }
        self.calls.push(RenderCall::Render {
            target,
            camera: *camera.transform(),
            projection: *camera.projection_matrix(),
        });
        Ok(())
    }

    fn set_shadow_casting(&mut self, screen: ScreenHandle, mode: ShadowCastingMode) {
        self.calls.push(RenderCall::ShadowCasting { screen, mode });
    }

    fn set_screen_transform(&mut self, screen: ScreenHandle, world: Mat4) {
        self.calls.push(RenderCall::ScreenTransform { screen, world });
    }
}
