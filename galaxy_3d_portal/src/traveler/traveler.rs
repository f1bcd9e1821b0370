/// Traveler contract and the state every traveler shares.

use glam::{Quat, Vec3};
use slotmap::new_key_type;
use crate::error::{Error, Result};
use crate::math::Transform;
use crate::renderer::{MaterialId, MaterialParam, MaterialSink, PARAM_SLICE_CENTER, PARAM_SLICE_NORMAL};

new_key_type! {
    /// Stable key for a traveler registered with a `PortalManager`.
    pub struct TravelerKey;
}

/// Visual duplicate of a traveler, drawn on the far side of a portal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsClone {
    pub transform: Transform,
    pub visible: bool,
}

impl GraphicsClone {
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
    }
}

/// Shared traveler state.
///
/// `original_materials[i]` and `clone_materials[i]` are the same surface on
/// the body and on its clone; the lists always have equal length.
#[derive(Debug, Clone)]
pub struct TravelerBody {
    name: String,
    transform: Transform,
    previous_offset_from_portal: Vec3,
    graphics_clone: GraphicsClone,
    original_materials: Vec<MaterialId>,
    clone_materials: Vec<MaterialId>,
    transform_dirty: bool,
}

impl TravelerBody {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            previous_offset_from_portal: Vec3::ZERO,
            graphics_clone: GraphicsClone { transform, visible: false },
            original_materials: Vec::new(),
            clone_materials: Vec::new(),
            transform_dirty: false,
        }
    }

    /// Attach the parallel slice material lists.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the lists differ in length.
    pub fn with_slice_materials(
        mut self,
        original: Vec<MaterialId>,
        clone: Vec<MaterialId>,
    ) -> Result<Self> {
        if original.len() != clone.len() {
            return Err(Error::InvalidConfiguration(format!(
                "traveler '{}': {} original slice materials but {} clone materials",
                self.name,
                original.len(),
                clone.len()
            )));
        }
        self.original_materials = original;
        self.clone_materials = clone;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Move the body (motion system side). Does not mark a resync.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Offset from the tracking portal at the last update.
    /// Meaningless while the traveler is not tracked.
    pub fn previous_offset_from_portal(&self) -> Vec3 {
        self.previous_offset_from_portal
    }

    pub fn set_previous_offset_from_portal(&mut self, offset: Vec3) {
        self.previous_offset_from_portal = offset;
    }

    pub fn graphics_clone(&self) -> &GraphicsClone {
        &self.graphics_clone
    }

    pub fn graphics_clone_mut(&mut self) -> &mut GraphicsClone {
        &mut self.graphics_clone
    }

    pub fn original_materials(&self) -> &[MaterialId] {
        &self.original_materials
    }

    pub fn clone_materials(&self) -> &[MaterialId] {
        &self.clone_materials
    }

    /// Base teleport: new pose, physics must resync cached transforms.
    pub fn teleport_to(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
        self.transform_dirty = true;
    }

    /// True once after each teleport; the physics integration polls this
    /// to resync its cached transform.
    pub fn take_transform_dirty(&mut self) -> bool {
        std::mem::take(&mut self.transform_dirty)
    }

    /// Show the clone (it is posed by the tracking portal on the next update).
    pub fn enter_threshold(&mut self) {
        self.graphics_clone.transform = self.transform;
        self.graphics_clone.visible = true;
    }

    /// Hide the clone and disable slicing on every material.
    pub fn exit_threshold(&mut self, materials: &mut dyn MaterialSink) {
        self.graphics_clone.visible = false;
        for &material in self.original_materials.iter().chain(&self.clone_materials) {
            materials.set_material_param(material, PARAM_SLICE_NORMAL, MaterialParam::Vec3(Vec3::ZERO));
        }
    }

    /// Write slicing planes for the body and for its clone.
    pub fn apply_slice_params(
        &self,
        materials: &mut dyn MaterialSink,
        (center, normal): (Vec3, Vec3),
        (clone_center, clone_normal): (Vec3, Vec3),
    ) {
        for (&original, &clone) in self.original_materials.iter().zip(&self.clone_materials) {
            materials.set_material_param(original, PARAM_SLICE_CENTER, MaterialParam::Vec3(center));
            materials.set_material_param(original, PARAM_SLICE_NORMAL, MaterialParam::Vec3(normal));
            materials.set_material_param(clone, PARAM_SLICE_CENTER, MaterialParam::Vec3(clone_center));
            materials.set_material_param(clone, PARAM_SLICE_NORMAL, MaterialParam::Vec3(clone_normal));
        }
    }
}

/// A body the portal system can relocate.
///
/// Implementors hold a `TravelerBody` and decide how their own motion
/// state follows a teleport.
pub trait Traveler {
    fn body(&self) -> &TravelerBody;

    fn body_mut(&mut self) -> &mut TravelerBody;

    fn transform(&self) -> Transform {
        *self.body().transform()
    }

    /// Linear velocity in world space. Bodies without motion state report zero.
    fn velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn set_velocity(&mut self, _velocity: Vec3) {}

    /// Move to `position`/`rotation` after crossing from `from` to `to`.
    ///
    /// Motion state must be remapped with `remap_direction`, never as points.
    fn teleport(&mut self, from: &Transform, to: &Transform, position: Vec3, rotation: Quat);

    /// Started straddling a portal.
    fn enter_portal_threshold(&mut self) {
        self.body_mut().enter_threshold();
    }

    /// Stopped straddling a portal without crossing it.
    fn exit_portal_threshold(&mut self, materials: &mut dyn MaterialSink) {
        self.body_mut().exit_threshold(materials);
    }
}

/// Re-express a world direction taken relative to `from` as the same
/// direction relative to `to`. Translation never enters.
pub fn remap_direction(from: &Transform, to: &Transform, direction: Vec3) -> Vec3 {
    to.transform_vector(from.inverse_transform_vector(direction))
}

#[cfg(test)]
#[path = "traveler_tests.rs"]
mod tests;
