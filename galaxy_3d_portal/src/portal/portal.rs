/// Portal - one side of a linked pair.
///
/// A portal tracks the travelers straddling its surface, moves them to its
/// partner when they cross, and renders the partner-side view that the
/// partner's screen displays.
///
/// Portals never hold a reference to their partner. Whatever a step needs
/// from the partner (pose, screen) is passed in by `PortalManager`, and
/// hand-offs are returned to it rather than applied directly.

use glam::Vec3;
use slotmap::{new_key_type, SlotMap};
use crate::camera::{
    bounds_overlap, oblique_projection, portal_clip_plane, visible_from_camera,
    Camera, Extent2D, Perspective, PortalCamera,
};
use crate::error::Result;
use crate::math::{portal_transfer, side_of_plane, Transform};
use crate::renderer::{
    MaterialParam, MaterialSink, Renderer, ScopedDisplayMask, ScopedShadowCasting,
    PARAM_MAIN_TEXTURE,
};
use crate::traveler::{Traveler, TravelerKey};
use super::config::{PortalConfig, PortalDesc};
use super::screen::PortalScreen;

new_key_type! {
    /// Stable key for a portal registered with a `PortalManager`.
    pub struct PortalKey;
}

/// Travelers as stored by the manager
pub type TravelerMap = SlotMap<TravelerKey, Box<dyn Traveler>>;

/// What a portal's partner contributes to its render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalSurface {
    pub transform: Transform,
    pub screen: PortalScreen,
}

/// Result of one `Portal::render` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The partner screen was outside the observer frustum; nothing was drawn
    Culled,
    /// `passes` nested views were drawn into the target
    Rendered { passes: usize },
}

pub struct Portal {
    name: String,
    transform: Transform,
    linked: PortalKey,
    config: PortalConfig,
    screen: PortalScreen,
    tracked: Vec<TravelerKey>,
    portal_camera: PortalCamera,
}

impl Portal {
    pub(crate) fn new(desc: &PortalDesc, linked: PortalKey) -> Self {
        let camera = Camera::new(desc.transform, Perspective::default(), Extent2D::new(1, 1));
        Self {
            name: desc.name.clone(),
            transform: desc.transform,
            linked,
            config: desc.config,
            screen: PortalScreen::new(&desc.screen),
            tracked: Vec::new(),
            portal_camera: PortalCamera::new(desc.name.as_str(), camera),
        }
    }

    pub(crate) fn link(&mut self, linked: PortalKey) {
        self.linked = linked;
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn linked(&self) -> PortalKey {
        self.linked
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn screen(&self) -> &PortalScreen {
        &self.screen
    }

    /// Tracked travelers, in the order they entered
    pub fn tracked_travelers(&self) -> &[TravelerKey] {
        &self.tracked
    }

    pub fn is_tracking(&self, traveler: TravelerKey) -> bool {
        self.tracked.contains(&traveler)
    }

    pub fn portal_camera(&self) -> &PortalCamera {
        &self.portal_camera
    }

    pub fn surface(&self) -> PortalSurface {
        PortalSurface {
            transform: self.transform,
            screen: self.screen,
        }
    }

    // ===== TRAVELERS =====

    /// Start tracking `traveler`. Returns false if it already was.
    pub fn on_traveler_enter(&mut self, key: TravelerKey, traveler: &mut dyn Traveler) -> bool {
        if self.is_tracking(key) {
            return false;
        }
        traveler.enter_portal_threshold();
        let offset = traveler.transform().position - self.transform.position;
        traveler.body_mut().set_previous_offset_from_portal(offset);
        self.tracked.push(key);
        true
    }

    /// Stop tracking `traveler`. Returns false if it was not tracked.
    pub fn on_traveler_exit(
        &mut self,
        key: TravelerKey,
        traveler: &mut dyn Traveler,
        materials: &mut dyn MaterialSink,
    ) -> bool {
        let Some(index) = self.tracked.iter().position(|&k| k == key) else {
            return false;
        };
        traveler.exit_portal_threshold(materials);
        self.tracked.remove(index);
        true
    }

    /// Crossing pass for every tracked traveler.
    ///
    /// A traveler whose side of the surface changed since the last call is
    /// teleported to `linked` and dropped from this portal. The returned keys
    /// must be entered into the partner portal. Everyone else gets their
    /// clone posed on the far side and their offset refreshed.
    pub fn handle_travelers(&mut self, linked: &Transform, travelers: &mut TravelerMap) -> Vec<TravelerKey> {
        let origin = self.transform;
        let forward = origin.forward();
        let mut crossed = Vec::new();

        self.tracked.retain(|&key| {
            let Some(traveler) = travelers.get_mut(key) else {
                return false;
            };
            let traveler = traveler.as_mut();
            let pose = traveler.transform();
            let far_side = pose.relocated(&origin, linked);

            let offset = pose.position - origin.position;
            let previous = traveler.body().previous_offset_from_portal();
            let side = side_of_plane(offset, Vec3::ZERO, forward);
            let side_before = side_of_plane(previous, Vec3::ZERO, forward);

            if side != side_before {
                traveler.teleport(&origin, linked, far_side.position, far_side.rotation);
                traveler
                    .body_mut()
                    .graphics_clone_mut()
                    .set_pose(pose.position, pose.rotation);
                crossed.push(key);
                return false;
            }

            let body = traveler.body_mut();
            body.graphics_clone_mut().set_pose(far_side.position, far_side.rotation);
            body.set_previous_offset_from_portal(offset);
            true
        });

        for &key in &crossed {
            crate::engine_debug!("galaxy3d::Portal", "'{}': traveler {:?} crossed", self.name, key);
        }
        crossed
    }

    /// Slicing planes for one traveler: the body is cut at this surface,
    /// its clone at the partner's.
    pub fn update_slice_params(
        &self,
        linked: &Transform,
        traveler: &dyn Traveler,
        materials: &mut dyn MaterialSink,
    ) {
        let forward = self.transform.forward();
        let side = side_of_plane(traveler.transform().position, self.transform.position, forward) as f32;

        traveler.body().apply_slice_params(
            materials,
            (self.transform.position, forward * -side),
            (linked.position, linked.forward() * side),
        );
    }

    pub fn pre_render(&self, linked: &Transform, travelers: &TravelerMap, materials: &mut dyn MaterialSink) {
        for &key in &self.tracked {
            if let Some(traveler) = travelers.get(key) {
                self.update_slice_params(linked, traveler.as_ref(), materials);
            }
        }
    }

    // ===== RENDERING =====

    /// Render what lies beyond `linked`, as seen by `observer` through this
    /// portal, into this portal's target.
    ///
    /// The target is bound to the partner screen's material whenever it is
    /// (re)created. On error the previous target, if any, stays bound.
    pub fn render<R: Renderer>(
        &mut self,
        linked: &PortalSurface,
        observer: &Camera,
        renderer: &mut R,
    ) -> Result<RenderOutcome> {
        let linked_bounds = linked.screen.world_bounds(&linked.transform);
        if !visible_from_camera(&linked_bounds, observer) {
            crate::engine_trace!("galaxy3d::Portal", "'{}': partner screen culled", self.name);
            return Ok(RenderOutcome::Culled);
        }

        let extent = observer.extent();
        if let Some(id) = self.portal_camera.ensure_target(renderer, extent)? {
            crate::engine_info!(
                "galaxy3d::Portal",
                "'{}': render target {:?} allocated ({}x{})",
                self.name, id, extent.width, extent.height
            );
            renderer.set_material_param(linked.screen.material(), PARAM_MAIN_TEXTURE, MaterialParam::Texture(id));
        }

        let viewpoints = self.viewpoint_chain(linked, observer);
        let origin = self.transform;
        let config = self.config;

        let mut hidden = ScopedShadowCasting::new(renderer, self.screen.handle());
        let mut display = ScopedDisplayMask::new(&mut *hidden, linked.screen.material());

        for viewpoint in viewpoints.iter().rev() {
            let camera = self.portal_camera.camera_mut();
            camera.set_transform(*viewpoint);

            let clip_plane = portal_clip_plane(
                &camera.view_matrix(),
                origin.position,
                origin.forward(),
                viewpoint.position,
                config.near_clip_offset,
            );
            if clip_plane.w.abs() > config.near_clip_limit {
                camera.set_projection(oblique_projection(observer.projection_matrix(), clip_plane));
            } else {
                camera.set_projection(*observer.projection_matrix());
            }

            self.portal_camera.render(&mut *display)?;
            display.activate();
        }

        Ok(RenderOutcome::Rendered { passes: viewpoints.len() })
    }

    /// Render camera poses, innermost first.
    ///
    /// Each step moves the previous pose from the partner's frame into this
    /// portal's frame. Past the first step the chain stops as soon as this
    /// screen no longer overlaps the partner screen from the current pose.
    fn viewpoint_chain(&mut self, linked: &PortalSurface, observer: &Camera) -> Vec<Transform> {
        let step = portal_transfer(&linked.transform, &self.transform);
        let near_bounds = self.screen.world_bounds(&self.transform);
        let far_bounds = linked.screen.world_bounds(&linked.transform);
        let limit = self.config.recursion_limit as usize;

        let camera = self.portal_camera.camera_mut();
        camera.set_perspective(*observer.perspective());
        camera.set_projection(*observer.projection_matrix());
        camera.set_transform(*observer.transform());

        let mut local_to_world = observer.transform().matrix();
        let mut chain = Vec::new();
        for i in 0..limit {
            if i > 0 && !bounds_overlap(&near_bounds, &far_bounds, camera) {
                break;
            }
            local_to_world = step * local_to_world;
            let viewpoint = Transform::from_matrix(&local_to_world);
            camera.set_transform(viewpoint);
            chain.push(viewpoint);
        }
        chain
    }

    /// Slice parameters again (travelers may have been handed over during
    /// the render sweep), then screen thickness.
    pub fn post_render<R: Renderer>(
        &mut self,
        linked: &Transform,
        travelers: &TravelerMap,
        observer: &Camera,
        renderer: &mut R,
    ) {
        self.pre_render(linked, travelers, renderer);
        self.protect_screen_from_clipping(observer, renderer);
    }

    /// Thicken the screen toward the far side so the observer's near plane
    /// never cuts through it. Returns the new depth.
    pub fn protect_screen_from_clipping<R: Renderer + ?Sized>(&mut self, observer: &Camera, renderer: &mut R) -> f32 {
        let depth = observer.perspective().near_plane_corner_distance();
        let forward = self.transform.forward();
        let facing_same_dir = forward.dot(self.transform.position - observer.position()) > 0.0;
        let offset = if facing_same_dir { 0.5 } else { -0.5 } * depth;

        self.screen.set_depth(depth, offset);
        renderer.set_screen_transform(self.screen.handle(), self.screen.world_matrix(&self.transform));
        depth
    }

    pub(crate) fn release<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        self.portal_camera.release(renderer);
    }
}

#[cfg(test)]
#[path = "portal_tests.rs"]
mod tests;
