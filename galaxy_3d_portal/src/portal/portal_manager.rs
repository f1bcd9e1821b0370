/// PortalManager - owns every portal and traveler, drives the frame.
///
/// Portals are registered in pairs and kept in registration order; each
/// frame sweep (crossing, pre-render, render, post-render) visits them in
/// that order. The manager is the only place that sees both sides of a pair
/// at once, so hand-offs and partner snapshots go through it.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::renderer::{MaterialSink, Renderer};
use crate::traveler::{Traveler, TravelerKey};
use super::config::PortalDesc;
use super::portal::{Portal, PortalKey, RenderOutcome, TravelerMap};

/// Per-frame render summary
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Portals that drew at least one pass
    pub rendered: usize,
    /// Portals skipped because their partner screen was off-screen
    pub culled: usize,
    /// Total passes over all portals
    pub passes: usize,
    /// Portals whose render step failed; their previous image stays bound
    pub failures: Vec<(PortalKey, Error)>,
}

impl FrameReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
pub struct PortalManager {
    portals: SlotMap<PortalKey, Portal>,
    order: Vec<PortalKey>,
    travelers: TravelerMap,
    /// traveler -> the one portal tracking it
    tracked_by: FxHashMap<TravelerKey, PortalKey>,
    /// Trigger volumes a traveler is inside while another portal tracks it,
    /// in arrival order
    waiting: FxHashMap<TravelerKey, Vec<PortalKey>>,
}

impl PortalManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== PORTALS =====

    /// Create two portals linked to each other.
    ///
    /// Both descriptors are validated before anything is inserted, so a
    /// rejected pair leaves the manager untouched.
    pub fn create_portal_pair(&mut self, a: PortalDesc, b: PortalDesc) -> Result<(PortalKey, PortalKey)> {
        for desc in [&a, &b] {
            if let Err(e) = desc.validate() {
                crate::engine_error!("galaxy3d::PortalManager", "Rejected portal '{}': {}", desc.name, e);
                return Err(e);
            }
        }

        let key_a = self.portals.insert(Portal::new(&a, PortalKey::default()));
        let key_b = self.portals.insert(Portal::new(&b, key_a));
        self.portals[key_a].link(key_b);
        self.order.extend([key_a, key_b]);

        crate::engine_info!("galaxy3d::PortalManager", "Linked portals '{}' <-> '{}'", a.name, b.name);
        Ok((key_a, key_b))
    }

    pub fn portal(&self, key: PortalKey) -> Option<&Portal> {
        self.portals.get(key)
    }

    /// Portal keys in registration order
    pub fn portal_keys(&self) -> &[PortalKey] {
        &self.order
    }

    pub fn portal_count(&self) -> usize {
        self.order.len()
    }

    // ===== TRAVELERS =====

    pub fn add_traveler<T: Traveler + 'static>(&mut self, traveler: T) -> TravelerKey {
        self.travelers.insert(Box::new(traveler))
    }

    /// Unregister a traveler. If a portal was tracking it, it gets the usual
    /// exit notification first.
    pub fn remove_traveler(
        &mut self,
        key: TravelerKey,
        materials: &mut dyn MaterialSink,
    ) -> Option<Box<dyn Traveler>> {
        let mut traveler = self.travelers.remove(key)?;
        self.waiting.remove(&key);
        if let Some(portal_key) = self.tracked_by.remove(&key) {
            if let Some(portal) = self.portals.get_mut(portal_key) {
                portal.on_traveler_exit(key, traveler.as_mut(), materials);
            }
        }
        Some(traveler)
    }

    pub fn traveler(&self, key: TravelerKey) -> Option<&dyn Traveler> {
        self.travelers.get(key).map(|t| t.as_ref())
    }

    pub fn traveler_mut(&mut self, key: TravelerKey) -> Option<&mut (dyn Traveler + 'static)> {
        self.travelers.get_mut(key).map(|t| t.as_mut())
    }

    pub fn traveler_count(&self) -> usize {
        self.travelers.len()
    }

    pub fn tracking_portal(&self, traveler: TravelerKey) -> Option<PortalKey> {
        self.tracked_by.get(&traveler).copied()
    }

    // ===== TRIGGER SIGNALS =====

    /// A traveler entered `portal`'s trigger volume.
    ///
    /// Returns true if the portal started tracking it. A traveler already
    /// tracked by another portal is left there; `portal` is remembered and
    /// takes over once the traveler leaves the other volume.
    pub fn on_trigger_enter(&mut self, portal: PortalKey, traveler: TravelerKey) -> Result<bool> {
        let owner = self.tracked_by.get(&traveler).copied();
        let (target, body) = self.lookup(portal, traveler)?;

        if owner.is_some_and(|owner| owner != portal) {
            crate::engine_debug!(
                "galaxy3d::PortalManager",
                "Deferring enter of {:?} into '{}': already tracked elsewhere",
                traveler, target.name()
            );
            let waiting = self.waiting.entry(traveler).or_default();
            if !waiting.contains(&portal) {
                waiting.push(portal);
            }
            return Ok(false);
        }

        let entered = target.on_traveler_enter(traveler, body);
        if entered {
            self.tracked_by.insert(traveler, portal);
        }
        Ok(entered)
    }

    /// A traveler left `portal`'s trigger volume without crossing.
    ///
    /// If the traveler is still inside another portal's volume, that portal
    /// starts tracking it.
    pub fn on_trigger_exit(
        &mut self,
        portal: PortalKey,
        traveler: TravelerKey,
        materials: &mut dyn MaterialSink,
    ) -> Result<bool> {
        let (target, body) = self.lookup(portal, traveler)?;
        let exited = target.on_traveler_exit(traveler, body, materials);
        self.stop_waiting(traveler, portal);
        if exited {
            self.tracked_by.remove(&traveler);
            self.promote_waiting(traveler);
        }
        Ok(exited)
    }

    fn stop_waiting(&mut self, traveler: TravelerKey, portal: PortalKey) {
        if let Some(waiting) = self.waiting.get_mut(&traveler) {
            waiting.retain(|&k| k != portal);
            if waiting.is_empty() {
                self.waiting.remove(&traveler);
            }
        }
    }

    /// Hand an untracked traveler to the first portal whose volume it is
    /// still inside.
    fn promote_waiting(&mut self, traveler: TravelerKey) {
        let Some(waiting) = self.waiting.get_mut(&traveler) else {
            return;
        };
        let Some(portal_key) = waiting.first().copied() else {
            return;
        };
        waiting.remove(0);
        if waiting.is_empty() {
            self.waiting.remove(&traveler);
        }

        let (Some(portal), Some(body)) = (self.portals.get_mut(portal_key), self.travelers.get_mut(traveler)) else {
            return;
        };
        if portal.on_traveler_enter(traveler, body.as_mut()) {
            self.tracked_by.insert(traveler, portal_key);
            crate::engine_debug!(
                "galaxy3d::PortalManager",
                "'{}' took over {:?}",
                portal.name(), traveler
            );
        }
    }

    fn lookup(&mut self, portal: PortalKey, traveler: TravelerKey) -> Result<(&mut Portal, &mut dyn Traveler)> {
        let target = self
            .portals
            .get_mut(portal)
            .ok_or_else(|| Error::InvalidResource(format!("unknown portal {:?}", portal)))?;
        let body = self
            .travelers
            .get_mut(traveler)
            .ok_or_else(|| Error::InvalidResource(format!("unknown traveler {:?}", traveler)))?;
        Ok((target, body.as_mut()))
    }

    // ===== FRAME =====

    /// Crossing sweep. Run after physics, before rendering.
    ///
    /// Returns the number of teleports performed.
    pub fn update(&mut self) -> usize {
        let mut crossings = 0;

        for i in 0..self.order.len() {
            let key = self.order[i];
            let linked_key = self.portals[key].linked();
            let linked_transform = *self.portals[linked_key].transform();

            let crossed = self.portals[key].handle_travelers(&linked_transform, &mut self.travelers);
            for traveler_key in crossed {
                crossings += 1;
                self.tracked_by.remove(&traveler_key);

                let Some(traveler) = self.travelers.get_mut(traveler_key) else {
                    continue;
                };
                let linked = &mut self.portals[linked_key];
                linked.on_traveler_enter(traveler_key, traveler.as_mut());
                self.tracked_by.insert(traveler_key, linked_key);

                crate::engine_debug!(
                    "galaxy3d::PortalManager",
                    "Handed {:?} over to '{}'",
                    traveler_key, linked.name()
                );
                self.stop_waiting(traveler_key, linked_key);
            }
        }
        crossings
    }

    /// Slice parameters for every tracked traveler, on every portal.
    pub fn pre_render(&self, materials: &mut dyn MaterialSink) {
        for &key in &self.order {
            let portal = &self.portals[key];
            let linked = self.portals[portal.linked()].transform();
            portal.pre_render(linked, &self.travelers, materials);
        }
    }

    /// Render sweep. Failures are logged and collected; the other portals
    /// still render.
    pub fn render_portals<R: Renderer>(&mut self, observer: &Camera, renderer: &mut R) -> FrameReport {
        let mut report = FrameReport::default();

        for i in 0..self.order.len() {
            let key = self.order[i];
            let linked = self.portals[self.portals[key].linked()].surface();
            let portal = &mut self.portals[key];

            match portal.render(&linked, observer, renderer) {
                Ok(RenderOutcome::Culled) => report.culled += 1,
                Ok(RenderOutcome::Rendered { passes }) => {
                    report.rendered += 1;
                    report.passes += passes;
                }
                Err(e) => {
                    crate::engine_error!("galaxy3d::PortalManager", "Render of '{}' failed: {}", portal.name(), e);
                    report.failures.push((key, e));
                }
            }
        }
        report
    }

    pub fn post_render<R: Renderer>(&mut self, observer: &Camera, renderer: &mut R) {
        for i in 0..self.order.len() {
            let key = self.order[i];
            let linked = *self.portals[self.portals[key].linked()].transform();
            self.portals[key].post_render(&linked, &self.travelers, observer, renderer);
        }
    }

    /// The three full sweeps of a frame. Every pre-render hook finishes
    /// before the first render, and every render before the first
    /// post-render hook.
    pub fn render_frame<R: Renderer>(&mut self, observer: &Camera, renderer: &mut R) -> FrameReport {
        self.pre_render(renderer);
        let report = self.render_portals(observer, renderer);
        self.post_render(observer, renderer);
        report
    }

    /// Release every portal's render target.
    pub fn shutdown<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        for &key in &self.order {
            if let Some(portal) = self.portals.get_mut(key) {
                portal.release(renderer);
            }
        }
        crate::engine_info!("galaxy3d::PortalManager", "Released {} portal targets", self.order.len());
    }
}

#[cfg(test)]
#[path = "portal_manager_tests.rs"]
mod tests;
