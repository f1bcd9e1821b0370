/// Scoped render-state changes.
///
/// Portal rendering flips shared state on screens (shadow mode, display
/// mask) for the duration of its passes. Each flip is a guard that restores
/// the state on drop, including when a pass returns early with an error.
/// Guards deref to the wrapped renderer so passes run through them.

use std::ops::{Deref, DerefMut};
use super::renderer::{
    MaterialId, MaterialParam, Renderer, ScreenHandle, ShadowCastingMode,
    PARAM_DISPLAY_MASK,
};

/// Hides a screen from cameras (ShadowsOnly) until dropped.
pub struct ScopedShadowCasting<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    screen: ScreenHandle,
}

impl<'a, R: Renderer + ?Sized> ScopedShadowCasting<'a, R> {
    pub fn new(renderer: &'a mut R, screen: ScreenHandle) -> Self {
        renderer.set_shadow_casting(screen, ShadowCastingMode::ShadowsOnly);
        Self { renderer, screen }
    }
}

impl<R: Renderer + ?Sized> Deref for ScopedShadowCasting<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for ScopedShadowCasting<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for ScopedShadowCasting<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_shadow_casting(self.screen, ShadowCastingMode::On);
    }
}

/// Shows a screen material as a cutout (`displayMask = 0`) until activated
/// or dropped. The mask is always 1 once the guard is gone.
pub struct ScopedDisplayMask<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    material: MaterialId,
    active: bool,
}

impl<'a, R: Renderer + ?Sized> ScopedDisplayMask<'a, R> {
    pub fn new(renderer: &'a mut R, material: MaterialId) -> Self {
        renderer.set_material_param(material, PARAM_DISPLAY_MASK, MaterialParam::Int(0));
        Self { renderer, material, active: false }
    }

    /// Switch the material to its texture now. Idempotent.
    pub fn activate(&mut self) {
        if !self.active {
            self.renderer.set_material_param(self.material, PARAM_DISPLAY_MASK, MaterialParam::Int(1));
            self.active = true;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<R: Renderer + ?Sized> Deref for ScopedDisplayMask<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for ScopedDisplayMask<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for ScopedDisplayMask<'_, R> {
    fn drop(&mut self) {
        self.activate();
    }
}

#[cfg(test)]
#[path = "scoped_state_tests.rs"]
mod tests;
