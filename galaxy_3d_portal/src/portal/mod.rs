//! Portal module - linked portal pairs and the frame driver.
//!
//! `PortalManager` is the entry point: it creates mutually linked pairs,
//! receives trigger signals, runs the crossing sweep and the three render
//! sweeps. `Portal` holds the per-surface state machine.

mod config;
mod screen;
mod portal;
mod portal_manager;

pub use config::{PortalConfig, PortalDesc, PortalScreenDesc, DEFAULT_SCREEN_DEPTH};
pub use screen::PortalScreen;
pub use portal::{Portal, PortalKey, PortalSurface, RenderOutcome, TravelerMap};
pub use portal_manager::{FrameReport, PortalManager};
