//! Camera module - viewpoints, visibility and projection math.
//!
//! `Camera` is the observer (or a portal's render viewpoint). The free
//! functions here are pure: frustum tests, screen-space overlap and the
//! oblique near-plane projection used by portal rendering.

mod bounds;
mod camera;
mod frustum;
mod oblique;
mod portal_camera;

pub use bounds::{AABB, ScreenRect, bounds_overlap};
pub use camera::{Camera, Extent2D, Perspective};
pub use frustum::{
    Frustum, visible_from_camera,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use oblique::{oblique_projection, portal_clip_plane};
pub use portal_camera::PortalCamera;
