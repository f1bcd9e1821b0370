//! Math module - immutable transform algebra for portal composition.
//!
//! Everything here is pure value math on glam types, so crossing and
//! rendering logic can be tested without a live scene.

mod transform;

pub use transform::{Transform, portal_transfer, side_of_plane};
