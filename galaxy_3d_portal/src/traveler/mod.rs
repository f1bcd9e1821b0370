//! Traveler module - bodies that can pass through portals.
//!
//! Every traveler owns a `TravelerBody` (pose, clone, slice materials) and
//! implements `Traveler::teleport` itself, delegating the pose change to the
//! body and remapping whatever motion state it carries.

mod traveler;
mod rigid_body;
mod player;

pub use traveler::{Traveler, TravelerBody, TravelerKey, GraphicsClone, remap_direction};
pub use rigid_body::RigidBodyTraveler;
pub use player::PlayerTraveler;
