/// Free rigid body (crates, props).

use glam::{Quat, Vec3};
use crate::math::Transform;
use super::traveler::{Traveler, TravelerBody, remap_direction};

pub struct RigidBodyTraveler {
    body: TravelerBody,
    velocity: Vec3,
    angular_velocity: Vec3,
}

impl RigidBodyTraveler {
    pub fn new(body: TravelerBody) -> Self {
        Self {
            body,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3, angular_velocity: Vec3) -> Self {
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }
}

impl Traveler for RigidBodyTraveler {
    fn body(&self) -> &TravelerBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut TravelerBody {
        &mut self.body
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn teleport(&mut self, from: &Transform, to: &Transform, position: Vec3, rotation: Quat) {
        self.body.teleport_to(position, rotation);
        self.velocity = remap_direction(from, to, self.velocity);
        self.angular_velocity = remap_direction(from, to, self.angular_velocity);
    }
}

#[cfg(test)]
#[path = "rigid_body_tests.rs"]
mod tests;
