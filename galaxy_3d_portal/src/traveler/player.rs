/// Player-controlled body.
///
/// The player stays upright: only yaw survives a teleport, and the yaw is
/// advanced by the shortest signed angle so the look controller's
/// accumulated value never jumps by a full turn.

use std::f32::consts::{PI, TAU};
use glam::{EulerRot, Quat, Vec3};
use crate::math::Transform;
use super::traveler::{Traveler, TravelerBody, remap_direction};

pub struct PlayerTraveler {
    body: TravelerBody,
    velocity: Vec3,
    yaw: f32,
}

impl PlayerTraveler {
    pub fn new(body: TravelerBody) -> Self {
        let yaw = yaw_of(body.transform().rotation);
        let mut player = Self { body, velocity: Vec3::ZERO, yaw };
        player.apply_yaw();
        player
    }

    /// Accumulated yaw in radians (not wrapped).
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Look controller input.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.apply_yaw();
    }

    fn apply_yaw(&mut self) {
        let mut transform = *self.body.transform();
        transform.rotation = Quat::from_rotation_y(self.yaw);
        self.body.set_transform(transform);
    }
}

impl Traveler for PlayerTraveler {
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
        self.yaw += delta_angle(self.yaw, yaw_of(rotation));
        self.body.teleport_to(position, Quat::from_rotation_y(self.yaw));
        self.velocity = remap_direction(from, to, self.velocity);
    }
}

fn yaw_of(rotation: Quat) -> f32 {
    let (yaw, _pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    yaw
}

/// Shortest signed angle from `current` to `target`, in [-PI, PI).
fn delta_angle(current: f32, target: f32) -> f32 {
    (target - current + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
