/// Transform - world-space position, orientation and scale.
///
/// Portals, travelers, clones and cameras all carry one. Composition goes
/// through 4x4 affine matrices; `Transform` is the decomposed, copyable form.

use glam::{Mat4, Quat, Vec3};

/// Position / rotation / scale triple. Forward is local +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Unit-scale transform.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation, scale: Vec3::ONE }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::from_position_rotation(position, Quat::IDENTITY)
    }

    /// Decompose an affine matrix (no shear).
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self { position, rotation: rotation.normalize(), scale }
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-to-local matrix.
    pub fn inverse_matrix(&self) -> Mat4 {
        self.matrix().inverse()
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point3(point)
    }

    /// Local direction to world. Ignores translation, honors scale.
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.matrix().transform_vector3(vector)
    }

    /// World direction to local. Ignores translation, honors scale.
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        self.inverse_matrix().transform_vector3(vector)
    }

    /// `self` expressed after passing from `from` to `to`:
    /// `to · from⁻¹ · self`.
    pub fn relocated(&self, from: &Transform, to: &Transform) -> Transform {
        Transform::from_matrix(&(portal_transfer(from, to) * self.matrix()))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix carrying anything in `from`'s frame to the same pose relative to `to`.
pub fn portal_transfer(from: &Transform, to: &Transform) -> Mat4 {
    to.matrix() * from.inverse_matrix()
}

/// Which half-space of a plane `point` is in: -1, 0 or +1.
///
/// Zero is its own side, so a point landing exactly on the plane
/// counts as a change of side.
pub fn side_of_plane(point: Vec3, plane_point: Vec3, plane_normal: Vec3) -> i32 {
    let d = (point - plane_point).dot(plane_normal);
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
