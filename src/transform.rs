//! Model transform.
//!
//! Provides a [`Transform`] struct with a fluent API for managing position,
//! rotation (Euler angles), and scale.
//!
//! Rotation is not baked into the vertices. Instead the camera frame (eye,
//! forward, up) is turned the opposite way before the view basis is built,
//! which makes the model appear rotated. Position and scale form the model
//! matrix applied during projection.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// A 3D transform with position, rotation (Euler angles), and scale.
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(0.0, 0.5, 0.0)
///     .rotate_y(0.1)
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians, applied X then Y then Z
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with default values (position=0, rotation=0, scale=1).
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Reset the rotation to absolute Euler angles (radians).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Add a delta rotation (Euler angles in radians).
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    // ============ Scale ============

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Set uniform scale (same value for x, y, z).
    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Multiply the current scale by a factor vector.
    pub fn scale_by(&mut self, factor: Vec3) -> &mut Self {
        self.scale.x *= factor.x;
        self.scale.y *= factor.y;
        self.scale.z *= factor.z;
        self
    }

    // ============ Application ============

    /// Model matrix: Translation * Scale (scale applied first).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Turn a camera-frame vector by the inverse of this rotation.
    ///
    /// Viewing the mesh through a frame turned by `R⁻¹` is the same as viewing
    /// the mesh turned by `R`, so the model appears rotated X, then Y, then Z.
    pub fn orient_view(&self, v: Vec3) -> Vec3 {
        v.rotate_z(-self.rotation.z)
            .rotate_y(-self.rotation.y)
            .rotate_x(-self.rotation.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
    }

    #[test]
    fn test_fluent_api() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0)
            .rotate_y(0.5)
            .set_scale_uniform(2.0);

        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_rotation_accumulates_and_resets() {
        let mut t = Transform::new();
        t.rotate_x(0.25).rotate(Vec3::new(0.25, 0.0, 0.0));
        assert_relative_eq!(t.rotation().x, 0.5);
        t.set_rotation(Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
    }

    #[test]
    fn test_to_matrix_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_orient_view_is_inverse_rotation() {
        let mut t = Transform::new();
        t.rotate_y(FRAC_PI_2);
        // A camera on +Z swings round to -X.
        let eye = t.orient_view(Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(eye.x, -5.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-5);
    }
}
