//! Pinhole camera.
//!
//! # Coordinate System
//!
//! Right-handed, OpenGL style: X right, Y up, the camera looks down its local
//! -Z axis. Projection maps view-space depth into clip space with
//! `w = -z_view`.
//!
//! # State
//!
//! The camera stores a position plus `forward` and `up` vectors. Only
//! [`Camera::rotate`] and the explicit setters mutate it; matrices are derived
//! fresh on every call so there is no cache to invalidate.

use crate::math::{Mat4, Vec3};
use crate::projection::Projection;

/// A camera with position, orientation vectors and a fixed projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    projection: Projection,
}

impl Camera {
    /// Creates a camera at `position` with forward `+Z` and up `+Y`.
    pub fn new(position: Vec3, projection: Projection) -> Self {
        Self::with_orientation(position, Vec3::FORWARD, Vec3::UP, projection)
    }

    /// Creates a camera with explicit orientation vectors.
    pub fn with_orientation(
        position: Vec3,
        forward: Vec3,
        up: Vec3,
        projection: Projection,
    ) -> Self {
        Self {
            position,
            forward,
            up,
            projection,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Rotates the forward vector about the world Z axis by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.forward = self.forward.rotate_z(angle);
    }

    /// Teleports the camera to a new position without changing orientation.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The raw perspective matrix.
    pub fn perspective(&self) -> Mat4 {
        self.projection.matrix()
    }

    // =========================================================================
    // Matrix Generation
    // =========================================================================

    /// World-to-view matrix looking from `position` along `forward`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// `perspective * look_at(position, position + forward, up)`.
    pub fn view_projection(&self) -> Mat4 {
        self.perspective() * self.view_matrix()
    }
}
