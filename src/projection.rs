//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for all perspective
//! projection parameters (FOV, aspect ratio, near/far planes). They are fixed
//! at construction; build a new projection to change them.

use crate::math::Mat4;

/// Default near plane distance.
pub const DEFAULT_Z_NEAR: f32 = 0.01;
/// Default far plane distance.
pub const DEFAULT_Z_FAR: f32 = 1000.0;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
}

impl Projection {
    /// Creates a projection with the default near (0.01) and far (1000) planes.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    pub fn new(fov_y: f32, aspect_ratio: f32) -> Self {
        Self::with_planes(fov_y, aspect_ratio, DEFAULT_Z_NEAR, DEFAULT_Z_FAR)
    }

    /// Creates a projection with explicit near/far planes.
    ///
    /// Keep `z_near` well away from zero and the ratio `z_far / z_near`
    /// moderate: depth precision collapses as the ratio grows.
    pub fn with_planes(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio)
    }

    /// Returns the vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Returns the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Returns the near clipping plane distance.
    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    /// Returns the far clipping plane distance.
    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Generates the right-handed perspective projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}
