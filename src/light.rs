//! Lighting types for the renderer.

use crate::math::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Works in view space: the default light points from the viewer into the
/// scene, so surfaces facing the camera receive full intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Normalized vector pointing toward the light.
    pub toward: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::FORWARD)
    }
}

impl DirectionalLight {
    /// Create a light shining from `toward`. The vector is normalized.
    pub fn new(toward: Vec3) -> Self {
        DirectionalLight {
            toward: toward.normalize_or_zero(),
        }
    }

    /// Signed Lambert term for a normal.
    ///
    /// Left unclamped so per-vertex values can be interpolated across a
    /// triangle; the shader drops non-positive results.
    #[inline]
    pub fn lambert(&self, normal: Vec3) -> f32 {
        self.toward.dot(normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_illumination() {
        let light = DirectionalLight::default();
        assert!((light.lambert(Vec3::new(0.0, 0.0, 1.0)) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_facing_away_is_negative() {
        let light = DirectionalLight::default();
        assert!(light.lambert(Vec3::new(0.0, 0.0, -1.0)) < 0.0);
    }

    #[test]
    fn test_angled_illumination() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 2.0));
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        // cos(45) ≈ 0.707
        assert!((light.lambert(normal) - 0.707).abs() < 0.01);
    }
}
