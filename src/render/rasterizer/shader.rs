//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer handles coverage, depth and barycentric weights; the shader
//! turns those weights into a final color.

use super::barycentric::interpolate;
use crate::colors;
use crate::light::DirectionalLight;
use crate::mesh::Triangle;
use crate::texture::Texture;

/// Trait for per-pixel shading computations.
///
/// `lambda` holds the barycentric weights `[wa, wb, wc]` of the pixel,
/// paired with triangle corners A, B and C.
pub trait PixelShader {
    fn shade(&self, lambda: [f32; 3]) -> u32;
}

/// Flat shader - returns a constant color for all pixels.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3]) -> u32 {
        self.color
    }
}

/// Nearest-texel texture lookup modulated by interpolated Lambert intensity.
///
/// Intensity is the barycentric blend of `light · normal` at each corner.
/// Anything at or below zero renders black; there is no ambient term.
pub struct TexturedShader<'a> {
    texture: &'a Texture,
    us: [f32; 3],
    vs: [f32; 3],
    intensities: [f32; 3],
}

impl<'a> TexturedShader<'a> {
    pub fn new(
        texture: &'a Texture,
        uvs: &Triangle,
        normals: &Triangle,
        light: &DirectionalLight,
    ) -> Self {
        Self {
            texture,
            us: [uvs.a.x, uvs.b.x, uvs.c.x],
            vs: [uvs.a.y, uvs.b.y, uvs.c.y],
            intensities: [
                light.lambert(normals.a),
                light.lambert(normals.b),
                light.lambert(normals.c),
            ],
        }
    }
}

impl PixelShader for TexturedShader<'_> {
    #[inline]
    fn shade(&self, lambda: [f32; 3]) -> u32 {
        let intensity = interpolate(lambda, self.intensities).max(0.0);
        let u = interpolate(lambda, self.us);
        let v = interpolate(lambda, self.vs);
        colors::modulate(self.texture.sample(u, v), intensity)
    }
}
