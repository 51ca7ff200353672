//! Bounding-box triangle rasterization.
//!
//! For every pixel in a triangle's bounding box:
//! 1. compute barycentric weights at the pixel centre,
//! 2. skip the pixel unless all weights are non-negative,
//! 3. interpolate 1/w depth and run the depth test,
//! 4. only then ask the shader for a color.
//!
//! There is no top-left fill rule; pixels exactly on a shared edge may be
//! covered by both neighbours and the depth test decides.

mod barycentric;
mod shader;

pub use barycentric::{interpolate, is_inside, Barycentric};
pub use shader::{FlatShader, PixelShader, TexturedShader};

use super::framebuffer::FrameBand;
use crate::light::DirectionalLight;
use crate::mesh::Triangle;
use crate::texture::Texture;

/// A triangle ready for rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTriangle {
    /// Window-space corners: pixel x, pixel y (Y up), 1/w depth.
    pub screen: Triangle,
    /// View-space unit normals.
    pub normals: Triangle,
    /// Texture coordinates, untouched by any transform.
    pub uvs: Triangle,
    bary: Barycentric,
}

impl ScreenTriangle {
    /// Returns `None` when the screen-space triangle has no area.
    pub fn new(screen: Triangle, normals: Triangle, uvs: Triangle) -> Option<Self> {
        let bary = Barycentric::new(screen.a, screen.b, screen.c)?;
        Some(Self {
            screen,
            normals,
            uvs,
            bary,
        })
    }

    /// Inclusive integer bounding box `(min_x, max_x, min_y, max_y)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let [a, b, c] = self.screen.corners();
        (
            a.x.min(b.x).min(c.x).floor() as i32,
            a.x.max(b.x).max(c.x).ceil() as i32,
            a.y.min(b.y).min(c.y).floor() as i32,
            a.y.max(b.y).max(c.y).ceil() as i32,
        )
    }

    #[inline]
    pub fn weights(&self, x: f32, y: f32) -> [f32; 3] {
        self.bary.weights(x, y)
    }

    /// Depth at the given weights.
    #[inline]
    pub fn depth(&self, lambda: [f32; 3]) -> f32 {
        interpolate(lambda, [self.screen.a.z, self.screen.b.z, self.screen.c.z])
    }
}

/// Rasterizer that walks the bounding box and tests barycentric weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct BarycentricRasterizer;

impl BarycentricRasterizer {
    pub fn new() -> Self {
        BarycentricRasterizer
    }

    /// Fill a textured, lit triangle into `band`.
    ///
    /// Returns the number of pixels that passed the depth test.
    pub fn fill_triangle(
        &self,
        triangle: &ScreenTriangle,
        band: &mut FrameBand,
        texture: &Texture,
        light: &DirectionalLight,
    ) -> usize {
        let shader = TexturedShader::new(texture, &triangle.uvs, &triangle.normals, light);
        Self::rasterize_with_shader(triangle, band, &shader)
    }

    /// Rasterize a triangle using the provided pixel shader.
    ///
    /// Only pixels inside `band` are visited.
    pub fn rasterize_with_shader<S: PixelShader>(
        triangle: &ScreenTriangle,
        band: &mut FrameBand,
        shader: &S,
    ) -> usize {
        let Some(rows) = band.window_rows() else {
            return 0;
        };
        let (min_x, max_x, min_y, max_y) = triangle.bounds();

        let min_x = min_x.max(0);
        let max_x = max_x.min(band.width() as i32 - 1);
        let min_y = min_y.max(*rows.start());
        let max_y = max_y.min(*rows.end());

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at pixel center
                let lambda = triangle.weights(x as f32 + 0.5, y as f32 + 0.5);
                if !is_inside(lambda) {
                    continue;
                }

                let depth = triangle.depth(lambda);
                if let Some(index) = band.depth_test(x, y, depth) {
                    band.write_color(index, shader.shade(lambda));
                    written += 1;
                }
            }
        }
        written
    }

    /// Whether the triangle's bounding box reaches into the band's rows.
    pub fn overlaps(triangle: &ScreenTriangle, band: &FrameBand) -> bool {
        let (_, _, min_y, max_y) = triangle.bounds();
        band.window_rows()
            .is_some_and(|rows| max_y >= *rows.start() && min_y <= *rows.end())
    }
}
