use std::path::Path;

use image::RgbaImage;

use crate::colors;

/// A decoded texture used as a nearest-texel lookup table.
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        Ok(Self::from_rgba_image(&img))
    }

    /// Build a texture from an already decoded RGBA image.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();

        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                colors::from_rgba(r, g, b, a)
            })
            .collect();

        Self {
            data,
            width,
            height,
        }
    }

    /// Build a texture from packed ARGB texels in row-major order, row 0 on top.
    ///
    /// Returns `None` if the dimensions are zero or do not match `data`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// A single-color texture of the given size.
    pub fn solid(width: u32, height: u32, color: u32) -> Option<Self> {
        Self::from_pixels(width, height, vec![color; (width as usize) * (height as usize)])
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - UV coordinates are in [0,1] range; values outside are clamped to the edge
    /// - (0,0) = bottom-left in OBJ convention, but textures are stored top-left origin
    /// - We flip V to correct for this: v_corrected = 1.0 - v
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        // Only a zero-sized decoded image gets here empty.
        if self.data.is_empty() {
            return colors::TRANSPARENT;
        }
        // NaN clamps to NaN, which the float->int cast turns into 0.
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let x = ((u * (self.width - 1) as f32).round() as u32).min(self.width - 1);
        let y = ((v * (self.height - 1) as f32).round() as u32).min(self.height - 1);

        // Sample from flat array: index = y * width + x
        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
}
