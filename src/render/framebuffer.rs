//! Color and depth storage for one rendered frame.
//!
//! [`FrameBuffer`] owns the buffers. Rasterization never touches it directly;
//! it goes through [`FrameBand`], a mutable view over a contiguous range of
//! rows. Bands produced by [`FrameBuffer::split_into_bands`] are disjoint, so
//! each worker can own one without any locking.
//!
//! # Coordinates
//!
//! The rasterizer works in window coordinates (origin bottom-left, Y up, as
//! produced by the viewport transform). Storage is row-major with row 0 at the
//! top. [`FrameBand::depth_test`] is the only place that converts between the
//! two: `row = height - 1 - y`.
//!
//! # Depth Buffer
//!
//! The depth buffer stores 1/w values (reciprocal of clip-space W). Larger
//! values are closer to the camera. Every cell starts at negative infinity and
//! a write only happens when the new value is strictly greater, so on exact
//! ties the first writer keeps the pixel.

use std::ops::RangeInclusive;

use image::{Rgba, RgbaImage};

use crate::colors;

/// Owned color + depth buffers for a `width × height` frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color: Vec<u32>,
    depth: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            color: vec![colors::TRANSPARENT; size],
            depth: vec![f32::NEG_INFINITY; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to `color` and every depth cell to negative infinity.
    pub fn clear(&mut self, color: u32) {
        self.color.fill(color);
        self.depth.fill(f32::NEG_INFINITY);
    }

    /// Packed ARGB pixels, row 0 at the top.
    pub fn pixels(&self) -> &[u32] {
        &self.color
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth
    }

    /// Get the color at storage position (column, row), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, row: u32) -> Option<u32> {
        (x < self.width && row < self.height)
            .then(|| self.color[(row * self.width + x) as usize])
    }

    /// A single band covering the whole frame.
    pub fn as_band(&mut self) -> FrameBand<'_> {
        FrameBand {
            width: self.width,
            full_height: self.height,
            row0: 0,
            rows: self.height,
            color: &mut self.color,
            depth: &mut self.depth,
        }
    }

    /// Split the frame into at most `bands` disjoint horizontal bands of
    /// (nearly) equal height.
    pub fn split_into_bands(&mut self, bands: usize) -> Vec<FrameBand<'_>> {
        let bands = bands.max(1) as u32;
        let width = self.width;
        let height = self.height;
        let rows_per_band = height.div_ceil(bands).max(1);

        let mut out = Vec::with_capacity(bands as usize);
        let mut remaining_color: &mut [u32] = &mut self.color;
        let mut remaining_depth: &mut [f32] = &mut self.depth;
        let mut row0 = 0u32;

        while row0 < height {
            let rows = rows_per_band.min(height - row0);
            let pixels = (rows as usize) * (width as usize);

            let (color_head, color_tail) = remaining_color.split_at_mut(pixels);
            let (depth_head, depth_tail) = remaining_depth.split_at_mut(pixels);

            out.push(FrameBand {
                width,
                full_height: height,
                row0,
                rows,
                color: color_head,
                depth: depth_head,
            });

            remaining_color = color_tail;
            remaining_depth = depth_tail;
            row0 += rows;
        }

        out
    }

    /// Copy the frame into `target` with its top-left corner at the offset.
    ///
    /// Fully transparent pixels are skipped and anything falling outside the
    /// target is clipped.
    pub fn blit_into(&self, target: &mut RgbaImage, x_offset: i64, y_offset: i64) {
        let (target_w, target_h) = (target.width() as i64, target.height() as i64);

        for (row, line) in self.color.chunks_exact(self.width.max(1) as usize).enumerate() {
            let ty = row as i64 + y_offset;
            if !(0..target_h).contains(&ty) {
                continue;
            }
            for (x, &color) in line.iter().enumerate() {
                let tx = x as i64 + x_offset;
                if colors::alpha(color) == 0 || !(0..target_w).contains(&tx) {
                    continue;
                }
                target.put_pixel(tx as u32, ty as u32, Rgba(colors::to_rgba(color)));
            }
        }
    }

    /// Convert the frame into an owned RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (dst, &color) in img.pixels_mut().zip(&self.color) {
            *dst = Rgba(colors::to_rgba(color));
        }
        img
    }
}

/// A mutable view over rows `row0 .. row0 + rows` of a [`FrameBuffer`].
pub struct FrameBand<'a> {
    width: u32,
    full_height: u32,
    row0: u32,
    rows: u32,
    color: &'a mut [u32],
    depth: &'a mut [f32],
}

impl<'a> FrameBand<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the whole frame, not of this band.
    pub fn full_height(&self) -> u32 {
        self.full_height
    }

    /// Window-space Y values (Y up) owned by this band, or `None` if empty.
    pub fn window_rows(&self) -> Option<RangeInclusive<i32>> {
        if self.rows == 0 {
            return None;
        }
        let top = (self.full_height - 1 - self.row0) as i32;
        let bottom = (self.full_height - self.row0 - self.rows) as i32;
        Some(bottom..=top)
    }

    /// Run the depth test for window pixel `(x, y)`.
    ///
    /// On success the depth cell is updated and the index for
    /// [`write_color`](Self::write_color) is returned. Pixels outside this band
    /// or failing the test return `None`.
    #[inline]
    pub fn depth_test(&mut self, x: i32, y: i32, depth: f32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.full_height as i32 {
            return None;
        }
        // The one and only vertical flip: window Y-up to storage row.
        let row = self.full_height - 1 - y as u32;
        if row < self.row0 || row >= self.row0 + self.rows {
            return None;
        }

        let index = ((row - self.row0) * self.width + x as u32) as usize;
        if depth > self.depth[index] {
            self.depth[index] = depth;
            Some(index)
        } else {
            None
        }
    }

    #[inline]
    pub fn write_color(&mut self, index: usize, color: u32) {
        self.color[index] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_cleared() {
        let fb = FrameBuffer::new(4, 3);
        assert!(fb.pixels().iter().all(|&c| c == colors::TRANSPARENT));
        assert!(fb.depths().iter().all(|&d| d == f32::NEG_INFINITY));
    }

    #[test]
    fn depth_test_is_strictly_greater() {
        let mut fb = FrameBuffer::new(2, 2);
        let mut band = fb.as_band();
        let first = band.depth_test(0, 0, 0.5).unwrap();
        band.write_color(first, 1);
        assert!(band.depth_test(0, 0, 0.5).is_none(), "ties keep the first writer");
        assert!(band.depth_test(0, 0, 0.25).is_none());
        let nearer = band.depth_test(0, 0, 0.75).unwrap();
        band.write_color(nearer, 2);
        assert_eq!(fb.depths()[2], 0.75);
    }

    #[test]
    fn window_y_is_flipped_once() {
        let mut fb = FrameBuffer::new(3, 3);
        {
            let mut band = fb.as_band();
            let idx = band.depth_test(1, 0, 1.0).unwrap();
            band.write_color(idx, 7);
        }
        // Window row 0 is the bottom storage row.
        assert_eq!(fb.get_pixel(1, 2), Some(7));
        assert_eq!(fb.get_pixel(1, 0), Some(colors::TRANSPARENT));
    }

    #[test]
    fn bands_are_disjoint_and_cover_frame() {
        let mut fb = FrameBuffer::new(5, 10);
        let bands = fb.split_into_bands(3);
        assert_eq!(bands.len(), 3);
        let mut covered: Vec<i32> = bands
            .iter()
            .flat_map(|b| b.window_rows().unwrap())
            .collect();
        covered.sort_unstable();
        assert_eq!(covered, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn band_rejects_rows_it_does_not_own() {
        let mut fb = FrameBuffer::new(2, 4);
        let mut bands = fb.split_into_bands(2);
        // First band holds storage rows 0..2, i.e. window rows 2..=3.
        assert_eq!(bands[0].window_rows(), Some(2..=3));
        assert!(bands[0].depth_test(0, 0, 1.0).is_none());
        assert!(bands[0].depth_test(0, 3, 1.0).is_some());
        assert!(bands[1].depth_test(0, 0, 1.0).is_some());
    }

    #[test]
    fn more_bands_than_rows() {
        let mut fb = FrameBuffer::new(2, 2);
        assert_eq!(fb.split_into_bands(16).len(), 2);
    }

    #[test]
    fn blit_clips_and_skips_transparent() {
        let mut fb = FrameBuffer::new(2, 2);
        {
            let mut band = fb.as_band();
            // Window (0, 1) is the top-left storage pixel.
            let idx = band.depth_test(0, 1, 1.0).unwrap();
            band.write_color(idx, colors::from_rgba(9, 8, 7, 255));
        }
        let mut target = RgbaImage::from_pixel(3, 3, Rgba([1, 1, 1, 1]));
        fb.blit_into(&mut target, 2, -1);
        // Top-left frame row is clipped off by the negative y offset.
        assert_eq!(*target.get_pixel(2, 0), Rgba([1, 1, 1, 1]));

        fb.blit_into(&mut target, 1, 1);
        assert_eq!(*target.get_pixel(1, 1), Rgba([9, 8, 7, 255]));
        // Transparent pixels leave the target untouched.
        assert_eq!(*target.get_pixel(2, 2), Rgba([1, 1, 1, 1]));
    }
}
