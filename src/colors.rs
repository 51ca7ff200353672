//! Packed ARGB8888 color helpers.
//!
//! Colors travel through the pipeline as `u32` in `0xAARRGGBB` layout, the
//! same layout the frame buffer stores.

/// Cleared frame buffer pixel: fully transparent black.
pub const TRANSPARENT: u32 = 0x0000_0000;
pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;

#[inline]
pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn to_rgba(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Scale the RGB channels by `intensity`, keeping alpha.
///
/// Intensity is clamped to `[0, 1]` so channels stay in 8-bit range.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let intensity = intensity.clamp(0.0, 1.0);
    let [r, g, b, a] = to_rgba(color);
    let scale = |c: u8| (c as f32 * intensity) as u8;
    from_rgba(scale(r), scale(g), scale(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_round_trip() {
        let c = from_rgba(10, 20, 30, 40);
        assert_eq!(c, 0x280A_141E);
        assert_eq!(to_rgba(c), [10, 20, 30, 40]);
    }

    #[test]
    fn modulate_scales_rgb_only() {
        let c = modulate(from_rgba(200, 100, 50, 255), 0.5);
        assert_eq!(to_rgba(c), [100, 50, 25, 255]);
    }

    #[test]
    fn modulate_clamps_intensity() {
        let c = from_rgba(200, 100, 50, 255);
        assert_eq!(modulate(c, 3.0), c);
        assert_eq!(modulate(c, -1.0), from_rgba(0, 0, 0, 255));
    }
}
