//! Barycentric weights for screen-space triangles.
//!
//! Uses edge functions, the signed parallelogram area spanned by an edge and
//! a point:
//!
//! ```text
//! E(a, b, p) = (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
//! area = E(A, B, C)
//! wa = E(B, C, P) / area
//! wb = E(C, A, P) / area
//! wc = E(A, B, P) / area
//! ```
//!
//! Dividing by the signed area makes every weight non-negative inside the
//! triangle for either winding, and no corner is special, so listing the
//! corners in a different order gives the same coverage.
//!
//! Weights are always reported in corner order `[wa, wb, wc]` and every
//! attribute is interpolated with that same pairing.
//!
//! A zero-area triangle is detected once up front instead of producing NaNs
//! per pixel.

use crate::math::Vec3;

/// Per-triangle constants for evaluating barycentric weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    inv_area: f32,
}

/// Signed area of the parallelogram spanned by `a -> b` and `a -> p`.
///
/// Positive when `p` is left of `a -> b` (counter-clockwise), zero on the edge.
#[inline]
fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

impl Barycentric {
    /// Precompute the weights for the XY projection of `(a, b, c)`.
    ///
    /// Returns `None` for degenerate (zero-area or non-finite) triangles.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let area = edge_function(a, b, c);
        if !area.is_finite() || area.abs() < f32::EPSILON {
            return None;
        }

        let inv_area = 1.0 / area;
        if !inv_area.is_finite() {
            return None;
        }

        Some(Self { a, b, c, inv_area })
    }

    /// Weights `[wa, wb, wc]` of the point `(x, y)`.
    #[inline]
    pub fn weights(&self, x: f32, y: f32) -> [f32; 3] {
        let p = Vec3::new(x, y, 0.0);
        [
            edge_function(self.b, self.c, p) * self.inv_area,
            edge_function(self.c, self.a, p) * self.inv_area,
            edge_function(self.a, self.b, p) * self.inv_area,
        ]
    }
}

/// Interpolate a scalar attribute given per-corner values `[a, b, c]`.
#[inline]
pub fn interpolate(weights: [f32; 3], values: [f32; 3]) -> f32 {
    weights[0] * values[0] + weights[1] * values[1] + weights[2] * values[2]
}

/// Whether all weights are non-negative.
#[inline]
pub fn is_inside(weights: [f32; 3]) -> bool {
    weights[0] >= 0.0 && weights[1] >= 0.0 && weights[2] >= 0.0
}
