//! Model space to screen space.
//!
//! Vertices go through a hand-built camera basis rather than a view matrix:
//! the basis is computed once per frame and every vertex is projected onto
//! it with three dot products. The model matrix and the camera's perspective
//! matrix are then applied in one "project to window" step.

use super::rasterizer::ScreenTriangle;
use crate::camera::Camera;
use crate::math::{Mat4, Vec3, Vec4};
use crate::mesh::{Mesh, Triangle};
use crate::transform::Transform;

/// Orthonormal camera frame `{x, y, z}` plus the eye position.
///
/// `z` points from `forward` back toward the eye, `x = up × z` and
/// `y = z × x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBasis {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
    pub eye: Vec3,
}

impl ViewBasis {
    /// Returns `None` when the frame collapses (eye on `forward`, or `up`
    /// parallel to the viewing axis).
    pub fn new(eye: Vec3, forward: Vec3, up: Vec3) -> Option<Self> {
        let z = (eye - forward).normalize_or_zero();
        let x = up.cross(z).normalize_or_zero();
        if z == Vec3::ZERO || x == Vec3::ZERO {
            return None;
        }
        let y = z.cross(x);
        Some(Self { x, y, z, eye })
    }

    /// Basis for `camera` with the model rotation of `transform` applied.
    pub fn from_camera(camera: &Camera, transform: &Transform) -> Option<Self> {
        Self::new(
            transform.orient_view(camera.position()),
            transform.orient_view(camera.forward()),
            transform.orient_view(camera.up()),
        )
    }

    /// Camera-space coordinates of a model-space point.
    #[inline]
    pub fn to_view(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            v.dot(self.x) - self.x.dot(self.eye),
            v.dot(self.y) - self.y.dot(self.eye),
            v.dot(self.z) - self.z.dot(self.eye),
        )
    }

    /// Camera-space direction of a normal, renormalized.
    #[inline]
    pub fn to_view_normal(&self, n: Vec3) -> Vec3 {
        Vec3::new(n.dot(self.x), n.dot(self.y), n.dot(self.z)).normalize_or_zero()
    }
}

/// Pixel rectangle that normalized device coordinates map onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Outcome of preparing one mesh triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prepared {
    Ready(ScreenTriangle),
    /// A corner sits at or behind the eye.
    Culled,
    /// Zero screen area or non-finite coordinates.
    Degenerate,
}

/// Everything needed to take triangles from model space to the screen.
///
/// Built once per frame and shared read-only by every worker.
#[derive(Clone, Copy, Debug)]
pub struct TransformStage {
    basis: ViewBasis,
    clip: Mat4,
    viewport: Viewport,
}

impl TransformStage {
    pub fn new(basis: ViewBasis, camera: &Camera, transform: &Transform, viewport: Viewport) -> Self {
        Self {
            basis,
            clip: camera.perspective() * transform.to_matrix(),
            viewport,
        }
    }

    pub fn basis(&self) -> &ViewBasis {
        &self.basis
    }

    /// Project a camera-space point to window coordinates.
    ///
    /// The result holds pixel x, pixel y (Y up) and 1/w as depth, so larger
    /// depth is nearer. Returns `None` when w is not positive.
    pub fn project(&self, view: Vec3) -> Option<Vec3> {
        let clip = self.clip * Vec4::point(view);
        if !(clip.w > 0.0) {
            return None;
        }
        let ndc = clip.perspective_divide();
        let vp = &self.viewport;
        Some(Vec3::new(
            vp.x + vp.width * (ndc.x + 1.0) * 0.5,
            vp.y + vp.height * (ndc.y + 1.0) * 0.5,
            1.0 / clip.w,
        ))
    }

    /// Run triangle `index` of `mesh` through the stage.
    pub fn prepare(&self, mesh: &Mesh, index: usize) -> Prepared {
        let Some((positions, uvs, normals)) = mesh.triangle(index) else {
            return Prepared::Degenerate;
        };

        let [a, b, c] = positions.map(|p| self.basis.to_view(p)).corners();
        let (Some(a), Some(b), Some(c)) = (self.project(a), self.project(b), self.project(c))
        else {
            return Prepared::Culled;
        };
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Prepared::Degenerate;
        }

        let normals = normals.map(|n| self.basis.to_view_normal(n));
        match ScreenTriangle::new(Triangle::new(a, b, c), normals, uvs) {
            Some(tri) => Prepared::Ready(tri),
            None => Prepared::Degenerate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::with_orientation(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::BACK,
            Vec3::UP,
            Projection::new(FRAC_PI_2, 1.0),
        )
    }

    fn stage(transform: &Transform) -> TransformStage {
        let basis = ViewBasis::from_camera(&camera(), transform).unwrap();
        TransformStage::new(basis, &camera(), transform, Viewport::new(100, 100))
    }

    #[test]
    fn basis_is_orthonormal() {
        let b = ViewBasis::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 0.0), Vec3::UP)
            .unwrap();
        for v in [b.x, b.y, b.z] {
            assert_relative_eq!(v.magnitude(), 1.0, epsilon = 1e-5);
        }
        assert_relative_eq!(b.x.dot(b.y), 0.0, epsilon = 1e-5);
        assert_relative_eq!(b.y.dot(b.z), 0.0, epsilon = 1e-5);
        assert_relative_eq!(b.z.dot(b.x), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn basis_rejects_up_along_view_axis() {
        assert!(ViewBasis::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::UP).is_none());
        assert!(ViewBasis::new(Vec3::ONE, Vec3::ONE, Vec3::UP).is_none());
    }

    #[test]
    fn origin_lands_mid_screen() {
        let s = stage(&Transform::default());
        let view = s.basis().to_view(Vec3::ZERO);
        assert_relative_eq!(view.z, -5.0, epsilon = 1e-5);

        let win = s.project(view).unwrap();
        assert_relative_eq!(win.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(win.y, 50.0, epsilon = 1e-3);
        assert_relative_eq!(win.z, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn nearer_points_get_larger_depth() {
        let s = stage(&Transform::default());
        let near = s.project(s.basis().to_view(Vec3::new(0.0, 0.0, 1.0))).unwrap();
        let far = s.project(s.basis().to_view(Vec3::new(0.0, 0.0, -1.0))).unwrap();
        assert!(near.z > far.z);
    }

    #[test]
    fn points_behind_eye_are_rejected() {
        let s = stage(&Transform::default());
        assert!(s.project(s.basis().to_view(Vec3::new(0.0, 0.0, 6.0))).is_none());
    }

    #[test]
    fn normals_facing_camera_point_along_view_z() {
        let s = stage(&Transform::default());
        let n = s.basis().to_view_normal(Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn prepare_sorts_triangles() {
        let s = stage(&Transform::default());
        let n = Vec3::FORWARD;
        let mesh = Mesh::from_indexed(
            &[
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 9.0),
            ],
            &[Vec3::ZERO],
            &[n],
            &[
                crate::mesh::Face {
                    positions: [0, 1, 2],
                    uvs: [0, 0, 0],
                    normals: [0, 0, 0],
                },
                crate::mesh::Face {
                    positions: [0, 1, 3],
                    uvs: [0, 0, 0],
                    normals: [0, 0, 0],
                },
                crate::mesh::Face {
                    positions: [0, 0, 1],
                    uvs: [0, 0, 0],
                    normals: [0, 0, 0],
                },
            ],
        )
        .unwrap();

        assert!(matches!(s.prepare(&mesh, 0), Prepared::Ready(_)));
        assert_eq!(s.prepare(&mesh, 1), Prepared::Culled);
        assert_eq!(s.prepare(&mesh, 2), Prepared::Degenerate);
        assert_eq!(s.prepare(&mesh, 3), Prepared::Degenerate);
    }

    #[test]
    fn model_rotation_turns_the_view() {
        let mut t = Transform::new();
        t.rotate_y(FRAC_PI_2);
        let s = stage(&t);
        // The mesh's -X side now faces the camera.
        let view = s.basis().to_view(Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(view.z, -4.0, epsilon = 1e-4);
    }
}
