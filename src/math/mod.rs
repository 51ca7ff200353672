//! Minimal linear algebra used by the pipeline.
//!
//! Everything is `f32` and `Copy`; operations return new values.

pub mod mat4;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec3::Vec3;
pub use vec4::Vec4;
