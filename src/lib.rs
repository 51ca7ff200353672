//! A CPU-based software renderer for textured triangle meshes.
//!
//! Everything from the OBJ loader to the z-buffer runs on the CPU: a
//! hand-built camera basis, perspective projection, barycentric
//! rasterization with a depth buffer, nearest-texel texture lookup and
//! Lambert shading. Frames can be split over a fixed pool of workers that own
//! disjoint row bands of the frame.
//!
//! # Quick Start
//!
//! ```ignore
//! use softraster::prelude::*;
//!
//! let mesh = Mesh::load("model.obj")?;
//! let texture = Texture::from_file("texture.png")?;
//! let mut model = Model::new("model", mesh, texture, 800, 600, RenderConfig::default())?;
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Projection::from_degrees(60.0, 4.0 / 3.0));
//! model.draw(&mut target, FrameRequest::new(&camera, true));
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod render;
pub mod texture;
pub mod transform;

// Internal modules - used within the crate only
pub(crate) mod obj;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use engine::{Engine, FrameStats, RenderConfig, RenderError, Schedule, Scene};
pub use mesh::{LoadError, LoadOptions, Mesh};
pub use model::{FrameRequest, Model, ModelError, Renderable};
pub use projection::Projection;
pub use render::FrameBuffer;
pub use texture::Texture;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softraster::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::Camera;
    pub use crate::projection::Projection;

    // Engine
    pub use crate::engine::{Engine, FrameStats, RenderConfig, Schedule, Scene};
    pub use crate::light::DirectionalLight;
    pub use crate::render::FrameBuffer;

    // Assets
    pub use crate::mesh::{LoadOptions, Mesh};
    pub use crate::texture::Texture;

    // Model
    pub use crate::model::{FrameRequest, Model, Renderable};
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{Mat4, Vec3, Vec4};
}
