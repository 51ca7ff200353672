//! Rendering pipeline stages.
//!
//! - [`stage`]: camera basis, projection and triangle setup
//! - [`rasterizer`]: coverage, depth test and shading
//! - [`framebuffer`]: color and depth storage, split into bands for workers

pub mod framebuffer;
pub mod rasterizer;
pub mod stage;

pub use framebuffer::{FrameBand, FrameBuffer};
pub use rasterizer::{
    BarycentricRasterizer, FlatShader, PixelShader, ScreenTriangle, TexturedShader,
};
pub use stage::{Prepared, TransformStage, ViewBasis, Viewport};
