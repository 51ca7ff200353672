//! A textured mesh that knows how to draw itself.
//!
//! [`Model`] bundles a mesh, its texture and transform with an [`Engine`] and
//! a private frame buffer. Hosts draw it through the [`Renderable`] trait,
//! passing a [`FrameRequest`] that says whether anything moved since the last
//! frame. An unchanged request re-blits the cached frame without rendering.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use crate::camera::Camera;
use crate::engine::{Engine, FrameStats, RenderConfig, RenderError, Scene};
use crate::mesh::{LoadError, LoadOptions, Mesh};
use crate::render::FrameBuffer;
use crate::texture::Texture;
use crate::transform::Transform;

/// Per-draw input from the host.
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'a> {
    pub camera: &'a Camera,
    /// Set when the camera or the model transform changed since the last draw.
    pub changed: bool,
}

impl<'a> FrameRequest<'a> {
    pub fn new(camera: &'a Camera, changed: bool) -> Self {
        Self { camera, changed }
    }
}

/// Something a host can composite into its target image once per frame.
pub trait Renderable {
    /// Draw with the top-left corner at the origin of `target`.
    fn draw(&mut self, target: &mut RgbaImage, request: FrameRequest<'_>) {
        self.draw_offset(target, 0, 0, request);
    }

    /// Draw with the top-left corner at `(x, y)` in `target`.
    fn draw_offset(&mut self, target: &mut RgbaImage, x: i64, y: i64, request: FrameRequest<'_>);
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub struct Model {
    name: String,
    mesh: Mesh,
    texture: Texture,
    transform: Transform,
    engine: Engine,
    frame: FrameBuffer,
    last_stats: Option<FrameStats>,
}

impl Model {
    /// Create a model rendering into a `width × height` frame.
    pub fn new(
        name: impl Into<String>,
        mesh: Mesh,
        texture: Texture,
        width: u32,
        height: u32,
        config: RenderConfig,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            name: name.into(),
            mesh,
            texture,
            transform: Transform::default(),
            engine: Engine::new(config)?,
            frame: FrameBuffer::new(width, height),
            last_stats: None,
        })
    }

    /// Load the mesh and texture from disk.
    ///
    /// A model is only created if both load; there is no partially loaded
    /// state for the host to guard against.
    pub fn load(
        name: impl Into<String>,
        obj_path: impl AsRef<Path>,
        texture_path: impl AsRef<Path>,
        width: u32,
        height: u32,
        options: LoadOptions,
        config: RenderConfig,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let mesh = Mesh::load_with(obj_path, options)?;

        let texture_path = texture_path.as_ref();
        let texture = Texture::from_file(texture_path).map_err(|source| LoadError::Texture {
            path: texture_path.to_path_buf(),
            source,
        })?;
        debug!(
            model = %name,
            triangles = mesh.triangle_count(),
            texture_width = texture.width(),
            texture_height = texture.height(),
            "model loaded"
        );

        Ok(Self::new(name, mesh, texture, width, height, config)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the transform. Pass `changed: true` on the next draw.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Statistics of the last render, `None` before the first one.
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Render a fresh frame from `camera`, unconditionally.
    pub fn render(&mut self, camera: &Camera) -> FrameStats {
        let scene = Scene {
            mesh: &self.mesh,
            texture: &self.texture,
            camera,
            transform: &self.transform,
        };
        let stats = self.engine.render(&scene, &mut self.frame);
        self.last_stats = Some(stats);
        stats
    }
}

impl Renderable for Model {
    fn draw_offset(&mut self, target: &mut RgbaImage, x: i64, y: i64, request: FrameRequest<'_>) {
        if request.changed || self.last_stats.is_none() {
            self.render(request.camera);
        }
        self.frame.blit_into(target, x, y);
    }
}
