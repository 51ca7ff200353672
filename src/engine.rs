//! Frame orchestration.
//!
//! The [`Engine`] drives one full frame: clear the buffers, build the camera
//! basis, prepare every triangle, then rasterize.
//!
//! With [`Schedule::Parallel`] both passes run on a dedicated rayon pool:
//!
//! 1. triangle setup is spread over the pool by triangle index,
//! 2. the frame is split into disjoint row bands and each band rasterizes
//!    every triangle, in submission order, into its own rows only.
//!
//! No two workers ever touch the same depth cell, so the depth test needs no
//! locking and the output matches [`Schedule::Sequential`] bit for bit.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::camera::Camera;
use crate::colors;
use crate::light::DirectionalLight;
use crate::mesh::Mesh;
use crate::render::{
    BarycentricRasterizer, FrameBand, FrameBuffer, Prepared, ScreenTriangle, TransformStage,
    ViewBasis, Viewport,
};
use crate::texture::Texture;
use crate::transform::Transform;

/// How a frame's work is spread over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Everything on the calling thread.
    Sequential,
    /// A fixed pool of workers owning disjoint row bands.
    #[default]
    Parallel,
}

/// Engine settings. Fixed for the lifetime of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub schedule: Schedule,
    /// Worker threads in the pool.
    pub workers: usize,
    /// Bands handed to each worker, for load balancing.
    pub bands_per_worker: usize,
    pub clear_color: u32,
    pub light: DirectionalLight,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            schedule: Schedule::default(),
            workers: 4,
            bands_per_worker: 4,
            clear_color: colors::TRANSPARENT,
            light: DirectionalLight::default(),
        }
    }
}

impl RenderConfig {
    pub fn sequential() -> Self {
        Self::default().with_schedule(Schedule::Sequential)
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_bands_per_worker(mut self, bands: usize) -> Self {
        self.bands_per_worker = bands.max(1);
        self
    }

    pub fn with_clear_color(mut self, color: u32) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_light(mut self, light: DirectionalLight) -> Self {
        self.light = light;
        self
    }

    fn band_count(&self) -> usize {
        self.workers.max(1) * self.bands_per_worker.max(1)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start render workers: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// Everything that is read, never written, while a frame renders.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub mesh: &'a Mesh,
    pub texture: &'a Texture,
    pub camera: &'a Camera,
    pub transform: &'a Transform,
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles submitted.
    pub triangles: usize,
    /// Triangles dropped for reaching behind the eye.
    pub culled: usize,
    /// Triangles dropped for having no area.
    pub degenerate: usize,
    /// Pixels that won a depth test. Overdraw counts more than once.
    pub pixels_written: usize,
    pub elapsed: Duration,
}

pub struct Engine {
    config: RenderConfig,
    rasterizer: BarycentricRasterizer,
    pool: Option<ThreadPool>,
}

impl Engine {
    /// Create an engine, starting its worker pool if the schedule is parallel.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let pool = match config.schedule {
            Schedule::Sequential => None,
            Schedule::Parallel => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(config.workers.max(1))
                    .thread_name(|i| format!("raster-{i}"))
                    .build()?;
                debug!(
                    workers = config.workers,
                    bands = config.band_count(),
                    "render pool started"
                );
                Some(pool)
            }
        };

        Ok(Self {
            config,
            rasterizer: BarycentricRasterizer::new(),
            pool,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `scene` into `frame`, replacing its previous contents.
    pub fn render(&self, scene: &Scene, frame: &mut FrameBuffer) -> FrameStats {
        let start = Instant::now();
        frame.clear(self.config.clear_color);

        let mut stats = FrameStats {
            triangles: scene.mesh.triangle_count(),
            ..FrameStats::default()
        };

        let Some(basis) = ViewBasis::from_camera(scene.camera, scene.transform) else {
            warn!(
                position = ?scene.camera.position(),
                forward = ?scene.camera.forward(),
                "camera frame is degenerate, nothing drawn"
            );
            stats.elapsed = start.elapsed();
            return stats;
        };
        let viewport = Viewport::new(frame.width(), frame.height());
        let stage = TransformStage::new(basis, scene.camera, scene.transform, viewport);

        let prepared = match &self.pool {
            None => (0..stats.triangles)
                .map(|i| stage.prepare(scene.mesh, i))
                .collect::<Vec<_>>(),
            Some(pool) => pool.install(|| {
                (0..stats.triangles)
                    .into_par_iter()
                    .map(|i| stage.prepare(scene.mesh, i))
                    .collect::<Vec<_>>()
            }),
        };

        let mut ready = Vec::with_capacity(prepared.len());
        for p in prepared {
            match p {
                Prepared::Ready(tri) => ready.push(tri),
                Prepared::Culled => stats.culled += 1,
                Prepared::Degenerate => stats.degenerate += 1,
            }
        }

        stats.pixels_written = match &self.pool {
            None => self.rasterize_band(&ready, &mut frame.as_band(), scene.texture),
            Some(pool) => {
                let mut bands = frame.split_into_bands(self.config.band_count());
                pool.install(|| {
                    bands
                        .par_iter_mut()
                        .map(|band| self.rasterize_band(&ready, band, scene.texture))
                        .sum::<usize>()
                })
            }
        };

        stats.elapsed = start.elapsed();
        trace!(
            triangles = stats.triangles,
            culled = stats.culled,
            degenerate = stats.degenerate,
            pixels = stats.pixels_written,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "frame rendered"
        );
        stats
    }

    fn rasterize_band(
        &self,
        triangles: &[ScreenTriangle],
        band: &mut FrameBand,
        texture: &Texture,
    ) -> usize {
        let mut written = 0;
        for tri in triangles {
            if BarycentricRasterizer::overlaps(tri, band) {
                written += self
                    .rasterizer
                    .fill_triangle(tri, band, texture, &self.config.light);
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::mesh::CUBE_OBJ;
    use crate::projection::Projection;

    fn camera() -> Camera {
        Camera::with_orientation(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::BACK,
            Vec3::UP,
            Projection::from_degrees(60.0, 1.0),
        )
    }

    fn render(config: RenderConfig, transform: &Transform) -> (FrameBuffer, FrameStats) {
        let mesh = Mesh::from_obj_str(CUBE_OBJ).unwrap();
        let texture = Texture::solid(2, 2, colors::WHITE).unwrap();
        let camera = camera();
        let scene = Scene {
            mesh: &mesh,
            texture: &texture,
            camera: &camera,
            transform,
        };
        let engine = Engine::new(config).unwrap();
        let mut frame = FrameBuffer::new(64, 64);
        let stats = engine.render(&scene, &mut frame);
        (frame, stats)
    }

    #[test]
    fn config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.schedule, Schedule::Parallel);
        assert_eq!(config.workers, 4);
        assert_eq!(config.band_count(), 16);
        assert_eq!(RenderConfig::default().with_workers(0).workers, 1);
    }

    #[test]
    fn sequential_engine_has_no_pool() {
        let engine = Engine::new(RenderConfig::sequential()).unwrap();
        assert!(engine.pool.is_none());
    }

    #[test]
    fn cube_stats_add_up() {
        let (_, stats) = render(RenderConfig::sequential(), &Transform::default());
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.culled, 0);
        assert!(stats.pixels_written > 0);
    }

    #[test]
    fn schedules_agree() {
        let mut t = Transform::new();
        t.rotate_x(0.4).rotate_y(0.7);
        let (seq, seq_stats) = render(RenderConfig::sequential(), &t);
        let (par, par_stats) = render(RenderConfig::default().with_workers(3), &t);
        assert_eq!(seq.pixels(), par.pixels());
        assert_eq!(seq.depths(), par.depths());
        assert_eq!(seq_stats.pixels_written, par_stats.pixels_written);
    }

    #[test]
    fn degenerate_camera_draws_nothing() {
        let mesh = Mesh::from_obj_str(CUBE_OBJ).unwrap();
        let texture = Texture::solid(1, 1, colors::WHITE).unwrap();
        let camera = Camera::with_orientation(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::ZERO,
            Vec3::UP,
            Projection::from_degrees(60.0, 1.0),
        );
        let transform = Transform::default();
        let scene = Scene {
            mesh: &mesh,
            texture: &texture,
            camera: &camera,
            transform: &transform,
        };
        let mut frame = FrameBuffer::new(16, 16);
        let stats = Engine::new(RenderConfig::sequential())
            .unwrap()
            .render(&scene, &mut frame);
        assert_eq!(stats.pixels_written, 0);
        assert!(frame.pixels().iter().all(|&c| c == colors::TRANSPARENT));
    }
}
