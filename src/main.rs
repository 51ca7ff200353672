//! Headless demo: render a spinning model and save the last frame.
//!
//! Usage: `softraster [model.obj texture.png] [output.png]`
//!
//! Without a model the built-in cube is drawn with a 2×2 checker texture.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use softraster::colors;
use softraster::mesh::CUBE_OBJ;
use softraster::prelude::*;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FRAMES: u32 = 90;
const SPIN_PER_FRAME: f32 = 0.02;
const BACKGROUND: Rgba<u8> = Rgba([32, 32, 40, 255]);

struct Args {
    assets: Option<(PathBuf, PathBuf)>,
    output: PathBuf,
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (assets, output) = match args.as_slice() {
        [] => (None, None),
        [out] => (None, Some(out)),
        [obj, tex] => (Some((obj, tex)), None),
        [obj, tex, out] => (Some((obj, tex)), Some(out)),
        _ => bail!("usage: softraster [model.obj texture.png] [output.png]"),
    };
    Ok(Args {
        assets: assets.map(|(o, t)| (PathBuf::from(o), PathBuf::from(t))),
        output: output.map_or_else(|| PathBuf::from("frame.png"), PathBuf::from),
    })
}

fn build_model(args: &Args) -> Result<Model> {
    let config = RenderConfig::default();
    match &args.assets {
        Some((obj, tex)) => {
            let options = LoadOptions { normalize: true };
            Model::load("model", obj, tex, WIDTH, HEIGHT, options, config)
                .with_context(|| format!("loading {}", obj.display()))
        }
        None => {
            let mesh = Mesh::from_obj_str(CUBE_OBJ)?.normalized();
            let checker = vec![
                colors::from_rgba(230, 80, 60, 255),
                colors::WHITE,
                colors::WHITE,
                colors::from_rgba(230, 80, 60, 255),
            ];
            let texture = Texture::from_pixels(2, 2, checker).context("checker texture")?;
            Ok(Model::new("cube", mesh, texture, WIDTH, HEIGHT, config)?)
        }
    }
}

fn main() -> Result<()> {
    let fmt_layer = fmt::layer().with_target(false);
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let args = parse_args()?;
    let mut model = build_model(&args)?;
    info!(model = model.name(), triangles = model.mesh().triangle_count(), "starting");

    let projection = Projection::from_degrees(60.0, WIDTH as f32 / HEIGHT as f32);
    let camera = Camera::with_orientation(Vec3::new(0.0, 0.0, 3.0), Vec3::BACK, Vec3::UP, projection);

    let mut target = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let mut total = std::time::Duration::ZERO;
    for _ in 0..FRAMES {
        model.transform_mut().rotate_x(SPIN_PER_FRAME * 0.5).rotate_y(SPIN_PER_FRAME);
        target.pixels_mut().for_each(|p| *p = BACKGROUND);
        model.draw(&mut target, FrameRequest::new(&camera, true));
        if let Some(stats) = model.last_stats() {
            total += stats.elapsed;
        }
    }

    if let Some(stats) = model.last_stats() {
        info!(
            frames = FRAMES,
            avg_ms = total.as_secs_f64() * 1000.0 / FRAMES as f64,
            culled = stats.culled,
            degenerate = stats.degenerate,
            pixels = stats.pixels_written,
            "render finished"
        );
    }

    target
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), "frame saved");
    Ok(())
}
