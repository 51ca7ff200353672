use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softraster::colors;
use softraster::light::DirectionalLight;
use softraster::math::Vec3;
use softraster::mesh::{Triangle, CUBE_OBJ};
use softraster::prelude::*;
use softraster::render::{BarycentricRasterizer, ScreenTriangle};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn screen_triangle(corners: [(f32, f32); 3]) -> ScreenTriangle {
    let [a, b, c] = corners.map(|(x, y)| Vec3::new(x, y, 0.5));
    let n = Vec3::FORWARD;
    ScreenTriangle::new(
        Triangle::new(a, b, c),
        Triangle::new(n, n, n),
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 1.0, 0.0),
        ),
    )
    .expect("benchmark triangles have area")
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let rasterizer = BarycentricRasterizer::new();
    let texture = Texture::solid(64, 64, colors::WHITE).expect("non-empty texture");
    let light = DirectionalLight::default();

    for (name, triangle) in [
        ("small", screen_triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])),
        ("medium", screen_triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])),
        ("large", screen_triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])),
    ] {
        group.bench_with_input(BenchmarkId::new("textured", name), &triangle, |b, tri| {
            let mut frame = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                // Reset depth so every iteration does the full write path.
                frame.clear(colors::TRANSPARENT);
                rasterizer.fill_triangle(black_box(tri), &mut frame.as_band(), &texture, &light)
            });
        });
    }

    group.finish();
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_frame");

    let mesh = Mesh::from_obj_str(CUBE_OBJ).expect("built-in cube parses");
    let texture = Texture::solid(2, 2, colors::WHITE).expect("non-empty texture");
    let camera = Camera::with_orientation(
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::BACK,
        Vec3::UP,
        Projection::from_degrees(60.0, BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32),
    );
    let mut transform = Transform::new();
    transform.rotate_x(0.5).rotate_y(0.8);
    let scene = Scene {
        mesh: &mesh,
        texture: &texture,
        camera: &camera,
        transform: &transform,
    };

    for (name, config) in [
        ("sequential", RenderConfig::sequential()),
        ("parallel_4", RenderConfig::default()),
        ("parallel_8", RenderConfig::default().with_workers(8)),
    ] {
        let engine = Engine::new(config).expect("worker pool starts");
        group.bench_function(name, |b| {
            let mut frame = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| engine.render(black_box(&scene), &mut frame));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_frame);
criterion_main!(benches);
