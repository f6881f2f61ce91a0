use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hero_scene::animation::AnimationDriver;
use hero_scene::geometry::{icosphere, torus, NoiseDisplacedGeometryBuilder};
use hero_scene::particles::{ParticleFieldBuilder, StarFieldBuilder};
use hero_scene::renderer::draw_list;
use hero_scene::{build_hero_scene, SceneOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark: displaced core mesh, normals included
fn bench_displaced_geometry(c: &mut Criterion) {
    let builder = NoiseDisplacedGeometryBuilder::new();
    c.bench_function("displaced_geometry", |b| b.iter(|| black_box(builder.build())));
}

/// Benchmark: icosphere at increasing subdivision levels
fn bench_icosphere_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("icosphere");
    for level in 0..=4u32 {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| black_box(icosphere(2.0, level)))
        });
    }
    group.finish();
}

fn bench_ring_torus(c: &mut Criterion) {
    c.bench_function("ring_torus", |b| b.iter(|| black_box(torus(3.5, 0.02, 16, 100))));
}

fn bench_wireframe_edges(c: &mut Criterion) {
    let mesh = NoiseDisplacedGeometryBuilder::new().build();
    c.bench_function("wireframe_edges", |b| b.iter(|| black_box(mesh.edges())));
}

fn bench_point_clouds(c: &mut Criterion) {
    c.bench_function("particle_field", |b| {
        b.iter(|| black_box(ParticleFieldBuilder::default().build_seeded(black_box(7))))
    });
    c.bench_function("star_field", |b| {
        b.iter(|| black_box(StarFieldBuilder::default().build(&mut StdRng::seed_from_u64(7))))
    });
}

/// Benchmark: per-frame CPU work, animation plus draw list
fn bench_frame_update(c: &mut Criterion) {
    let mut scene = build_hero_scene(&SceneOptions {
        particle_seed: Some(1),
        ..SceneOptions::default()
    });
    let mut driver = AnimationDriver::new();
    let mut t = 0.0f32;

    c.bench_function("frame_update", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            driver.apply(&mut scene, black_box(t));
            black_box(draw_list(&scene))
        })
    });
}

criterion_group!(
    benches,
    bench_displaced_geometry,
    bench_icosphere_levels,
    bench_ring_torus,
    bench_wireframe_edges,
    bench_point_clouds,
    bench_frame_update,
);

criterion_main!(benches);
