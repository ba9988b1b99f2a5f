//! Benchmarks for shader generation and CPU-side catalog evaluation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use swirl::attractor::AttractorKind;
use swirl::shader::{points_shader, simulation_shader};

fn bench_simulation_shader_gen(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_shader");

    for kind in [
        AttractorKind::Lorenz,
        AttractorKind::Thomas,
        AttractorKind::QuadraticStrange,
        AttractorKind::Identity,
    ] {
        group.bench_with_input(BenchmarkId::new("generate", kind.name()), &kind, |b, &k| {
            b.iter(|| black_box(simulation_shader(k)))
        });
    }

    group.finish();
}

fn bench_points_shader_gen(c: &mut Criterion) {
    c.bench_function("points_shader", |b| b.iter(|| black_box(points_shader())));
}

fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");

    for kind in [
        AttractorKind::Lorenz,
        AttractorKind::Aizawa,
        AttractorKind::QuadraticStrange,
    ] {
        let coeffs = kind.default_values();
        group.bench_with_input(BenchmarkId::new("step_1k", kind.name()), &kind, |b, &k| {
            b.iter(|| {
                let mut pos = Vec3::new(0.1, 0.2, 0.3);
                for _ in 0..1000 {
                    pos += k.integrate(pos, &coeffs);
                }
                black_box(pos)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simulation_shader_gen,
    bench_points_shader_gen,
    bench_integrate,
);
criterion_main!(benches);
