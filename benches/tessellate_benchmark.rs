use std::f64::consts::PI;

use contour_tessellator::testing::geometry::regular_polygon;
use contour_tessellator::{tessellate, tessellate_with, Contour, LyonBackend, Point, Tessellator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

// Star shaped around the origin, so never self-intersecting
fn generate_random_radial_contour(count: usize) -> Contour {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / count as f64;
            let radius = rng.random_range(50.0..100.0);
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn benchmark_backends(c: &mut Criterion) {
    let hole = regular_polygon(16, 20.0, Point::origin());

    let mut group = c.benchmark_group("Backends");

    for count in [16, 128, 1024] {
        let outer = generate_random_radial_contour(count);

        group.bench_with_input(BenchmarkId::new("ear_clip", count), &outer, |b, outer| {
            b.iter(|| black_box(tessellate(black_box(outer), Some(&hole))))
        });

        group.bench_with_input(BenchmarkId::new("lyon", count), &outer, |b, outer| {
            b.iter(|| black_box(tessellate_with(&mut LyonBackend::new(), black_box(outer), Some(&hole))))
        });
    }

    group.finish();
}

fn benchmark_requests(c: &mut Criterion) {
    let outer = generate_random_radial_contour(128);
    let tessellator = Tessellator::new();

    let mut group = c.benchmark_group("Requests");

    // includes spawning the worker thread
    group.bench_function("get_triangles", |b| {
        b.iter(|| black_box(tessellator.get_triangles(black_box(&outer), None)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_backends, benchmark_requests);
criterion_main!(benches);
