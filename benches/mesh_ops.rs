//! Benchmarks for mesh and hull operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ferox_mesh::prelude::*;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grid(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn random_ball(count: usize, seed: u64) -> Vec<Point3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let p = Point3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.coords.norm_squared() <= 1.0 {
            points.push(p);
        }
    }
    points
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = grid(50);

    c.bench_function("from_indexed_grid_50x50", |b| {
        b.iter(|| Mesh::from_indexed(&vertices, &faces).unwrap());
    });

    c.bench_function("add_remove_10k", |b| {
        b.iter(|| {
            let mut mesh = Mesh::new();
            let handles: Vec<Triangle> = (0..10_000).map(|_| mesh.add_triangle()).collect();
            for t in handles.into_iter().step_by(2) {
                mesh.remove_triangle(t).unwrap();
            }
            mesh
        });
    });
}

fn bench_mesh_traversal(c: &mut Criterion) {
    let (vertices, faces) = grid(50);
    let mesh = Mesh::from_indexed(&vertices, &faces).unwrap();

    c.bench_function("connected_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for t in mesh.triangles() {
                for corner in Corner::ALL {
                    count += mesh.connected(t, corner).unwrap().len();
                }
            }
            count
        });
    });

    c.bench_function("cursor_normal_sum", |b| {
        b.iter(|| mesh.normal_sum());
    });

    c.bench_function("weld_grid_50x50", |b| {
        b.iter(|| {
            let mut soup = mesh.clone();
            soup.weld(1e-9).unwrap()
        });
    });
}

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull");
    group.sample_size(10);

    for count in [1_000, 20_000] {
        let points = random_ball(count, 7);
        group.bench_with_input(BenchmarkId::new("parallel", count), &points, |b, points| {
            b.iter(|| ConvexHull::construct(points).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("sequential", count), &points, |b, points| {
            let options = HullOptions::default().sequential();
            b.iter(|| ConvexHull::construct_with(points, &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mesh_construction, bench_mesh_traversal, bench_hull);
criterion_main!(benches);
