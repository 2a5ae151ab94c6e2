//! Benchmarks for the codec and the skinning engine.

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;

use ugrid::algo::skin_volume;
use ugrid::io::codec;
use ugrid::prelude::*;

/// An n x n x n block of unit hexahedra with its boundary skin stored
/// as surface quads (all on one patch).
fn create_hexa_grid(n: usize) -> VolumeMesh {
    let mut mesh = VolumeMesh::new();

    let stride = n + 1;
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                mesh.nodes.push(Point3::new(i as f64, j as f64, k as f64));
            }
        }
    }

    let node = |i: usize, j: usize, k: usize| (k * stride * stride + j * stride + i + 1) as i32;
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                mesh.hexas.push([
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j + 1, k),
                    node(i, j + 1, k),
                    node(i, j, k + 1),
                    node(i + 1, j, k + 1),
                    node(i + 1, j + 1, k + 1),
                    node(i, j + 1, k + 1),
                ]);
            }
        }
    }

    // Derive the skin once so the model is encodable.
    let skin = skin_volume(&mesh).unwrap();
    for face in &skin.quad_faces {
        if face.is_boundary() {
            let v = face.vertices;
            mesh.quads.push([v[0] + 1, v[1] + 1, v[2] + 1, v[3] + 1]);
        }
    }
    mesh.pids = vec![1; mesh.quads.len()];
    mesh
}

fn bench_skin(c: &mut Criterion) {
    let small = create_hexa_grid(8);
    let large = create_hexa_grid(20);

    c.bench_function("skin_hexa_grid_8", |b| {
        b.iter(|| skin_volume(&small).unwrap())
    });
    c.bench_function("skin_hexa_grid_20", |b| {
        b.iter(|| skin_volume(&large).unwrap())
    });
}

fn bench_codec(c: &mut Criterion) {
    let mesh = create_hexa_grid(12);
    let descriptor = FormatDescriptor::from_filename("grid.lb8.ugrid").unwrap();

    let mut encoded = Vec::new();
    codec::encode_to(&mesh, &mut encoded, descriptor).unwrap();

    c.bench_function("encode_hexa_grid_12", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(encoded.len());
            codec::encode_to(&mesh, &mut buf, descriptor).unwrap();
            buf
        })
    });

    c.bench_function("decode_hexa_grid_12", |b| {
        b.iter(|| {
            codec::decode_from(Cursor::new(&encoded), descriptor, encoded.len() as u64).unwrap()
        })
    });
}

criterion_group!(benches, bench_skin, bench_codec);
criterion_main!(benches);
