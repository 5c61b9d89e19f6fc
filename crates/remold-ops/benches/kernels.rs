use criterion::{criterion_group, criterion_main, Criterion};
use remold_core::{Point2D, RasterBuffer};
use remold_ops::brush::{pinch, Dab};
use remold_ops::filter::gaussian_blur;
use remold_ops::mesh::{mesh_warp, MeshGrid};
use remold_ops::warp::twist;
use std::hint::black_box;

fn test_image(w: u32, h: u32) -> RasterBuffer {
    let mut buf = RasterBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            buf.set_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    buf
}

fn bench_pinch(c: &mut Criterion) {
    let src = test_image(1024, 1024);
    let mut dst = src.clone();
    let dab = Dab::new(Point2D::new(512.0, 512.0), 120.0, 0.6, 30.0);
    c.bench_function("pinch_r120", |b| {
        b.iter(|| pinch(black_box(&src), &mut dst, &dab, true).unwrap())
    });
}

fn bench_blur(c: &mut Criterion) {
    let src = test_image(512, 512);
    c.bench_function("gaussian_blur_r4", |b| b.iter(|| gaussian_blur(black_box(&src), 4.0).unwrap()));
}

fn bench_twist(c: &mut Criterion) {
    let src = test_image(512, 512);
    let center = Point2D::new(256.0, 256.0);
    c.bench_function("twist_512", |b| b.iter(|| twist(black_box(&src), center, 200.0, 90.0).unwrap()));
}

fn bench_mesh(c: &mut Criterion) {
    let src = test_image(256, 256);
    let mut grid = MeshGrid::with_default_divisions(256, 256).unwrap();
    let from = grid.point(5, 5).unwrap();
    grid.drag(from, from + Point2D::new(12.0, -8.0), 60.0);
    c.bench_function("mesh_warp_256", |b| b.iter(|| mesh_warp(black_box(&src), &grid).unwrap()));
}

criterion_group!(benches, bench_pinch, bench_blur, bench_twist, bench_mesh);
criterion_main!(benches);
