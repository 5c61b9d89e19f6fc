//! Cross-crate properties of the kernels.

use approx::assert_relative_eq;
use remold_core::{Point2D, RasterBuffer};
use remold_math::{catmull_rom, Falloff, Homography};
use remold_ops::filter::gaussian_kernel;
use remold_ops::mesh::{mesh_warp, MeshGrid};
use remold_ops::perspective::perspective_matrix;
use remold_ops::resample::sample;

fn ramp(w: u32, h: u32) -> RasterBuffer {
    let mut buf = RasterBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            buf.set_pixel(x, y, [(x * 9 % 256) as u8, (y * 13 % 256) as u8, 77, 255]);
        }
    }
    buf
}

#[test]
fn test_resampler_bounds_sweep() {
    let buf = ramp(17, 11);
    let mut step = -1000.0;
    while step <= 1000.0 {
        for &other in &[-1000.0, -0.5, 0.0, 5.25, 10.0, 16.0, 1000.0] {
            let a = sample(&buf, step, other);
            let b = sample(&buf, other, step);
            let inside = |x: f64, y: f64| (0.0..=16.0).contains(&x) && (0.0..=10.0).contains(&y);
            if !inside(step, other) {
                assert_eq!(a, [0, 0, 0, 0]);
            }
            if !inside(other, step) {
                assert_eq!(b, [0, 0, 0, 0]);
            }
        }
        step += 0.75;
    }
    assert_eq!(sample(&buf, f64::NAN, 2.0), [0, 0, 0, 0]);
}

#[test]
fn test_falloff_monotonic_for_all_feathers() {
    for feather in [0.0, 10.0, 50.0, 90.0, 100.0] {
        for intensity in [0.1, 0.5, 1.0] {
            let f = Falloff::new(25.0, intensity, feather);
            let mut prev = f.strength_at(0.0);
            assert_relative_eq!(prev, intensity);
            for i in 1..=500 {
                let d = i as f64 * 0.05;
                let s = f.strength_at(d);
                assert!(s <= prev + 1e-12);
                prev = s;
            }
            assert_eq!(f.strength_at(25.0), 0.0);
            assert_eq!(f.strength_at(400.0), 0.0);
        }
    }
}

#[test]
fn test_gaussian_normalised() {
    for r in [0.1, 0.5, 1.0, 2.5, 7.0, 33.3, 200.0] {
        let k = gaussian_kernel(r).unwrap();
        assert_eq!(k.len(), 2 * r.ceil() as usize + 1);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "radius {r}: sum {sum}");
    }
}

#[test]
fn test_curve_path_dense_and_anchored() {
    let ctrl = [
        Point2D::new(0.0, 0.0),
        Point2D::new(30.0, 10.0),
        Point2D::new(60.0, -5.0),
    ];
    let path = catmull_rom(&ctrl, 16);
    assert_eq!(path.len(), 33);
    assert_eq!(path[0], ctrl[0]);
    assert_eq!(path[32], ctrl[2]);
    for pair in path.windows(2) {
        assert!(pair[0].distance(pair[1]) < 5.0);
    }
}

#[test]
fn test_perspective_corners_exact() {
    let corners = [
        Point2D::new(5.0, 3.0),
        Point2D::new(58.0, 9.0),
        Point2D::new(61.0, 44.0),
        Point2D::new(2.0, 40.0),
    ];
    let m = perspective_matrix(64, 48, corners).unwrap();
    let src = [
        Point2D::new(0.0, 0.0),
        Point2D::new(63.0, 0.0),
        Point2D::new(63.0, 47.0),
        Point2D::new(0.0, 47.0),
    ];
    for (s, c) in src.iter().zip(corners) {
        let p = m.map(*s).unwrap();
        assert_relative_eq!(p.x, c.x, epsilon = 1e-9);
        assert_relative_eq!(p.y, c.y, epsilon = 1e-9);
    }
    assert!(Homography::square_to_quad([Point2D::ZERO; 4]).is_none());
}

#[test]
fn test_mesh_identity_and_locality() {
    let src = ramp(60, 60);
    let mut grid = MeshGrid::new(60, 60, 6, 6).unwrap();
    assert!(mesh_warp(&src, &grid).unwrap() == src);

    grid.move_point(3, 3, Point2D::new(33.0, 31.0)).unwrap();
    let out = mesh_warp(&src, &grid).unwrap();
    assert!(out != src);
    // Cells away from the moved point keep their pixels
    for y in 0..15 {
        for x in 0..15 {
            assert_eq!(out.pixel(x, y), src.pixel(x, y));
        }
    }
}
