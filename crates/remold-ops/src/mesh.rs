//! Control-grid mesh warp.
//!
//! A [`MeshGrid`] holds a `rows × cols` lattice of cells over the raster.
//! Moving control points deforms cells; [`mesh_warp`] then resamples each
//! original cell into its deformed quadrilateral.
//!
//! For a target pixel inside a deformed cell with corners `q00, q10, q11,
//! q01`, the bilinear parameters `(u, v)` with
//!
//! ```text
//! p = (1-u)(1-v)·q00 + u(1-v)·q10 + (1-u)v·q01 + uv·q11
//! ```
//!
//! are found by Newton iteration seeded from the nearest of 20×20 precomputed
//! sub-samples; the source coordinate is the same `(u, v)` on the original
//! cell. Pixels no deformed cell covers pass through unchanged.
//!
//! # Example
//!
//! ```rust
//! use remold_core::{Point2D, RasterBuffer};
//! use remold_ops::mesh::{mesh_warp, MeshGrid};
//!
//! let src = RasterBuffer::filled(50, 50, [0, 0, 255, 255]).unwrap();
//! let mut grid = MeshGrid::new(50, 50, 5, 5).unwrap();
//! grid.move_point(2, 2, Point2D::new(22.0, 18.0)).unwrap();
//! let out = mesh_warp(&src, &grid).unwrap();
//! assert_eq!(out.width(), 50);
//! ```

use remold_core::{Point2D, RasterBuffer};
use remold_math::Falloff;
use tracing::{debug, trace};

use crate::warp::apply_warp;
use crate::{OpsError, OpsResult};

/// Default number of cells along each axis.
pub const DEFAULT_DIVISIONS: usize = 10;

/// Sub-samples per cell axis used to seed the inverse solve.
const SEED_STEPS: usize = 20;

const NEWTON_ITERATIONS: usize = 12;
const NEWTON_TOLERANCE: f64 = 1e-6;
/// Slack on `(u, v)` so pixels on shared edges land in a cell.
const PARAM_SLACK: f64 = 1e-4;

/// Original and deformed control points of a mesh, row-major,
/// `(rows + 1) × (cols + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    width: u32,
    height: u32,
    rows: usize,
    cols: usize,
    original: Vec<Point2D>,
    deformed: Vec<Point2D>,
}

impl MeshGrid {
    /// Lattice of `rows × cols` cells spanning `[0, w-1] × [0, h-1]`.
    pub fn new(width: u32, height: u32, rows: usize, cols: usize) -> OpsResult<Self> {
        if width == 0 || height == 0 {
            return Err(OpsError::InvalidDimensions(format!(
                "mesh over empty raster {width}x{height}"
            )));
        }
        if rows == 0 || cols == 0 || rows > 1024 || cols > 1024 {
            return Err(OpsError::InvalidParameter(format!(
                "mesh divisions must be 1..=1024, got {rows}x{cols}"
            )));
        }

        let sx = (width - 1) as f64 / cols as f64;
        let sy = (height - 1) as f64 / rows as f64;
        let original: Vec<Point2D> = (0..=rows)
            .flat_map(|r| (0..=cols).map(move |c| Point2D::new(c as f64 * sx, r as f64 * sy)))
            .collect();

        Ok(Self {
            width,
            height,
            rows,
            cols,
            deformed: original.clone(),
            original,
        })
    }

    /// Default 10×10 mesh.
    pub fn with_default_divisions(width: u32, height: u32) -> OpsResult<Self> {
        Self::new(width, height, DEFAULT_DIVISIONS, DEFAULT_DIVISIONS)
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raster size the mesh was built for.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row <= self.rows && col <= self.cols).then(|| row * (self.cols + 1) + col)
    }

    /// Current position of control point `(row, col)`.
    pub fn point(&self, row: usize, col: usize) -> Option<Point2D> {
        self.index(row, col).map(|i| self.deformed[i])
    }

    /// Moves one control point.
    pub fn move_point(&mut self, row: usize, col: usize, to: Point2D) -> OpsResult<()> {
        let Some(i) = self.index(row, col) else {
            return Err(OpsError::InvalidParameter(format!(
                "control point ({row}, {col}) outside {}x{} mesh",
                self.rows, self.cols
            )));
        };
        if !to.is_finite() {
            return Err(OpsError::InvalidParameter("control point must be finite".into()));
        }
        self.deformed[i] = to;
        Ok(())
    }

    /// Drags every control point near `from` by `to - from`, weighted by the
    /// falloff over `radius`. Returns how many points moved.
    pub fn drag(&mut self, from: Point2D, to: Point2D, radius: f64) -> usize {
        if !from.is_finite() || !to.is_finite() {
            return 0;
        }
        let delta = to - from;
        let falloff = Falloff::new(radius, 1.0, 0.0);
        let mut moved = 0;
        for p in &mut self.deformed {
            let w = falloff.weight_at(p.distance(from));
            if w > 0.0 {
                *p = *p + delta * w;
                moved += 1;
            }
        }
        moved
    }

    /// Returns `true` if no control point has moved.
    pub fn is_identity(&self) -> bool {
        self.original == self.deformed
    }

    fn corners(points: &[Point2D], cols: usize, r: usize, c: usize) -> [Point2D; 4] {
        let stride = cols + 1;
        [
            points[r * stride + c],
            points[r * stride + c + 1],
            points[(r + 1) * stride + c],
            points[(r + 1) * stride + c + 1],
        ]
    }
}

/// Bilinear point of a cell `[q00, q10, q01, q11]`.
#[inline]
fn bilerp(q: &[Point2D; 4], u: f64, v: f64) -> Point2D {
    q[0] * ((1.0 - u) * (1.0 - v)) + q[1] * (u * (1.0 - v)) + q[2] * ((1.0 - u) * v) + q[3] * (u * v)
}

/// A deformed cell ready for inverse lookups.
struct Cell {
    src: [Point2D; 4],
    dst: [Point2D; 4],
    min: Point2D,
    max: Point2D,
    seeds: Vec<(f64, f64, Point2D)>,
}

impl Cell {
    fn new(src: [Point2D; 4], dst: [Point2D; 4]) -> Self {
        let mut min = dst[0];
        let mut max = dst[0];
        for q in &dst[1..] {
            min = Point2D::new(min.x.min(q.x), min.y.min(q.y));
            max = Point2D::new(max.x.max(q.x), max.y.max(q.y));
        }
        let seeds = (0..SEED_STEPS)
            .flat_map(|i| (0..SEED_STEPS).map(move |j| (i, j)))
            .map(|(i, j)| {
                let u = (j as f64 + 0.5) / SEED_STEPS as f64;
                let v = (i as f64 + 0.5) / SEED_STEPS as f64;
                (u, v, bilerp(&dst, u, v))
            })
            .collect();
        Self { src, dst, min, max, seeds }
    }

    #[inline]
    fn may_contain(&self, p: Point2D) -> bool {
        p.x >= self.min.x - 0.5 && p.x <= self.max.x + 0.5 && p.y >= self.min.y - 0.5 && p.y <= self.max.y + 0.5
    }

    /// Solves for `(u, v)` of `p` in the deformed cell.
    fn inverse(&self, p: Point2D) -> Option<(f64, f64)> {
        let (mut u, mut v) = self
            .seeds
            .iter()
            .min_by(|a, b| a.2.distance(p).total_cmp(&b.2.distance(p)))
            .map(|s| (s.0, s.1))?;

        let q = &self.dst;
        for _ in 0..NEWTON_ITERATIONS {
            let e = p - bilerp(q, u, v);
            if e.x.abs() < NEWTON_TOLERANCE && e.y.abs() < NEWTON_TOLERANCE {
                break;
            }
            let du = (q[1] - q[0]) * (1.0 - v) + (q[3] - q[2]) * v;
            let dv = (q[2] - q[0]) * (1.0 - u) + (q[3] - q[1]) * u;
            let det = du.x * dv.y - dv.x * du.y;
            if !det.is_finite() || det.abs() < 1e-12 {
                return None;
            }
            u += (e.x * dv.y - e.y * dv.x) / det;
            v += (e.y * du.x - e.x * du.y) / det;
        }

        let e = p - bilerp(q, u, v);
        let converged = e.x.abs() < 1e-3 && e.y.abs() < 1e-3;
        let inside = (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&u) && (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&v);
        (converged && inside).then(|| (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)))
    }
}

/// Resamples `src` through the deformation of `grid` into a new buffer.
pub fn mesh_warp(src: &RasterBuffer, grid: &MeshGrid) -> OpsResult<RasterBuffer> {
    if grid.dimensions() != (src.width(), src.height()) {
        return Err(OpsError::InvalidDimensions(format!(
            "mesh built for {}x{}, raster is {}x{}",
            grid.width,
            grid.height,
            src.width(),
            src.height()
        )));
    }

    if grid.is_identity() {
        trace!("mesh_warp: untouched grid");
        return Ok(src.clone());
    }

    // Cells whose corners did not move map onto themselves
    let cells: Vec<Cell> = (0..grid.rows)
        .flat_map(|r| (0..grid.cols).map(move |c| (r, c)))
        .filter_map(|(r, c)| {
            let from = MeshGrid::corners(&grid.original, grid.cols, r, c);
            let to = MeshGrid::corners(&grid.deformed, grid.cols, r, c);
            (from != to).then(|| Cell::new(from, to))
        })
        .collect();

    debug!(
        width = src.width(),
        height = src.height(),
        deformed_cells = cells.len(),
        "mesh_warp"
    );

    let mut dst = src.clone();
    if cells.is_empty() {
        return Ok(dst);
    }

    apply_warp(src, &mut dst, src.bounds(), |p| {
        cells
            .iter()
            .filter(|cell| cell.may_contain(p))
            .find_map(|cell| cell.inverse(p).map(|(u, v)| bilerp(&cell.src, u, v)))
    })?;
    Ok(dst)
}
