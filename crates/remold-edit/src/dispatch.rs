//! Region dispatcher: runs one tool application against a scratch copy.
//!
//! ```text
//!  Idle ──apply──> Applying ──ok──> Committed
//!                     │
//!                     └──err──> Failed   (scratch dropped, canonical untouched)
//! ```
//!
//! Kernels never read the buffer they write. Two scratch buffers are kept
//! in lock step: each dab reads `front` and writes its box into `back`, and
//! only that box is copied back into `front` afterwards.

use remold_core::{Point2D, RasterBuffer, Rect};
use remold_math::catmull_rom;
use remold_ops::brush::{self, Dab};
use remold_ops::filter::gaussian_blur_rect;
use remold_ops::transform::mirror_rect;
use remold_ops::OpsResult;
use tracing::{debug, trace};

use crate::catalog::{EditMode, PinchDirection, SculptDirection, WarpAxis};
use crate::settings::{EditRegion, ToolSettings};
use crate::{EditError, EditResult};

/// Samples per segment when densifying curve strokes.
pub const CURVE_RESOLUTION: usize = 8;

/// Blur radius in pixels at 100% feather.
pub const FEATHER_BLUR_RADIUS: f64 = 3.0;

/// Where the dispatcher is in its last application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// Nothing applied yet.
    #[default]
    Idle,
    /// An application is running.
    Applying,
    /// The last application succeeded.
    Committed,
    /// The last application failed; nothing was changed.
    Failed,
}

/// Result of a successful application.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The new buffer.
    pub buffer: RasterBuffer,
    /// Union of every box a kernel wrote, `None` when nothing was touched.
    pub affected: Option<Rect>,
}

/// Tracks the state machine around [`render`].
#[derive(Debug, Default)]
pub struct Dispatcher {
    state: DispatchState,
}

impl Dispatcher {
    /// Idle dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Renders `regions` onto a copy of `canonical`, recording the outcome
    /// in [`state`](Self::state).
    pub fn apply(
        &mut self,
        canonical: &RasterBuffer,
        mode: &EditMode,
        regions: &[EditRegion],
        settings: &ToolSettings,
    ) -> EditResult<DispatchOutcome> {
        self.state = DispatchState::Applying;
        match render(canonical, mode, regions, settings) {
            Ok(outcome) => {
                self.state = DispatchState::Committed;
                Ok(outcome)
            }
            Err(e) => {
                debug!(mode = mode.name(), error = %e, "dispatch failed");
                self.state = DispatchState::Failed;
                Err(e)
            }
        }
    }
}

/// Two equal-size scratch buffers that agree outside the box last written.
struct PingPong {
    front: RasterBuffer,
    back: RasterBuffer,
    affected: Option<Rect>,
}

impl PingPong {
    fn new(src: &RasterBuffer) -> Self {
        Self {
            front: src.clone(),
            back: src.clone(),
            affected: None,
        }
    }

    fn step<F>(&mut self, kernel: F) -> EditResult<()>
    where
        F: FnOnce(&RasterBuffer, &mut RasterBuffer) -> OpsResult<Option<Rect>>,
    {
        if let Some(rect) = kernel(&self.front, &mut self.back)? {
            self.front.copy_rect_from(&self.back, rect)?;
            self.affected = Some(match self.affected {
                Some(a) => a.union(&rect),
                None => rect,
            });
        }
        Ok(())
    }

    fn finish(self) -> DispatchOutcome {
        DispatchOutcome {
            buffer: self.front,
            affected: self.affected,
        }
    }
}

/// Renders a tool application without touching any state.
///
/// Fails with [`EditError::InvalidState`] for an empty region list and
/// [`EditError::InvalidRegion`] for a malformed region. Regions that miss
/// the raster produce an outcome with `affected == None`.
pub fn render(
    canonical: &RasterBuffer,
    mode: &EditMode,
    regions: &[EditRegion],
    settings: &ToolSettings,
) -> EditResult<DispatchOutcome> {
    if regions.is_empty() {
        return Err(EditError::InvalidState("no regions to apply".into()));
    }
    for region in regions {
        region.validate()?;
    }

    let (w, h) = (canonical.width(), canonical.height());
    let mut passes: Vec<EditRegion> = Vec::with_capacity(regions.len() * 2);
    for region in regions {
        passes.push(region.clone());
        if settings.symmetry_enabled {
            passes.push(region.mirrored(w));
        }
    }
    debug!(mode = mode.name(), regions = regions.len(), passes = passes.len(), "dispatch");

    let mut pp = PingPong::new(canonical);
    for region in &passes {
        apply_region(&mut pp, mode, region)?;
    }

    if mode.is_displacement() && pp.affected.is_some() {
        feather_pass(&mut pp, &passes, w, h)?;
    }

    Ok(pp.finish())
}

fn dab(region: &EditRegion, center: Point2D) -> Dab {
    Dab::new(center, region.brush_size, region.strength(), region.feather)
}

/// Displacement of one warp segment `a → b`: `unit(b-a)·0.5·scale`, with
/// the x or y component doubled for axis-biased tools. `None` when the
/// segment has no direction.
pub fn warp_vector(a: Point2D, b: Point2D, scale: f64, axis: WarpAxis) -> Option<Point2D> {
    let mut v = (b - a).normalized()? * (0.5 * scale);
    match axis {
        WarpAxis::Horizontal => v.x *= 2.0,
        WarpAxis::Vertical => v.y *= 2.0,
        WarpAxis::Free => {}
    }
    Some(v)
}

/// Dab centres and vectors of a curve stroke.
///
/// Each control segment is split into [`CURVE_RESOLUTION`] path steps that
/// share one warp segment's budget, so the steps of a straight segment add
/// up to the warp vector over it.
fn curve_pushes(points: &[Point2D], brush_size: f64) -> Vec<(Point2D, Point2D)> {
    let scale = brush_size / CURVE_RESOLUTION as f64;
    catmull_rom(points, CURVE_RESOLUTION)
        .windows(2)
        .filter_map(|pair| Some((pair[0], warp_vector(pair[0], pair[1], scale, WarpAxis::Free)?)))
        .collect()
}

fn apply_region(pp: &mut PingPong, mode: &EditMode, region: &EditRegion) -> EditResult<()> {
    let points = &region.points;
    match *mode {
        EditMode::Pinch { direction } => {
            let enlarge = direction == PinchDirection::Enlarge;
            for &p in points {
                pp.step(|s, d| brush::pinch(s, d, &dab(region, p), enlarge))?;
            }
        }
        EditMode::Sculpt { direction } => {
            let lift = direction == SculptDirection::Lift;
            for &p in points {
                pp.step(|s, d| brush::sculpt(s, d, &dab(region, p), lift))?;
            }
        }
        EditMode::Warp { axis } => {
            let (start, end) = (points[0], points[points.len() - 1]);
            // Zero-length strokes have no direction and move nothing
            if let Some(v) = warp_vector(start, end, region.brush_size, axis) {
                pp.step(|s, d| brush::push(s, d, &dab(region, start), v))?;
            }
        }
        EditMode::Drag => {
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                pp.step(|s, d| brush::push(s, d, &dab(region, a), b - a))?;
            }
        }
        EditMode::Curve => {
            for (a, v) in curve_pushes(points, region.brush_size) {
                pp.step(|s, d| brush::push(s, d, &dab(region, a), v))?;
            }
        }
        EditMode::Brush { tone } => {
            for &p in points {
                pp.step(|s, d| brush::tone(s, d, &dab(region, p), tone))?;
            }
        }
        EditMode::Smooth => {
            for &p in points {
                pp.step(|s, d| brush::smooth(s, d, &dab(region, p)))?;
            }
        }
        EditMode::Mirror => {
            if region.intensity <= 0.0 {
                return Ok(());
            }
            let (w, h) = (pp.front.width(), pp.front.height());
            if let Some(rect) = region.bounds(w, h) {
                pp.step(|s, d| mirror_rect(s, d, rect))?;
            }
        }
    }
    Ok(())
}

/// Softens the edges of displacement edits with a Gaussian blur over the
/// boxes of feathered, non-zero regions.
fn feather_pass(pp: &mut PingPong, regions: &[EditRegion], w: u32, h: u32) -> EditResult<()> {
    let mut rect: Option<Rect> = None;
    let mut feather: f64 = 0.0;
    for region in regions.iter().filter(|r| r.intensity > 0.0 && r.feather > 0.0) {
        if let Some(b) = region.bounds(w, h) {
            rect = Some(rect.map_or(b, |r| r.union(&b)));
            feather = feather.max(region.feather);
        }
    }
    let Some(rect) = rect else {
        return Ok(());
    };

    let radius = (FEATHER_BLUR_RADIUS * feather / 100.0).max(0.5);
    trace!(radius, rect = %rect, "feather pass");
    pp.step(|s, d| {
        gaussian_blur_rect(s, d, radius, rect)?;
        Ok(Some(rect))
    })
}
