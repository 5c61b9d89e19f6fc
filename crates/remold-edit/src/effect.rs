//! Whole-image effects applied through the engine.
//!
//! Effects are parameterised kernels that are not stroke based. They are
//! committed to history like tools, under the tool id `effect:<name>`.
//!
//! ```rust
//! use remold_edit::Effect;
//!
//! let json = r#"{"effect": "twist", "center": {"x": 50, "y": 50}, "radius": 40, "angle": 90}"#;
//! let effect: Effect = serde_json::from_str(json).unwrap();
//! assert_eq!(effect.tool_id(), "effect:twist");
//! ```

use remold_core::{Point2D, RasterBuffer};
use remold_ops::mesh::{mesh_warp, MeshGrid, DEFAULT_DIVISIONS};
use remold_ops::perspective::perspective_warp;
use remold_ops::warp;
use serde::{Deserialize, Serialize};

use crate::EditResult;

fn default_divisions() -> usize {
    DEFAULT_DIVISIONS
}

/// One control-point edit of a mesh effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MeshEdit {
    /// Places control point `(row, col)` at `to`.
    Move {
        /// Lattice row.
        row: usize,
        /// Lattice column.
        col: usize,
        /// New position in pixels.
        to: Point2D,
    },
    /// Drags nearby control points by `to - from` with falloff over `radius`.
    Drag {
        /// Grab position.
        from: Point2D,
        /// Release position.
        to: Point2D,
        /// Influence radius in pixels.
        radius: f64,
    },
}

/// A whole-image deformation.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum Effect {
    /// Radial bulge (`strength > 0`) or pinch.
    Bulge { center: Point2D, radius: f64, strength: f64 },
    /// Swirl; `angle` in degrees at the centre.
    Twist { center: Point2D, radius: f64, angle: f64 },
    /// Concentric ripple.
    Ripple {
        center: Point2D,
        amplitude: f64,
        frequency: f64,
        #[serde(default)]
        phase: f64,
    },
    /// Fisheye inside a disk.
    Fisheye { center: Point2D, radius: f64, strength: f64 },
    /// Lens barrel distortion.
    Barrel {
        k1: f64,
        #[serde(default)]
        k2: f64,
    },
    /// Lens pincushion distortion.
    Pincushion {
        k1: f64,
        #[serde(default)]
        k2: f64,
    },
    /// Control-grid warp.
    Mesh {
        #[serde(default = "default_divisions")]
        rows: usize,
        #[serde(default = "default_divisions")]
        cols: usize,
        edits: Vec<MeshEdit>,
    },
    /// Maps the image corners onto a quad (TL, TR, BR, BL).
    Perspective { corners: [Point2D; 4] },
}

impl Effect {
    /// Kebab-case effect name.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Bulge { .. } => "bulge",
            Effect::Twist { .. } => "twist",
            Effect::Ripple { .. } => "ripple",
            Effect::Fisheye { .. } => "fisheye",
            Effect::Barrel { .. } => "barrel",
            Effect::Pincushion { .. } => "pincushion",
            Effect::Mesh { .. } => "mesh",
            Effect::Perspective { .. } => "perspective",
        }
    }

    /// Id recorded in history.
    pub fn tool_id(&self) -> String {
        format!("effect:{}", self.name())
    }

    /// Renders the effect into a new buffer.
    pub fn render(&self, src: &RasterBuffer) -> EditResult<RasterBuffer> {
        let out = match *self {
            Effect::Bulge { center, radius, strength } => warp::bulge(src, center, radius, strength)?,
            Effect::Twist { center, radius, angle } => warp::twist(src, center, radius, angle)?,
            Effect::Ripple { center, amplitude, frequency, phase } => {
                warp::ripple(src, center, amplitude, frequency, phase)?
            }
            Effect::Fisheye { center, radius, strength } => warp::fisheye(src, center, radius, strength)?,
            Effect::Barrel { k1, k2 } => warp::barrel(src, k1, k2)?,
            Effect::Pincushion { k1, k2 } => warp::pincushion(src, k1, k2)?,
            Effect::Mesh { rows, cols, ref edits } => {
                let mut grid = MeshGrid::new(src.width(), src.height(), rows, cols)?;
                for edit in edits {
                    match *edit {
                        MeshEdit::Move { row, col, to } => grid.move_point(row, col, to)?,
                        MeshEdit::Drag { from, to, radius } => {
                            grid.drag(from, to, radius);
                        }
                    }
                }
                mesh_warp(src, &grid)?
            }
            Effect::Perspective { corners } => perspective_warp(src, corners)?,
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditError;

    fn checker() -> RasterBuffer {
        let mut buf = RasterBuffer::new(40, 40).unwrap();
        for y in 0..40 {
            for x in 0..40 {
                let v = if (x / 5 + y / 5) % 2 == 0 { 250 } else { 10 };
                buf.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        buf
    }

    #[test]
    fn test_parse_defaults() {
        let e: Effect = serde_json::from_str(r#"{"effect": "barrel", "k1": 0.2}"#).unwrap();
        assert_eq!(e, Effect::Barrel { k1: 0.2, k2: 0.0 });

        let e: Effect = serde_json::from_str(
            r#"{"effect": "mesh", "edits": [{"kind": "move", "row": 1, "col": 1, "to": {"x": 5, "y": 6}}]}"#,
        )
        .unwrap();
        match e {
            Effect::Mesh { rows, cols, edits } => {
                assert_eq!((rows, cols), (10, 10));
                assert_eq!(edits.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_render_changes_pixels() {
        let src = checker();
        let c = Point2D::new(20.0, 20.0);
        let effects = [
            Effect::Bulge { center: c, radius: 15.0, strength: 0.8 },
            Effect::Twist { center: c, radius: 15.0, angle: 90.0 },
            Effect::Ripple { center: c, amplitude: 2.0, frequency: 0.5, phase: 0.0 },
            Effect::Fisheye { center: c, radius: 15.0, strength: 1.5 },
            Effect::Barrel { k1: 0.3, k2: 0.0 },
            Effect::Pincushion { k1: 0.3, k2: 0.0 },
            Effect::Mesh {
                rows: 4,
                cols: 4,
                edits: vec![MeshEdit::Drag { from: c, to: Point2D::new(24.0, 22.0), radius: 12.0 }],
            },
        ];
        for e in effects {
            let out = e.render(&src).unwrap();
            assert!(out != src, "{} was a no-op", e.name());
        }
    }

    #[test]
    fn test_degenerate_perspective_rejected() {
        let e = Effect::Perspective { corners: [Point2D::new(1.0, 1.0); 4] };
        assert!(matches!(e.render(&checker()), Err(EditError::Ops(_))));
    }

    #[test]
    fn test_bad_mesh_point_rejected() {
        let e = Effect::Mesh {
            rows: 2,
            cols: 2,
            edits: vec![MeshEdit::Move { row: 9, col: 0, to: Point2D::ZERO }],
        };
        assert!(e.render(&checker()).is_err());
    }
}
