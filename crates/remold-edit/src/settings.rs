//! Tool settings and edit regions.
//!
//! A [`ToolSettings`] is the configuration captured when a tool is applied;
//! it is copied into the resulting operation. An [`EditRegion`] is one
//! pointer gesture: an ordered stroke plus its own intensity, brush size and
//! feather.
//!
//! ```rust
//! use remold_core::Point2D;
//! use remold_edit::{EditRegion, ToolSettings};
//!
//! let settings = ToolSettings::default();
//! let region = EditRegion::from_settings("stroke-1", vec![Point2D::new(10.0, 20.0)], &settings);
//! assert!(region.validate().is_ok());
//! ```

use remold_core::{Point2D, Rect};
use serde::{Deserialize, Serialize};

use crate::{EditError, EditResult};

fn default_intensity() -> f64 {
    50.0
}
fn default_brush_size() -> f64 {
    30.0
}
fn default_true() -> bool {
    true
}

/// Configuration snapshot of one tool application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Strength in percent, 0..=100.
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    /// Effect radius in pixels.
    #[serde(default = "default_brush_size")]
    pub brush_size: f64,
    /// Feathered share of the radius in percent, 0..=100.
    #[serde(default)]
    pub feather: f64,
    /// Also apply every region mirrored across the vertical centre line.
    #[serde(default)]
    pub symmetry_enabled: bool,
    /// Whether the front end previews while dragging. Recorded only.
    #[serde(default = "default_true")]
    pub real_time_preview: bool,
    /// History cap to use from this operation on. `None` keeps the session's cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo_levels: Option<usize>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            brush_size: default_brush_size(),
            feather: 0.0,
            symmetry_enabled: false,
            real_time_preview: true,
            undo_levels: None,
        }
    }
}

/// One continuous pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRegion {
    /// Caller-chosen identifier.
    pub id: String,
    /// Stroke points in pointer order.
    pub points: Vec<Point2D>,
    /// Strength in percent, 0..=100.
    pub intensity: f64,
    /// Effect radius in pixels, > 0.
    pub brush_size: f64,
    /// Feather in percent, 0..=100.
    #[serde(default)]
    pub feather: f64,
}

impl EditRegion {
    /// Region taking intensity, brush size and feather from `settings`.
    pub fn from_settings(id: impl Into<String>, points: Vec<Point2D>, settings: &ToolSettings) -> Self {
        Self {
            id: id.into(),
            points,
            intensity: settings.intensity,
            brush_size: settings.brush_size,
            feather: settings.feather,
        }
    }

    /// Checks the region can be dispatched.
    pub fn validate(&self) -> EditResult<()> {
        let fail = |what: String| Err(EditError::InvalidRegion(format!("region '{}': {what}", self.id)));

        if self.points.is_empty() {
            return fail("no points".into());
        }
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return fail(format!("non-finite point ({}, {})", p.x, p.y));
        }
        if !self.brush_size.is_finite() || self.brush_size <= 0.0 {
            return fail(format!("brush size must be > 0, got {}", self.brush_size));
        }
        if !(0.0..=100.0).contains(&self.intensity) {
            return fail(format!("intensity must be in 0..=100, got {}", self.intensity));
        }
        if !(0.0..=100.0).contains(&self.feather) {
            return fail(format!("feather must be in 0..=100, got {}", self.feather));
        }
        Ok(())
    }

    /// Intensity as a 0..1 factor.
    #[inline]
    pub fn strength(&self) -> f64 {
        self.intensity / 100.0
    }

    /// Copy reflected across the vertical centre line of a `width`-wide raster.
    pub fn mirrored(&self, width: u32) -> Self {
        let axis = (width as f64) - 1.0;
        Self {
            id: format!("{}:mirror", self.id),
            points: self.points.iter().map(|p| Point2D::new(axis - p.x, p.y)).collect(),
            ..self.clone()
        }
    }

    /// Pixel box of all points grown by the brush radius, clipped to the raster.
    pub fn bounds(&self, width: u32, height: u32) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &self.points[1..] {
            min = Point2D::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2D::new(max.x.max(p.x), max.y.max(p.y));
        }
        let r = self.brush_size;
        Rect::from_float_bounds(min.x - r, min.y - r, max.x + r, max.y + r, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(points: Vec<Point2D>) -> EditRegion {
        EditRegion {
            id: "r".into(),
            points,
            intensity: 40.0,
            brush_size: 10.0,
            feather: 0.0,
        }
    }

    #[test]
    fn test_validate() {
        assert!(region(vec![Point2D::new(1.0, 1.0)]).validate().is_ok());
        assert!(matches!(region(vec![]).validate(), Err(EditError::InvalidRegion(_))));
        assert!(region(vec![Point2D::new(f64::NAN, 1.0)]).validate().is_err());

        let mut r = region(vec![Point2D::new(1.0, 1.0)]);
        r.brush_size = 0.0;
        assert!(r.validate().is_err());
        r.brush_size = 5.0;
        r.intensity = 101.0;
        assert!(r.validate().is_err());
        r.intensity = f64::NAN;
        assert!(r.validate().is_err());
        r.intensity = 0.0;
        r.feather = -1.0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_mirrored() {
        let r = region(vec![Point2D::new(10.0, 5.0), Point2D::new(0.0, 7.0)]);
        let m = r.mirrored(100);
        assert_eq!(m.points, vec![Point2D::new(89.0, 5.0), Point2D::new(99.0, 7.0)]);
        assert_eq!(m.brush_size, r.brush_size);
        assert_eq!(m.id, "r:mirror");
    }

    #[test]
    fn test_bounds() {
        let r = region(vec![Point2D::new(20.0, 20.0), Point2D::new(30.0, 25.0)]);
        assert_eq!(r.bounds(100, 100), Some(Rect::new(10, 10, 31, 26)));
        let far = region(vec![Point2D::new(-500.0, -500.0)]);
        assert_eq!(far.bounds(100, 100), None);
    }

    #[test]
    fn test_settings_defaults_from_json() {
        let s: ToolSettings = serde_json::from_str(r#"{"intensity": 70, "symmetry_enabled": true}"#).unwrap();
        assert_eq!(s.intensity, 70.0);
        assert_eq!(s.brush_size, 30.0);
        assert!(s.symmetry_enabled);
        assert!(s.real_time_preview);
        assert_eq!(s.undo_levels, None);

        let s: ToolSettings = serde_json::from_str(r#"{"undo_levels": 5}"#).unwrap();
        assert_eq!(s.undo_levels, Some(5));
    }
}
