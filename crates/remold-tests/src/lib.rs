//! Integration tests for remold crates.
//!
//! End-to-end scenarios that drive the engine the way a front end would:
//! load a raster, apply tools, undo and redo, export.

#[cfg(test)]
mod properties;

#[cfg(test)]
mod tests {
    use remold_core::{Point2D, RasterBuffer};
    use remold_edit::{EditEngine, EditRegion, Effect, EngineConfig, SessionId, ToolSettings};
    use remold_io::{decode_png, ExportOptions, Resolution, Watermark, WatermarkPosition};

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn settings(intensity: f64, brush_size: f64, feather: f64) -> ToolSettings {
        ToolSettings {
            intensity,
            brush_size,
            feather,
            ..Default::default()
        }
    }

    fn stroke(points: &[(f64, f64)], s: &ToolSettings) -> Vec<EditRegion> {
        let points = points.iter().map(|&(x, y)| Point2D::new(x, y)).collect();
        vec![EditRegion::from_settings("stroke", points, s)]
    }

    /// Diagonal bands plus a radial alpha ramp, so every kernel has
    /// something to move.
    fn textured(w: u32, h: u32) -> RasterBuffer {
        let mut buf = RasterBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let band = ((x + 2 * y) / 6 % 2) as u8;
                let r = 40 + band * 170;
                let g = (x * 255 / w.max(1)) as u8;
                let b = (y * 255 / h.max(1)) as u8;
                buf.set_pixel(x, y, [r, g, b, 255 - (x % 16) as u8]);
            }
        }
        buf
    }

    fn textured_session(engine: &mut EditEngine, w: u32, h: u32) -> SessionId {
        engine.create_session_from_buffer(textured(w, h))
    }

    /// Solid red 100x100, pinch-enlarge at (50,50), radius 30, intensity 50,
    /// feather 0.
    #[test]
    fn test_pinch_scenario() {
        let mut engine = EditEngine::default();
        let id = engine.create_session(RED.repeat(100 * 100), 100, 100).unwrap();

        let s = settings(50.0, 30.0, 0.0);
        let result = engine.apply_tool(id, "eye-enlarge", stroke(&[(50.0, 50.0)], &s), s).unwrap();
        assert!(result.committed);

        let buf = engine.canonical_buffer(id).unwrap();
        let center = Point2D::new(50.0, 50.0);
        for y in 0..100 {
            for x in 0..100 {
                if Point2D::new(x as f64, y as f64).distance(center) >= 30.0 {
                    assert_eq!(buf.pixel(x, y), RED, "({x}, {y}) changed");
                }
            }
        }

        let history = engine.history(id).unwrap();
        assert_eq!(history.operations().len(), 1);
        assert_eq!(history.current_index(), 0);
    }

    #[test]
    fn test_branch_discard_scenario() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 80, 80);
        let s = settings(60.0, 12.0, 0.0);

        for (tool, at) in [("eye-enlarge", 20.0), ("face-slim", 40.0), ("brighten", 60.0)] {
            engine.apply_tool(id, tool, stroke(&[(at, at)], &s), s.clone()).unwrap();
        }
        let third = engine.history(id).unwrap().operations()[2].id;

        assert!(engine.undo(id).unwrap());
        engine.apply_tool(id, "darken", stroke(&[(30.0, 50.0)], &s), s.clone()).unwrap();

        let history = engine.history(id).unwrap();
        assert_eq!(history.operations().len(), 3);
        assert_eq!(history.current_index(), 2);
        assert!(history.operations().iter().all(|op| op.id != third));
        assert_eq!(history.operations()[2].tool_id, "darken");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 96, 72);
        let s = settings(70.0, 16.0, 25.0);

        let steps: [(&str, &[(f64, f64)]); 6] = [
            ("eye-enlarge", &[(30.0, 30.0)]),
            ("height-increase", &[(50.0, 40.0), (52.0, 20.0)]),
            ("cheek-lift", &[(70.0, 50.0)]),
            ("contour-curve", &[(10.0, 60.0), (30.0, 55.0), (50.0, 62.0), (70.0, 58.0)]),
            ("skin-smooth", &[(48.0, 36.0)]),
            ("liquify-drag", &[(20.0, 20.0), (26.0, 24.0), (34.0, 25.0)]),
        ];
        for (tool, points) in steps {
            let res = engine.apply_tool(id, tool, stroke(points, &s), s.clone()).unwrap();
            assert!(res.committed, "{tool}");
        }
        engine
            .apply_effect(id, &Effect::Ripple { center: Point2D::new(48.0, 36.0), amplitude: 1.5, frequency: 0.4, phase: 0.0 })
            .unwrap();

        let n = engine.history(id).unwrap().len();
        assert_eq!(n, steps.len() + 1);
        let final_state = engine.canonical_buffer(id).unwrap().clone();
        let original = engine.original_buffer(id).unwrap().clone();
        assert!(final_state != original);

        for _ in 0..n {
            assert!(engine.undo(id).unwrap());
        }
        assert!(!engine.undo(id).unwrap());
        assert!(*engine.canonical_buffer(id).unwrap() == original);

        for _ in 0..n {
            assert!(engine.redo(id).unwrap());
        }
        assert!(!engine.redo(id).unwrap());
        assert!(*engine.canonical_buffer(id).unwrap() == final_state);
    }

    #[test]
    fn test_mirror_symmetry() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 90, 60);
        let s = settings(100.0, 10.0, 0.0);
        let regions = stroke(&[(30.0, 30.0), (50.0, 28.0)], &s);
        let rect = regions[0].bounds(90, 60).unwrap();

        engine.apply_tool(id, "mirror", regions, s).unwrap();
        let buf = engine.canonical_buffer(id).unwrap();

        // Centre line of the box: x0 + x1 - 1 = 2·cx
        let two_cx = rect.x + rect.right() - 1;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.x + rect.width / 2 {
                assert_eq!(buf.pixel(x, y), buf.pixel(two_cx - x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_4k_export_with_watermark() {
        let mut engine = EditEngine::default();
        let id = engine.create_session(RED.repeat(100 * 100), 100, 100).unwrap();

        let options = ExportOptions {
            resolution: Resolution::UltraHd,
            watermark: Some(Watermark {
                text: "REMOLD".into(),
                position: WatermarkPosition::TopLeft,
                opacity: 0.5,
            }),
            ..Default::default()
        };
        let image = engine.export_image(id, &options).unwrap();
        assert_eq!((image.width, image.height), (3840, 3840));

        let decoded = decode_png(&image.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3840, 3840));

        let plain = remold_io::export::render(
            engine.canonical_buffer(id).unwrap(),
            &ExportOptions { resolution: Resolution::UltraHd, ..Default::default() },
        )
        .unwrap();

        // Watermark pixels differ from the plain surface, only near the top-left
        let mut changed = 0u64;
        for y in 0..3840 {
            for x in 0..3840 {
                if decoded.pixel(x, y) != plain.pixel(x, y) {
                    changed += 1;
                    assert!(x < 1920 && y < 1920, "watermark pixel at ({x}, {y})");
                }
            }
        }
        assert!(changed > 0);

        // The session is untouched
        assert!(engine.canonical_buffer(id).unwrap() == engine.original_buffer(id).unwrap());
    }

    #[test]
    fn test_zero_intensity_every_tool() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 64, 64);
        let s = ToolSettings {
            symmetry_enabled: true,
            ..settings(0.0, 20.0, 80.0)
        };
        let tools: Vec<String> = engine.catalog().iter().map(|t| t.id.clone()).collect();
        for tool in tools {
            let regions = stroke(&[(20.0, 20.0), (30.0, 26.0), (44.0, 30.0)], &s);
            engine.apply_tool(id, &tool, regions, s.clone()).unwrap();
            assert!(
                engine.canonical_buffer(id).unwrap() == engine.original_buffer(id).unwrap(),
                "{tool} changed pixels at intensity 0"
            );
        }
    }

    #[test]
    fn test_out_of_bounds_every_tool() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 40, 40);
        let s = settings(100.0, 8.0, 30.0);
        let tools: Vec<String> = engine.catalog().iter().map(|t| t.id.clone()).collect();
        for tool in tools {
            let regions = stroke(&[(-200.0, 500.0), (-180.0, 520.0)], &s);
            let res = engine.apply_tool(id, &tool, regions, s.clone()).unwrap();
            assert!(!res.committed, "{tool}");
            assert_eq!(res.affected_pixels, 0);
        }
        assert!(engine.history(id).unwrap().is_empty());
    }

    #[test]
    fn test_history_cap_from_config() {
        let config = EngineConfig::from_yaml_str("max_history: 3\n").unwrap();
        let mut engine = EditEngine::new(config);
        let id = textured_session(&mut engine, 64, 64);
        let s = engine.settings_for("brighten").unwrap();
        for i in 0..6 {
            let at = 8.0 + i as f64 * 8.0;
            engine.apply_tool(id, "brighten", stroke(&[(at, 32.0)], &s), s.clone()).unwrap();
        }
        let history = engine.history(id).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), 2);
        assert_eq!(history.operations()[0].id, 4);

        // Oldest reachable state is the one before op 4, not the baseline
        let oldest = history.operations()[0].before.to_buffer().unwrap();
        for _ in 0..3 {
            engine.undo(id).unwrap();
        }
        assert!(*engine.canonical_buffer(id).unwrap() == oldest);
        assert!(engine.canonical_buffer(id).unwrap() != engine.original_buffer(id).unwrap());
    }

    #[test]
    fn test_reset_then_undo() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 48, 48);
        let s = settings(80.0, 14.0, 0.0);
        engine.apply_tool(id, "nose-shrink", stroke(&[(24.0, 24.0)], &s), s).unwrap();
        let edited = engine.canonical_buffer(id).unwrap().clone();

        assert!(engine.reset_to_original(id).unwrap().committed);
        assert!(engine.canonical_buffer(id).unwrap() == engine.original_buffer(id).unwrap());
        assert!(engine.undo(id).unwrap());
        assert!(*engine.canonical_buffer(id).unwrap() == edited);
    }

    #[test]
    fn test_png_export_matches_canonical() {
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 50, 30);
        engine
            .apply_effect(id, &Effect::Bulge { center: Point2D::new(25.0, 15.0), radius: 12.0, strength: 0.6 })
            .unwrap();
        let image = engine.export_image(id, &ExportOptions::default()).unwrap();
        let decoded = decode_png(&image.bytes).unwrap();
        assert!(decoded == *engine.canonical_buffer(id).unwrap());
    }

    #[test]
    fn test_regions_from_json() {
        let json = r#"[
            {"id": "left", "points": [{"x": 20, "y": 20}], "intensity": 50, "brush_size": 10},
            {"id": "right", "points": [{"x": 44, "y": 20}], "intensity": 50, "brush_size": 10, "feather": 40}
        ]"#;
        let regions: Vec<EditRegion> = serde_json::from_str(json).unwrap();
        let mut engine = EditEngine::default();
        let id = textured_session(&mut engine, 64, 40);
        let s = engine.settings_for("eye-enlarge").unwrap();
        let res = engine.apply_tool(id, "eye-enlarge", regions, s).unwrap();
        let rect = res.affected.unwrap();
        assert!(rect.contains(20, 20) && rect.contains(44, 20));
        assert_eq!(engine.history(id).unwrap().current().unwrap().regions.len(), 2);
    }
}
