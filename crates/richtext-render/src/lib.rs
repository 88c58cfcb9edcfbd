//! Drawing laid-out blocks
//!
//! [`RendererAdapter`] turns a [`BlockLayout`] into canvas artifacts: one
//! native text primitive per unit, or one filled path per glyph when the
//! unit was shaped, plus an underline where the style asks for one. Every
//! drawn unit comes back as a [`DrawHandle`], in layout order.

// this_file: crates/richtext-render/src/lib.rs

pub mod recording;

use std::sync::Arc;

use kurbo::{Affine, Point, Rect, Shape};
use serde::Serialize;

use richtext_core::{
    types::{ArtifactId, LinePrimitive, PathPrimitive, ShapedRun, TextPrimitive},
    Canvas, RenderOptions, TextStyle,
};
use richtext_layout::{BlockLayout, PlacedUnit, ScratchText};

pub use recording::{Recorded, RecordingCanvas, RecordingOutput, RECORDING_SCHEMA_VERSION};

/// Underlines are always one point wide
pub const UNDERLINE_WIDTH: f64 = 1.0;

/// What was drawn for one unit
#[derive(Debug, Clone, Serialize)]
pub struct DrawHandle {
    pub text: String,
    /// Index of the input segment this unit came from
    pub segment: usize,
    pub style: TextStyle,
    /// Left edge, caller space
    pub x: f64,
    pub baseline_y: f64,
    pub width: f64,
    pub shaped: bool,
    /// The text primitive, or one path per glyph when shaped
    pub artifacts: Vec<ArtifactId>,
    pub underline: Option<ArtifactId>,
}

/// Draws blocks through a [`Canvas`]
#[derive(Debug, Clone)]
pub struct RendererAdapter {
    /// Caller space to device pixels
    transform: Affine,
    zorder: i32,
    /// Degrees, counter-clockwise about the block anchor
    rotation: f64,
}

impl RendererAdapter {
    pub fn new(transform: Affine, options: &RenderOptions) -> Self {
        Self {
            transform,
            zorder: options.zorder,
            rotation: options.rotation,
        }
    }

    pub fn draw_block(&self, canvas: &mut dyn Canvas, block: &BlockLayout) -> Vec<DrawHandle> {
        let anchor_dev = self.transform * block.anchor;
        let handles: Vec<DrawHandle> = block
            .units()
            .map(|unit| self.draw_unit(canvas, unit, anchor_dev))
            .collect();
        log::debug!(
            "Drew {} units ({} shaped) on {}",
            handles.len(),
            handles.iter().filter(|h| h.shaped).count(),
            canvas.name()
        );
        handles
    }

    fn draw_unit(&self, canvas: &mut dyn Canvas, placed: &PlacedUnit, anchor_dev: Point) -> DrawHandle {
        let unit = &placed.unit;
        let origin = Point::new(placed.x, placed.baseline_y);

        let (artifacts, bottom) = match &unit.metrics.shaped {
            Some(run) => self.draw_glyphs(canvas, run, &unit.style, origin, anchor_dev),
            None => self.draw_native(canvas, &unit.text, &unit.style, origin, anchor_dev),
        };

        let underline = unit.style.underline.then(|| {
            let y = bottom.unwrap_or_else(|| {
                log::warn!("No bounds for {:?}, underlining at the baseline", unit.text);
                placed.baseline_y
            });
            let from = self.rotated(Point::new(placed.x, y), anchor_dev);
            let to = self.rotated(Point::new(placed.x + unit.metrics.width, y), anchor_dev);
            canvas.draw_line(&LinePrimitive {
                from,
                to,
                transform: self.transform,
                color: unit.style.base_color(),
                linewidth: UNDERLINE_WIDTH,
                zorder: self.zorder,
            })
        });

        DrawHandle {
            text: unit.text.clone(),
            segment: unit.segment,
            style: unit.style.clone(),
            x: placed.x,
            baseline_y: placed.baseline_y,
            width: unit.metrics.width,
            shaped: unit.metrics.is_shaped(),
            artifacts,
            underline,
        }
    }

    /// Native text; returns the artifact and the caller-space bottom of its
    /// unrotated bounds
    fn draw_native(
        &self,
        canvas: &mut dyn Canvas,
        text: &str,
        style: &TextStyle,
        origin: Point,
        anchor_dev: Point,
    ) -> (Vec<ArtifactId>, Option<f64>) {
        let id = canvas.draw_text(&TextPrimitive {
            text: text.to_string(),
            position: self.rotated(origin, anchor_dev),
            transform: self.transform,
            style: style.clone(),
            rotation: self.rotation,
            zorder: self.zorder,
            visible: true,
        });

        if !style.underline {
            return (vec![id], None);
        }

        let device = if self.rotation == 0.0 {
            canvas.extent(id)
        } else {
            // Rotated bounds say nothing about the baseline, measure upright
            let scratch = ScratchText::draw(canvas, text, style, self.transform);
            let shift = (self.transform * origin) - (self.transform * Point::ZERO);
            scratch.extent().map(|r| r + shift)
        };
        let bottom = device.map(|r| self.transform.inverse().transform_rect_bbox(r).y0);
        (vec![id], bottom)
    }

    /// One path per glyph outline; returns the artifacts and the
    /// caller-space bottom of the glyphs' unrotated bounds
    fn draw_glyphs(
        &self,
        canvas: &mut dyn Canvas,
        run: &Arc<ShapedRun>,
        style: &TextStyle,
        origin: Point,
        anchor_dev: Point,
    ) -> (Vec<ArtifactId>, Option<f64>) {
        let px_per_unit = canvas.points_to_pixels(run.scale(style.fontsize));
        let segment = Affine::translate((self.transform * origin).to_vec2()) * Affine::scale(px_per_unit);
        let rotation = self.rotation_about(anchor_dev);
        let fill = style.rgba();

        let mut artifacts = Vec::with_capacity(run.glyphs.len());
        let mut bounds: Option<Rect> = None;

        for (glyph, glyph_origin) in run.positioned() {
            let Some(outline) = &glyph.outline else {
                continue;
            };
            let upright = segment * Affine::translate(glyph_origin.to_vec2());
            let glyph_bounds = upright.transform_rect_bbox(outline.bounding_box());
            bounds = Some(bounds.map_or(glyph_bounds, |b| b.union(glyph_bounds)));

            artifacts.push(canvas.draw_path(&PathPrimitive {
                path: Arc::clone(outline),
                transform: rotation * upright,
                fill,
                zorder: self.zorder,
            }));
        }

        let bottom = bounds.map(|r| self.transform.inverse().transform_rect_bbox(r).y0);
        (artifacts, bottom)
    }

    fn rotation_about(&self, anchor_dev: Point) -> Affine {
        if self.rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(self.rotation.to_radians(), anchor_dev)
        }
    }

    /// A caller-space point turned about the block anchor
    fn rotated(&self, p: Point, anchor_dev: Point) -> Point {
        if self.rotation == 0.0 {
            return p;
        }
        self.transform.inverse() * (self.rotation_about(anchor_dev) * (self.transform * p))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use richtext_core::{types::GlyphPlacement, Color, ResolvedStyle, StyleDefaults, Value};
    use richtext_layout::{place_block, Line, MeasuredUnit, TextMetrics};

    use super::*;

    fn style(underline: bool) -> TextStyle {
        let mut resolved = ResolvedStyle::new();
        resolved.set("color", Value::from("red"));
        resolved.set("underline", Value::from(underline));
        StyleDefaults::default().materialize(&resolved)
    }

    fn unit(text: &str, width: f64, shaped: Option<ShapedRun>, underline: bool) -> MeasuredUnit {
        MeasuredUnit {
            text: text.to_string(),
            segment: 0,
            style: style(underline),
            metrics: TextMetrics {
                width,
                ascent: 0.1,
                height: 0.15,
                shaped: shaped.map(Arc::new),
            },
        }
    }

    fn square_run() -> ShapedRun {
        let mut square = BezPath::new();
        square.move_to((0.0, -100.0));
        square.line_to((500.0, -100.0));
        square.line_to((500.0, 700.0));
        square.line_to((0.0, 700.0));
        square.close_path();
        let square = Arc::new(square);

        let glyph = |outline: Option<Arc<BezPath>>| GlyphPlacement {
            glyph_id: 1,
            outline,
            x_offset: 0.0,
            y_offset: 0.0,
            x_advance: 500.0,
        };
        ShapedRun {
            glyphs: vec![glyph(Some(Arc::clone(&square))), glyph(None), glyph(Some(square))],
            units_per_em: 1000,
        }
    }

    fn draw(units: Vec<MeasuredUnit>, rotation: f64) -> (RecordingCanvas, Vec<DrawHandle>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut canvas = RecordingCanvas::new().with_dpi(72.0);
        let options = RenderOptions {
            rotation,
            vertical_align: richtext_core::VerticalAlign::Top,
            ..Default::default()
        };
        let block = place_block(vec![Line { units }], Point::new(1.0, 1.0), &options);
        let adapter = RendererAdapter::new(canvas.data_transform(), &options);
        let handles = adapter.draw_block(&mut canvas, &block);
        (canvas, handles)
    }

    #[test]
    fn test_native_units_in_order() {
        let (canvas, handles) = draw(vec![unit("ab", 0.12, None, false), unit("cd", 0.12, None, false)], 0.0);

        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].x, 1.0);
        assert!((handles[1].x - 1.12).abs() < 1e-12);
        assert!(handles.iter().all(|h| !h.shaped && h.underline.is_none()));
        assert_eq!(canvas.visible().count(), 2);
        assert_eq!(canvas.text_draw_count(), 2);
    }

    #[test]
    fn test_native_underline_at_text_bottom() {
        let (canvas, handles) = draw(vec![unit("ab", 0.12, None, true)], 0.0);
        let line = handles[0].underline.and_then(|id| canvas.get(id)).unwrap();

        let Recorded::Line { from, to, color, .. } = line else {
            panic!("expected a line, got {line:?}");
        };
        // Baseline 0.9, descent 0.3 em of 10px at 100 px per unit
        assert!((from[1] - (handles[0].baseline_y - 0.03)).abs() < 1e-9);
        assert_eq!(from[1], to[1]);
        assert!((to[0] - from[0] - 0.12).abs() < 1e-9);
        assert_eq!(*color, style(true).rgba());
    }

    #[test]
    fn test_underline_ignores_fill_alpha() {
        let mut translucent = unit("ab", 0.12, Some(square_run()), true);
        translucent.style.alpha = Some(0.5);
        let (canvas, handles) = draw(vec![translucent], 0.0);
        let handle = &handles[0];

        let Some(Recorded::Path { fill, .. }) = canvas.get(handle.artifacts[0]) else {
            panic!("missing glyph path");
        };
        assert_eq!(fill.a, 128);

        let Some(Recorded::Line { color, .. }) = handle.underline.and_then(|id| canvas.get(id)) else {
            panic!("missing underline");
        };
        assert_eq!(Some(*color), Color::parse("red"));
    }

    #[test]
    fn test_shaped_unit_draws_glyph_paths() {
        let (canvas, handles) = draw(vec![unit("नम", 0.1, Some(square_run()), true)], 0.0);
        let handle = &handles[0];

        assert!(handle.shaped);
        // The blank middle glyph draws nothing
        assert_eq!(handle.artifacts.len(), 2);
        assert_eq!(canvas.text_draw_count(), 0);

        // 10pt at 72 dpi: 0.01 px per unit; second square starts at 1000 units
        let second = canvas.get(handle.artifacts[1]).unwrap().bounds();
        assert!((second.x0 - (100.0 + 10.0)).abs() < 1e-9);

        // Underline sits at the glyphs' bottom, 100 units below the baseline
        let Some(Recorded::Line { from, .. }) = handle.underline.and_then(|id| canvas.get(id)) else {
            panic!("missing underline");
        };
        assert!((from[1] - (handle.baseline_y - 0.01)).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_about_anchor() {
        let (canvas, handles) = draw(vec![unit("ab", 0.12, None, false), unit("cd", 0.12, None, false)], 90.0);

        let Some(Recorded::Text { position, rotation, .. }) = canvas.get(handles[1].artifacts[0]) else {
            panic!("missing text");
        };
        assert_eq!(*rotation, 90.0);
        // (1.12, 0.9) turned a quarter about (1, 1)
        assert!((position[0] - 1.1).abs() < 1e-9);
        assert!((position[1] - 1.12).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_underline_turns_with_the_text() {
        let (canvas, handles) = draw(vec![unit("ab", 0.12, None, true)], 90.0);
        let Some(Recorded::Line { from, to, .. }) = handles[0].underline.and_then(|id| canvas.get(id)) else {
            panic!("missing underline");
        };
        // (1.0, 0.87) and (1.12, 0.87) turned a quarter about (1, 1)
        assert!((from[0] - 1.13).abs() < 1e-9);
        assert!((from[1] - 1.0).abs() < 1e-9);
        assert!((to[0] - 1.13).abs() < 1e-9);
        assert!((to[1] - 1.12).abs() < 1e-9);
        // The upright measurement is gone again
        assert_eq!(canvas.len(), 2);
    }
}
