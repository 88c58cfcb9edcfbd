//! Width, ascent and height of a piece of styled text
//!
//! Two paths, chosen per string:
//!
//! - **Shaped** - Complex-script text with a resolvable font goes through the
//!   [`Shaper`]; font units are converted to points, points to pixels and
//!   pixels to caller space
//! - **Native** - Everything else is drawn to an invisible scratch artifact
//!   whose extent is read back and converted to caller space
//!
//! Any failure on the shaped path quietly falls back to the native one.

use std::sync::Arc;

use kurbo::{Affine, Point, Rect};

use richtext_core::{
    types::{ArtifactId, ShapedRun, TextPrimitive},
    Canvas, FontLoadError, FontResolver, Result, RichTextError, Shaper, TextStyle,
};
use richtext_shape::ComplexScripts;

/// Stand-in text for measuring the height of blank strings
pub const BLANK_HEIGHT_TEXT: &str = "Hg";

/// Measurements in caller space
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    pub width: f64,
    /// Baseline to top
    pub ascent: f64,
    pub height: f64,
    /// The glyph run, when the text was shaped
    pub shaped: Option<Arc<ShapedRun>>,
}

impl TextMetrics {
    pub fn is_shaped(&self) -> bool {
        self.shaped.is_some()
    }
}

/// Invisible text drawn only to be measured, removed again when dropped
pub struct ScratchText<'c> {
    canvas: &'c mut dyn Canvas,
    id: ArtifactId,
}

impl<'c> ScratchText<'c> {
    pub fn draw(canvas: &'c mut dyn Canvas, text: &str, style: &TextStyle, transform: Affine) -> Self {
        let id = canvas.draw_text(&TextPrimitive {
            text: text.to_string(),
            position: Point::ZERO,
            transform,
            style: style.clone(),
            rotation: 0.0,
            zorder: 0,
            visible: false,
        });
        Self { canvas, id }
    }

    /// Device-space bounds, if the canvas can tell
    pub fn extent(&self) -> Option<Rect> {
        self.canvas.extent(self.id)
    }
}

impl Drop for ScratchText<'_> {
    fn drop(&mut self) {
        self.canvas.remove(self.id);
    }
}

/// Measures text for one render call
///
/// `transform` maps caller space to device pixels; all results are in
/// caller space.
pub struct TextMeasurer<'a> {
    shaper: &'a dyn Shaper,
    fonts: &'a dyn FontResolver,
    scripts: &'a ComplexScripts,
    transform: Affine,
}

impl<'a> TextMeasurer<'a> {
    pub fn new(
        shaper: &'a dyn Shaper,
        fonts: &'a dyn FontResolver,
        scripts: &'a ComplexScripts,
        transform: Affine,
    ) -> Self {
        Self {
            shaper,
            fonts,
            scripts,
            transform,
        }
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn measure(&self, canvas: &mut dyn Canvas, text: &str, style: &TextStyle) -> TextMetrics {
        if self.scripts.needs_shaping(text) {
            match self.measure_shaped(&*canvas, text, style) {
                Ok(metrics) => {
                    log::trace!("Shaped {text:?}: {metrics:?}");
                    return metrics;
                },
                Err(err) => {
                    log::debug!(
                        "Shaping {text:?} with {} failed, measuring natively: {err}",
                        self.shaper.name()
                    );
                },
            }
        }

        let metrics = self.measure_native(canvas, text, style);
        log::trace!("Measured {text:?} on {}: {metrics:?}", canvas.name());
        metrics
    }

    fn measure_shaped(&self, canvas: &dyn Canvas, text: &str, style: &TextStyle) -> Result<TextMetrics> {
        let font = self.fonts.resolve(style).ok_or_else(|| {
            log::warn!("No font for family {:?}, measuring natively", style.fontfamily);
            RichTextError::FontLoad(FontLoadError::NotResolved(style.fontfamily.clone()))
        })?;

        let size = style.fontsize;
        let run = self.shaper.shape(&font, text, size)?;
        let face = self.shaper.metrics(&font, size)?;

        let width_px = canvas.points_to_pixels(run.advance_units() * run.scale(size));
        let ascent_px = canvas.points_to_pixels(face.ascent_pt(size));
        let height_px = canvas.points_to_pixels(face.height_pt(size));

        Ok(TextMetrics {
            width: self.caller_width(width_px),
            ascent: self.caller_height(ascent_px),
            height: self.caller_height(height_px),
            shaped: Some(Arc::new(run)),
        })
    }

    fn measure_native(&self, canvas: &mut dyn Canvas, text: &str, style: &TextStyle) -> TextMetrics {
        let bounds = self.native_extent(canvas, text, style);
        let height = if text.trim().is_empty() {
            self.native_extent(canvas, BLANK_HEIGHT_TEXT, style).height()
        } else {
            bounds.height()
        };

        TextMetrics {
            width: bounds.width(),
            ascent: bounds.height(),
            height,
            shaped: None,
        }
    }

    /// Caller-space extent of `text` drawn at the origin
    fn native_extent(&self, canvas: &mut dyn Canvas, text: &str, style: &TextStyle) -> Rect {
        let scratch = ScratchText::draw(canvas, text, style, self.transform);
        match scratch.extent() {
            Some(device) => self.transform.inverse().transform_rect_bbox(device),
            None => {
                log::warn!("Canvas reported no extent for {text:?}, treating it as empty");
                Rect::ZERO
            },
        }
    }

    fn caller_width(&self, px: f64) -> f64 {
        self.transform
            .inverse()
            .transform_rect_bbox(Rect::new(0.0, 0.0, px, 0.0))
            .width()
    }

    fn caller_height(&self, px: f64) -> f64 {
        self.transform
            .inverse()
            .transform_rect_bbox(Rect::new(0.0, 0.0, 0.0, px))
            .height()
    }
}
