//! The contracts that bind richtext to its collaborators
//!
//! Three traits describe everything the engine needs from the outside:
//!
//! - [`Canvas`] - Where text is measured and drawn
//! - [`FontResolver`] - Turns a family name into a font file
//! - [`Shaper`] - Turns text plus a font into positioned glyph outlines

use kurbo::{Affine, Rect};

use crate::error::{CanvasError, Result};
use crate::style::TextStyle;
use crate::types::{
    ArtifactId, FaceMetrics, FontSource, LinePrimitive, PathPrimitive, ShapedRun, TextPrimitive,
};

/// The host drawing surface
///
/// Device space is pixels with y pointing up. Every primitive carries the
/// transform that maps its coordinates into device space. A canvas is used
/// from one thread for the whole of a render call.
///
/// ```ignore
/// struct Figure { /* ... */ }
///
/// impl Canvas for Figure {
///     fn has_renderer(&self) -> bool { true }
///     fn refresh(&mut self) -> Result<(), CanvasError> { Ok(()) }
///     fn data_transform(&self) -> Affine { Affine::scale(100.0) }
///     fn points_to_pixels(&self, points: f64) -> f64 { points * 100.0 / 72.0 }
///     // draw_text, draw_path, draw_line, extent, remove ...
/// }
/// ```
pub trait Canvas {
    /// Identify yourself in logs
    fn name(&self) -> &'static str {
        "canvas"
    }

    /// Whether a renderer is attached and extents can be queried
    fn has_renderer(&self) -> bool;

    /// Force one draw cycle so a renderer gets attached
    fn refresh(&mut self) -> std::result::Result<(), CanvasError>;

    /// Data space to device pixels
    fn data_transform(&self) -> Affine;

    /// Physical points to device pixels
    fn points_to_pixels(&self, points: f64) -> f64;

    /// Draw text anchored left/baseline at its position
    fn draw_text(&mut self, text: &TextPrimitive) -> ArtifactId;

    /// Fill a path
    fn draw_path(&mut self, path: &PathPrimitive) -> ArtifactId;

    /// Stroke a straight line
    fn draw_line(&mut self, line: &LinePrimitive) -> ArtifactId;

    /// Device-space bounding box of a drawn artifact
    fn extent(&self, id: ArtifactId) -> Option<Rect>;

    /// Take an artifact off the canvas
    fn remove(&mut self, id: ArtifactId);
}

/// Resolve a style's font family to a concrete font file
pub trait FontResolver: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Best matching face for the style's families, weight and slant
    fn resolve(&self, style: &TextStyle) -> Option<FontSource>;
}

/// Where characters learn their positions
///
/// Everything is reported in font design units; callers scale by
/// `size / units_per_em`. Errors are a signal to fall back to native
/// measurement, never a reason to abort.
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform characters into positioned glyph outlines
    fn shape(&self, font: &FontSource, text: &str, size: f64) -> Result<ShapedRun>;

    /// Vertical metrics of the face
    fn metrics(&self, font: &FontSource, size: f64) -> Result<FaceMetrics>;

    /// Flush any cached font data
    fn clear_cache(&self) {}
}
