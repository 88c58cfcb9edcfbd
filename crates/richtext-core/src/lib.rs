//! Richtext Core: the shared vocabulary of the rich text engine
//!
//! A block of rich text is a list of strings, each with its own style. It
//! moves through four steps before it reaches a canvas:
//!
//! 1. **Property resolution** - Scalars, lists, index mappings and style
//!    bundles collapse into one [`ResolvedStyle`] per segment
//! 2. **Measurement** - Each word or segment gets a width, ascent and height,
//!    from a [`Shaper`] for complex scripts or from the [`Canvas`] otherwise
//! 3. **Layout** - Words pack into lines, lines stack into a block, and
//!    every unit gets a baseline position
//! 4. **Drawing** - Positioned units become canvas artifacts
//!
//! This crate holds the types that travel between those steps and the
//! traits the engine's collaborators implement:
//!
//! - [`Canvas`] - Where text is measured and drawn
//! - [`FontResolver`] - Where family names become font files
//! - [`Shaper`] - Where characters become glyph outlines

pub mod error;
pub mod options;
pub mod property;
pub mod style;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use error::{CanvasError, FontLoadError, Result, RichTextError};
pub use options::{HorizontalAlign, RenderOptions, VerticalAlign};
pub use property::{IndexKey, PropertySpec, StyleBundles, Value};
pub use style::{Color, ResolvedStyle, StyleDefaults, TextStyle};
pub use traits::{Canvas, FontResolver, Shaper};

/// The data structures that travel between the stages
pub mod types {
    use std::path::PathBuf;
    use std::sync::Arc;

    use kurbo::{Affine, BezPath, Point};
    use serde::Serialize;

    use crate::style::{Color, TextStyle};

    /// Glyph identifier within a font
    pub type GlyphId = u32;

    /// Handle to something drawn on a canvas
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    pub struct ArtifactId(pub u64);

    /// A concrete font face, as found by a [`crate::FontResolver`]
    #[derive(Debug, Clone)]
    pub enum FontSource {
        File { path: PathBuf, index: u32 },
        Memory { name: String, data: Arc<Vec<u8>>, index: u32 },
    }

    impl FontSource {
        pub fn file(path: impl Into<PathBuf>) -> Self {
            FontSource::File {
                path: path.into(),
                index: 0,
            }
        }

        /// Face index inside a collection (0 for single fonts)
        pub fn index(&self) -> u32 {
            match self {
                FontSource::File { index, .. } | FontSource::Memory { index, .. } => *index,
            }
        }

        /// Stable identity used to key per-font caches
        pub fn cache_key(&self) -> String {
            match self {
                FontSource::File { path, index } => format!("{}#{index}", path.display()),
                FontSource::Memory { name, index, .. } => format!("memory:{name}#{index}"),
            }
        }
    }

    /// One glyph out of the shaper, in font design units
    #[derive(Debug, Clone)]
    pub struct GlyphPlacement {
        pub glyph_id: GlyphId,
        /// Outline with y pointing up; `None` for blank glyphs such as spaces
        pub outline: Option<Arc<BezPath>>,
        pub x_offset: f64,
        pub y_offset: f64,
        pub x_advance: f64,
    }

    /// A shaped string: glyph placements plus the face's em size
    #[derive(Debug, Clone)]
    pub struct ShapedRun {
        pub glyphs: Vec<GlyphPlacement>,
        pub units_per_em: u16,
    }

    impl ShapedRun {
        /// Sum of x advances in font units
        pub fn advance_units(&self) -> f64 {
            self.glyphs.iter().map(|g| g.x_advance).sum()
        }

        /// Font units to points at `size` points
        pub fn scale(&self, size: f64) -> f64 {
            size / self.units_per_em.max(1) as f64
        }

        /// Glyphs with their origin relative to the start of the run
        pub fn positioned(&self) -> impl Iterator<Item = (&GlyphPlacement, Point)> {
            self.glyphs.iter().scan(0.0, |cursor, glyph| {
                let origin = Point::new(*cursor + glyph.x_offset, glyph.y_offset);
                *cursor += glyph.x_advance;
                Some((glyph, origin))
            })
        }
    }

    /// Vertical face metrics in font units
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct FaceMetrics {
        pub units_per_em: u16,
        /// hhea ascender, when the face has one
        pub ascent: Option<f64>,
        /// hhea descender (usually negative)
        pub descent: Option<f64>,
    }

    impl FaceMetrics {
        fn scale(&self, size: f64) -> f64 {
            size / self.units_per_em.max(1) as f64
        }

        /// Baseline to top, in points
        pub fn ascent_pt(&self, size: f64) -> f64 {
            match self.ascent {
                Some(ascent) => ascent * self.scale(size),
                None => size * 0.8,
            }
        }

        /// Ascent plus descent, in points
        pub fn height_pt(&self, size: f64) -> f64 {
            match (self.ascent, self.descent) {
                (Some(ascent), Some(descent)) => (ascent - descent) * self.scale(size),
                _ => size * 1.2,
            }
        }
    }

    /// Text drawn left/baseline anchored at `position`
    #[derive(Debug, Clone)]
    pub struct TextPrimitive {
        pub text: String,
        /// Caller space
        pub position: Point,
        pub transform: Affine,
        pub style: TextStyle,
        /// Degrees, counter-clockwise about `position`
        pub rotation: f64,
        pub zorder: i32,
        /// Scratch artifacts used for measurement are drawn invisible
        pub visible: bool,
    }

    /// A filled outline
    #[derive(Debug, Clone)]
    pub struct PathPrimitive {
        pub path: Arc<BezPath>,
        /// Path space to device pixels
        pub transform: Affine,
        pub fill: Color,
        pub zorder: i32,
    }

    /// A stroked straight line, used for underlines
    #[derive(Debug, Clone)]
    pub struct LinePrimitive {
        /// Caller space
        pub from: Point,
        pub to: Point,
        pub transform: Affine,
        pub color: Color,
        pub linewidth: f64,
        pub zorder: i32,
    }
}
