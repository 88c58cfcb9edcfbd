//! richtext - Multi-styled text blocks on any canvas
//!
//! Give it a list of strings and per-string properties (color, size,
//! weight, family, style, alpha, background, underline), and it draws them
//! as one block: seamlessly joined, or word-wrapped into a box, aligned
//! around an anchor point.
//!
//! The work happens in five steps, each in its own crate:
//!
//! 1. **Resolve** - [`richtext_style`] merges scalars, lists, index
//!    mappings and style bundles into one style per string
//! 2. **Shape** - [`richtext_shape`] runs complex scripts through harfrust
//! 3. **Measure** - [`richtext_layout`] asks the shaper or the canvas how big
//!    each word is
//! 4. **Lay out** - [`richtext_layout`] packs words into lines and aligns them
//! 5. **Draw** - [`richtext_render`] turns the layout into canvas primitives
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use richtext::prelude::*;
//!
//! let engine = RichText::builder()
//!     .shaper(Arc::new(NullShaper::new()))
//!     .font_resolver(Arc::new(SystemFontResolver::new()))
//!     .build();
//! let mut canvas = RecordingCanvas::new();
//!
//! let block = TextBlock::new(0.5, 0.5, ["hello", ", ", "world"])
//!     .colors(PropertySpec::list(["red", "blue", "green"]));
//! let handles = engine.render(&mut canvas, &block)?;
//! assert_eq!(handles.len(), 3);
//! # Ok::<(), richtext::RichTextError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `shaping-hr` (default): harfrust shaping for complex scripts; without it
//!   every string is measured and drawn by the canvas

mod engine;
mod request;

pub use engine::{RichText, RichTextBuilder};
pub use request::TextBlock;

pub use richtext_core::{error, traits, types, Result, RichTextError};
pub use richtext_fontdb as fontdb;
pub use richtext_layout as layout;
pub use richtext_render as render;
pub use richtext_shape as shape;
pub use richtext_style as style;

/// Common imports for typical usage
pub mod prelude {
    pub use richtext_core::{
        types::{ArtifactId, FontSource},
        Canvas, Color, FontResolver, HorizontalAlign, IndexKey, PropertySpec, RenderOptions,
        Result, RichTextError, Shaper, StyleBundles, StyleDefaults, TextStyle, Value,
        VerticalAlign,
    };
    pub use richtext_fontdb::SystemFontResolver;
    pub use richtext_render::{DrawHandle, RecordingCanvas};
    pub use richtext_shape::{ComplexScripts, NullShaper};

    pub use crate::{RichText, RichTextBuilder, TextBlock};
}
