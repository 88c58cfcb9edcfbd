//! Layout for richtext: measure, wrap, align
//!
//! Styled segments go in, positioned units come out:
//!
//! 1. [`build_lines`] measures every unit with a [`TextMeasurer`] and, in
//!    wrap mode, splits segments into words and packs them greedily
//! 2. [`place_block`] stacks the lines under the anchor and gives every unit
//!    its left/baseline position
//!
//! Coordinates are in caller space with y pointing up.

pub mod block;
pub mod measure;
pub mod wrap;

use kurbo::Point;
use richtext_core::{Canvas, RenderOptions};

pub use block::{
    block_top, build_lines, line_start, place_block, BlockLayout, Line, MeasuredUnit, PlacedLine,
    PlacedUnit, Segment,
};
pub use measure::{ScratchText, TextMeasurer, TextMetrics, BLANK_HEIGHT_TEXT};
pub use wrap::{pack_greedy, tokenize};

/// Both steps in one call
pub fn layout(
    canvas: &mut dyn Canvas,
    measurer: &TextMeasurer<'_>,
    segments: &[Segment],
    anchor: Point,
    options: &RenderOptions,
) -> BlockLayout {
    let lines = build_lines(canvas, measurer, segments, options.box_width);
    place_block(lines, anchor, options)
}
