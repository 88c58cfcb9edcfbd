//! From styled segments to positioned units

// this_file: crates/richtext-layout/src/block.rs

use kurbo::Point;

use richtext_core::{Canvas, HorizontalAlign, RenderOptions, TextStyle, VerticalAlign};

use crate::measure::{TextMeasurer, TextMetrics};
use crate::wrap::{pack_greedy, tokenize};

/// One input string with its final style
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub style: TextStyle,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A word (wrap mode) or a whole segment (seamless mode), measured
#[derive(Debug, Clone)]
pub struct MeasuredUnit {
    pub text: String,
    /// Index of the segment this unit came from
    pub segment: usize,
    pub style: TextStyle,
    pub metrics: TextMetrics,
}

/// Units sharing one baseline
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub units: Vec<MeasuredUnit>,
}

impl Line {
    pub fn width(&self) -> f64 {
        self.units.iter().map(|u| u.metrics.width).sum()
    }

    pub fn max_ascent(&self) -> f64 {
        self.units
            .iter()
            .map(|u| u.metrics.ascent)
            .fold(0.0, f64::max)
    }

    pub fn max_height(&self) -> f64 {
        self.units
            .iter()
            .map(|u| u.metrics.height)
            .fold(0.0, f64::max)
    }
}

/// A unit with its left/baseline position in caller space
#[derive(Debug, Clone)]
pub struct PlacedUnit {
    pub unit: MeasuredUnit,
    pub x: f64,
    pub baseline_y: f64,
}

/// A laid-out line
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub units: Vec<PlacedUnit>,
    pub start_x: f64,
    pub width: f64,
    pub top_y: f64,
    pub baseline_y: f64,
    /// Tallest unit times the line spacing
    pub height: f64,
}

/// The whole block, ready to draw
#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub anchor: Point,
    pub lines: Vec<PlacedLine>,
    pub top_y: f64,
    pub height: f64,
}

impl BlockLayout {
    /// Units in drawing order: line by line, left to right
    pub fn units(&self) -> impl Iterator<Item = &PlacedUnit> {
        self.lines.iter().flat_map(|line| line.units.iter())
    }

    pub fn unit_count(&self) -> usize {
        self.lines.iter().map(|line| line.units.len()).sum()
    }
}

/// Measure segments and break them into lines
///
/// With a box width every segment is split into words and packed greedily;
/// without one each segment is a single unit and everything sits on one
/// line.
pub fn build_lines(
    canvas: &mut dyn Canvas,
    measurer: &TextMeasurer<'_>,
    segments: &[Segment],
    box_width: Option<f64>,
) -> Vec<Line> {
    let mut measure = |segment: usize, text: &str, style: &TextStyle| MeasuredUnit {
        text: text.to_string(),
        segment,
        style: style.clone(),
        metrics: measurer.measure(canvas, text, style),
    };

    match box_width {
        Some(box_width) => {
            let units: Vec<MeasuredUnit> = segments
                .iter()
                .enumerate()
                .flat_map(|(i, seg)| tokenize(&seg.text).into_iter().map(move |word| (i, word, seg)))
                .map(|(i, word, seg)| measure(i, word, &seg.style))
                .collect();
            let lines = pack_greedy(units, box_width, |u| u.metrics.width);
            log::debug!("Wrapped {} segments into {} lines", segments.len(), lines.len());
            lines.into_iter().map(|units| Line { units }).collect()
        },
        None => {
            let units: Vec<MeasuredUnit> = segments
                .iter()
                .enumerate()
                .map(|(i, seg)| measure(i, &seg.text, &seg.style))
                .collect();
            if units.is_empty() {
                Vec::new()
            } else {
                vec![Line { units }]
            }
        },
    }
}

/// Top edge of a block of height `height` anchored at `y` (y points up)
pub fn block_top(y: f64, height: f64, align: VerticalAlign) -> f64 {
    match align {
        VerticalAlign::Top => y,
        VerticalAlign::Center => y + height / 2.0,
        VerticalAlign::Bottom => y + height,
    }
}

/// Left edge of a line of width `width` anchored at `x`
pub fn line_start(x: f64, width: f64, align: HorizontalAlign) -> f64 {
    match align {
        HorizontalAlign::Left => x,
        HorizontalAlign::Center => x - width / 2.0,
        HorizontalAlign::Right => x - width,
    }
}

/// Stack lines under the anchor and give every unit its baseline position
pub fn place_block(lines: Vec<Line>, anchor: Point, options: &RenderOptions) -> BlockLayout {
    let heights: Vec<f64> = lines
        .iter()
        .map(|line| line.max_height() * options.linespacing)
        .collect();
    let height: f64 = heights.iter().sum();
    let top_y = block_top(anchor.y, height, options.vertical_align);

    let mut current_y = top_y;
    let placed = lines
        .into_iter()
        .zip(heights)
        .map(|(line, line_height)| {
            let width = line.width();
            let baseline_y = current_y - line.max_ascent();
            let start_x = line_start(anchor.x, width, options.horizontal_align);

            let mut x = start_x;
            let units = line
                .units
                .into_iter()
                .map(|unit| {
                    let unit_x = x;
                    x += unit.metrics.width;
                    PlacedUnit {
                        unit,
                        x: unit_x,
                        baseline_y,
                    }
                })
                .collect();

            let placed = PlacedLine {
                units,
                start_x,
                width,
                top_y: current_y,
                baseline_y,
                height: line_height,
            };
            current_y -= line_height;
            placed
        })
        .collect();

    BlockLayout {
        anchor,
        lines: placed,
        top_y,
        height,
    }
}
