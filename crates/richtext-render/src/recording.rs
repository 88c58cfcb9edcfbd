//! A canvas that remembers instead of painting
//!
//! [`RecordingCanvas`] keeps every primitive it is given, answers extent
//! queries with a fixed-advance text model, and can dump what is currently
//! on it as JSON. Handy for tests, debugging and headless pipelines.

use std::collections::BTreeMap;

use kurbo::{Affine, Point, Rect, Shape};
use serde::Serialize;

use richtext_core::{
    types::{ArtifactId, LinePrimitive, PathPrimitive, TextPrimitive},
    Canvas, CanvasError, Color, TextStyle,
};

/// Schema version for the JSON dump
pub const RECORDING_SCHEMA_VERSION: &str = "1.0";

/// One primitive as the canvas saw it, with device-space bounds
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recorded {
    Text {
        id: ArtifactId,
        text: String,
        /// Caller space
        position: [f64; 2],
        style: TextStyle,
        rotation: f64,
        zorder: i32,
        visible: bool,
        bounds: [f64; 4],
    },
    Path {
        id: ArtifactId,
        fill: Color,
        zorder: i32,
        bounds: [f64; 4],
    },
    Line {
        id: ArtifactId,
        /// Caller space
        from: [f64; 2],
        to: [f64; 2],
        color: Color,
        linewidth: f64,
        zorder: i32,
        bounds: [f64; 4],
    },
}

impl Recorded {
    pub fn id(&self) -> ArtifactId {
        match self {
            Recorded::Text { id, .. } | Recorded::Path { id, .. } | Recorded::Line { id, .. } => *id,
        }
    }

    /// Device-space bounds
    pub fn bounds(&self) -> Rect {
        let [x0, y0, x1, y1] = match self {
            Recorded::Text { bounds, .. }
            | Recorded::Path { bounds, .. }
            | Recorded::Line { bounds, .. } => *bounds,
        };
        Rect::new(x0, y0, x1, y1)
    }
}

/// Everything currently on the canvas
#[derive(Debug, Clone, Serialize)]
pub struct RecordingOutput<'a> {
    pub schema_version: &'static str,
    pub dpi: f64,
    pub artifacts: Vec<&'a Recorded>,
}

/// Deterministic headless canvas
///
/// Text is modelled as `advance` em per character, `ascent` em above the
/// baseline and `descent` em below it. Blank text has no height.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    dpi: f64,
    data_transform: Affine,
    advance: f64,
    ascent: f64,
    descent: f64,
    has_renderer: bool,
    refresh_error: Option<String>,
    refreshes: usize,
    next_id: u64,
    artifacts: BTreeMap<ArtifactId, Recorded>,
    text_draws: usize,
}

impl RecordingCanvas {
    /// 100 dpi, one data unit per 100 pixels, renderer attached
    pub fn new() -> Self {
        Self {
            dpi: 100.0,
            data_transform: Affine::scale(100.0),
            advance: 0.6,
            ascent: 0.9,
            descent: 0.3,
            has_renderer: true,
            refresh_error: None,
            refreshes: 0,
            next_id: 0,
            artifacts: BTreeMap::new(),
            text_draws: 0,
        }
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_data_transform(mut self, transform: Affine) -> Self {
        self.data_transform = transform;
        self
    }

    /// Character advance, ascent and descent in em
    pub fn with_text_model(mut self, advance: f64, ascent: f64, descent: f64) -> Self {
        self.advance = advance;
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    /// Start without a renderer; the first refresh attaches one
    pub fn detached(mut self) -> Self {
        self.has_renderer = false;
        self
    }

    /// Make every refresh fail with `message`
    pub fn failing_refresh(mut self, message: impl Into<String>) -> Self {
        self.refresh_error = Some(message.into());
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Text draw calls so far, scratch ones included
    pub fn text_draw_count(&self) -> usize {
        self.text_draws
    }

    /// Live artifacts in drawing order
    pub fn artifacts(&self) -> impl Iterator<Item = &Recorded> {
        self.artifacts.values()
    }

    pub fn get(&self, id: ArtifactId) -> Option<&Recorded> {
        self.artifacts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Live artifacts that would show up on screen
    pub fn visible(&self) -> impl Iterator<Item = &Recorded> {
        self.artifacts
            .values()
            .filter(|r| !matches!(r, Recorded::Text { visible: false, .. }))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&RecordingOutput {
            schema_version: RECORDING_SCHEMA_VERSION,
            dpi: self.dpi,
            artifacts: self.artifacts.values().collect(),
        })
    }

    fn allocate(&mut self) -> ArtifactId {
        self.next_id += 1;
        ArtifactId(self.next_id)
    }

    /// Device bounds of text under the fixed-advance model
    fn text_bounds(&self, text: &TextPrimitive) -> Rect {
        let size = self.points_to_pixels(text.style.fontsize);
        let width = text.text.chars().count() as f64 * self.advance * size;
        let (below, above) = if text.text.trim().is_empty() {
            (0.0, 0.0)
        } else {
            (self.descent * size, self.ascent * size)
        };

        let origin = text.transform * text.position;
        let local = Rect::new(0.0, -below, width, above);
        let placement =
            Affine::translate(origin.to_vec2()) * Affine::rotate(text.rotation.to_radians());
        placement.transform_rect_bbox(local)
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

fn corners(rect: Rect) -> [f64; 4] {
    [rect.x0, rect.y0, rect.x1, rect.y1]
}

fn xy(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

impl Canvas for RecordingCanvas {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn has_renderer(&self) -> bool {
        self.has_renderer
    }

    fn refresh(&mut self) -> Result<(), CanvasError> {
        self.refreshes += 1;
        if let Some(message) = &self.refresh_error {
            return Err(CanvasError::RefreshFailed(message.clone()));
        }
        self.has_renderer = true;
        Ok(())
    }

    fn data_transform(&self) -> Affine {
        self.data_transform
    }

    fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ArtifactId {
        let id = self.allocate();
        self.text_draws += 1;
        let bounds = self.text_bounds(text);
        self.artifacts.insert(
            id,
            Recorded::Text {
                id,
                text: text.text.clone(),
                position: xy(text.position),
                style: text.style.clone(),
                rotation: text.rotation,
                zorder: text.zorder,
                visible: text.visible,
                bounds: corners(bounds),
            },
        );
        id
    }

    fn draw_path(&mut self, path: &PathPrimitive) -> ArtifactId {
        let id = self.allocate();
        let bounds = path.transform.transform_rect_bbox(path.path.bounding_box());
        self.artifacts.insert(
            id,
            Recorded::Path {
                id,
                fill: path.fill,
                zorder: path.zorder,
                bounds: corners(bounds),
            },
        );
        id
    }

    fn draw_line(&mut self, line: &LinePrimitive) -> ArtifactId {
        let id = self.allocate();
        let bounds = Rect::from_points(line.transform * line.from, line.transform * line.to);
        self.artifacts.insert(
            id,
            Recorded::Line {
                id,
                from: xy(line.from),
                to: xy(line.to),
                color: line.color,
                linewidth: line.linewidth,
                zorder: line.zorder,
                bounds: corners(bounds),
            },
        );
        id
    }

    fn extent(&self, id: ArtifactId) -> Option<Rect> {
        if !self.has_renderer {
            return None;
        }
        self.artifacts.get(&id).map(Recorded::bounds)
    }

    fn remove(&mut self, id: ArtifactId) {
        self.artifacts.remove(&id);
    }
}
