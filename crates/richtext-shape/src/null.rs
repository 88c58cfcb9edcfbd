//! The shaper you get when shaping is off

use richtext_core::{
    types::{FaceMetrics, FontSource, ShapedRun},
    Result, RichTextError, Shaper,
};

/// Refuses every request, so callers fall back to native measurement
#[derive(Debug, Default, Clone, Copy)]
pub struct NullShaper;

impl NullShaper {
    pub fn new() -> Self {
        Self
    }
}

impl Shaper for NullShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn shape(&self, _font: &FontSource, _text: &str, _size: f64) -> Result<ShapedRun> {
        Err(RichTextError::unavailable("no shaping backend available"))
    }

    fn metrics(&self, _font: &FontSource, _size: f64) -> Result<FaceMetrics> {
        Err(RichTextError::unavailable("no shaping backend available"))
    }
}
