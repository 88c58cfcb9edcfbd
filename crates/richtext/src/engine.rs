//! The render entry point

// this_file: crates/richtext/src/engine.rs

use std::sync::Arc;

use kurbo::Affine;

use richtext_core::{
    Canvas, CanvasError, FontResolver, Result, RichTextError, Shaper, StyleDefaults, TextStyle,
};
use richtext_fontdb::SystemFontResolver;
use richtext_layout::{layout, BlockLayout, Segment, TextMeasurer};
use richtext_render::{DrawHandle, RendererAdapter};
use richtext_shape::{default_shaper, ComplexScripts};
use richtext_style::PropertyResolver;

use crate::request::TextBlock;

/// Renders [`TextBlock`]s onto canvases
///
/// Holds everything that outlives a single call: style defaults, the shaper
/// and its face cache, the font resolver and the complex-script ranges.
/// Nothing else is kept between calls.
pub struct RichText {
    resolver: PropertyResolver,
    shaper: Arc<dyn Shaper>,
    fonts: Arc<dyn FontResolver>,
    scripts: ComplexScripts,
}

impl RichText {
    pub fn builder() -> RichTextBuilder {
        RichTextBuilder::new()
    }

    pub fn defaults(&self) -> &StyleDefaults {
        self.resolver.defaults()
    }

    pub fn shaper(&self) -> &dyn Shaper {
        self.shaper.as_ref()
    }

    pub fn font_resolver(&self) -> &dyn FontResolver {
        self.fonts.as_ref()
    }

    pub fn complex_scripts(&self) -> &ComplexScripts {
        &self.scripts
    }

    /// Final style of every segment, defaults filled in
    pub fn styles(&self, block: &TextBlock) -> Result<Vec<TextStyle>> {
        let resolved = self.resolver.resolve(
            block.strings().len(),
            block.colors_spec(),
            block.styles_spec(),
            block.props(),
        )?;
        Ok(resolved.iter().map(|s| self.resolver.materialize(s)).collect())
    }

    /// Measure and place without drawing anything that stays
    pub fn layout(&self, canvas: &mut dyn Canvas, block: &TextBlock) -> Result<BlockLayout> {
        self.prepare(canvas, block).map(|(layout, _)| layout)
    }

    /// Draw `block`; one handle per word in wrap mode, per segment otherwise
    ///
    /// Invalid property input is reported before the canvas is touched. A
    /// canvas without a renderer is refreshed once; if that fails the call
    /// fails with [`RichTextError::PreconditionFailed`].
    pub fn render(&self, canvas: &mut dyn Canvas, block: &TextBlock) -> Result<Vec<DrawHandle>> {
        let (layout, transform) = self.prepare(canvas, block)?;
        let handles = RendererAdapter::new(transform, block.options()).draw_block(canvas, &layout);
        log::debug!(
            "Rendered {} strings as {} units on {} lines",
            block.strings().len(),
            handles.len(),
            layout.lines.len()
        );
        Ok(handles)
    }

    fn prepare(&self, canvas: &mut dyn Canvas, block: &TextBlock) -> Result<(BlockLayout, Affine)> {
        let styles = self.styles(block)?;
        ensure_renderer(canvas)?;

        let transform = block
            .options()
            .transform
            .unwrap_or_else(|| canvas.data_transform());
        let segments: Vec<Segment> = block
            .strings()
            .iter()
            .zip(styles)
            .map(|(text, style)| Segment::new(text.as_str(), style))
            .collect();

        let measurer = TextMeasurer::new(self.shaper.as_ref(), self.fonts.as_ref(), &self.scripts, transform);
        let placed = layout(canvas, &measurer, &segments, block.anchor(), block.options());
        Ok((placed, transform))
    }
}

/// Force one refresh when the canvas cannot measure yet
fn ensure_renderer(canvas: &mut dyn Canvas) -> Result<()> {
    if canvas.has_renderer() {
        return Ok(());
    }

    log::debug!("{} has no renderer yet, refreshing once", canvas.name());
    canvas
        .refresh()
        .map_err(|err| RichTextError::PreconditionFailed(err.to_string()))?;

    if canvas.has_renderer() {
        Ok(())
    } else {
        Err(RichTextError::PreconditionFailed(CanvasError::NoRenderer.to_string()))
    }
}

/// Assembles a [`RichText`]; anything left unset gets its default
#[derive(Default)]
pub struct RichTextBuilder {
    defaults: Option<StyleDefaults>,
    shaper: Option<Arc<dyn Shaper>>,
    fonts: Option<Arc<dyn FontResolver>>,
    scripts: Option<ComplexScripts>,
}

impl RichTextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for properties no input sets
    pub fn defaults(mut self, defaults: StyleDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Defaults to [`default_shaper`]
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Defaults to the system fonts through fontdb
    pub fn font_resolver(mut self, fonts: Arc<dyn FontResolver>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Which text goes through the shaper; Devanagari unless set
    pub fn complex_scripts(mut self, scripts: ComplexScripts) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn build(self) -> RichText {
        let shaper = self.shaper.unwrap_or_else(default_shaper);
        let fonts = self
            .fonts
            .unwrap_or_else(|| Arc::new(SystemFontResolver::system()));
        log::debug!("Building richtext engine: shaper {}, fonts {}", shaper.name(), fonts.name());

        RichText {
            resolver: PropertyResolver::new(self.defaults.unwrap_or_default()),
            shaper,
            fonts,
            scripts: self.scripts.unwrap_or_default(),
        }
    }
}
