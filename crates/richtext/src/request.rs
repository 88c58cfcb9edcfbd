//! What to draw: strings, their properties and the block options

use kurbo::{Affine, Point};
use serde_json::Value as Json;

use richtext_core::{
    HorizontalAlign, PropertySpec, RenderOptions, Result, RichTextError, StyleBundles,
    VerticalAlign,
};
use richtext_style::SegmentProps;

/// One render request
///
/// ```
/// use richtext::prelude::*;
///
/// let block = TextBlock::new(0.5, 0.5, ["hello", ", ", "world"])
///     .colors(PropertySpec::list(["red", "blue", "green"]))
///     .prop("fontsize", PropertySpec::scalar(14))
///     .box_width(2.0);
/// assert_eq!(block.strings().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TextBlock {
    anchor: Point,
    strings: Vec<String>,
    colors: Option<PropertySpec>,
    styles: Option<StyleBundles>,
    props: SegmentProps,
    options: RenderOptions,
}

impl TextBlock {
    pub fn new<S: Into<String>>(x: f64, y: f64, strings: impl IntoIterator<Item = S>) -> Self {
        Self {
            anchor: Point::new(x, y),
            strings: strings.into_iter().map(Into::into).collect(),
            colors: None,
            styles: None,
            props: SegmentProps::new(),
            options: RenderOptions::default(),
        }
    }

    /// The dedicated colors argument: a string, a list or an index mapping
    pub fn colors(mut self, colors: PropertySpec) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Per-index property bundles, applied over everything else
    pub fn styles(mut self, styles: StyleBundles) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Any per-segment property, singular, plural or alias
    pub fn prop(mut self, name: impl Into<String>, spec: PropertySpec) -> Self {
        self.props.insert(name, spec);
        self
    }

    /// Wrap words into lines no wider than `width`
    pub fn box_width(mut self, width: f64) -> Self {
        self.options.box_width = Some(width);
        self
    }

    pub fn linespacing(mut self, linespacing: f64) -> Self {
        self.options.linespacing = linespacing;
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.options.horizontal_align = align;
        self
    }

    pub fn valign(mut self, align: VerticalAlign) -> Self {
        self.options.vertical_align = align;
        self
    }

    pub fn zorder(mut self, zorder: i32) -> Self {
        self.options.zorder = zorder;
        self
    }

    /// Draw in a space other than the canvas data space
    pub fn transform(mut self, transform: Affine) -> Self {
        self.options.transform = Some(transform);
        self
    }

    /// Degrees counter-clockwise about the anchor
    pub fn rotation(mut self, degrees: f64) -> Self {
        self.options.rotation = degrees;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn colors_spec(&self) -> Option<&PropertySpec> {
        self.colors.as_ref()
    }

    pub fn styles_spec(&self) -> Option<&StyleBundles> {
        self.styles.as_ref()
    }

    pub fn props(&self) -> &SegmentProps {
        &self.props
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Build a request from a JSON object
    ///
    /// `x`, `y` and `strings` are required. `colors`, `styles` and the block
    /// options (`box_width`, `linespacing`/`spacing`, `ha`/`horizontalalignment`,
    /// `va`/`verticalalignment`, `zorder`, `rotation`) are recognised by
    /// name; every other key becomes a segment property. `null` means absent.
    pub fn from_json(value: &Json) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| RichTextError::invalid("request must be a JSON object"))?;

        let coord = |key: &str| {
            object
                .get(key)
                .and_then(Json::as_f64)
                .ok_or_else(|| RichTextError::invalid(format!("`{key}` must be a number")))
        };
        let strings = object
            .get("strings")
            .and_then(Json::as_array)
            .ok_or_else(|| RichTextError::invalid("`strings` must be an array"))?
            .iter()
            .map(|s| {
                s.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| RichTextError::invalid(format!("not a string: {s}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut block = Self::new(coord("x")?, coord("y")?, strings);

        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "x" | "y" | "strings" => {},
                "colors" => block.colors = Some(PropertySpec::from_json(value)?),
                "styles" => block.styles = Some(StyleBundles::from_json(value)?),
                "box_width" | "boxwidth" => block.options.box_width = Some(number(key, value)?),
                "linespacing" | "spacing" => block.options.linespacing = number(key, value)?,
                "rotation" => block.options.rotation = number(key, value)?,
                "zorder" => block.options.zorder = number(key, value)? as i32,
                "ha" | "horizontalalignment" => {
                    block.options.horizontal_align = HorizontalAlign::parse(text(key, value)?)
                },
                "va" | "verticalalignment" => {
                    block.options.vertical_align = VerticalAlign::parse(text(key, value)?)
                },
                _ => block.props.insert(key.clone(), PropertySpec::from_json(value)?),
            }
        }

        Ok(block)
    }
}

fn number(key: &str, value: &Json) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| RichTextError::invalid(format!("`{key}` must be a number, got {value}")))
}

fn text<'v>(key: &str, value: &'v Json) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| RichTextError::invalid(format!("`{key}` must be a string, got {value}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_sets_options() {
        let block = TextBlock::new(1.0, 2.0, ["a", "b"])
            .box_width(3.0)
            .linespacing(2.0)
            .align(HorizontalAlign::Right)
            .valign(VerticalAlign::Top)
            .zorder(5)
            .rotation(45.0);

        assert_eq!(block.anchor(), Point::new(1.0, 2.0));
        let options = block.options();
        assert_eq!(options.box_width, Some(3.0));
        assert_eq!(options.linespacing, 2.0);
        assert_eq!(options.horizontal_align, HorizontalAlign::Right);
        assert_eq!(options.vertical_align, VerticalAlign::Top);
        assert_eq!(options.zorder, 5);
        assert_eq!(options.rotation, 45.0);
        assert!(block.colors_spec().is_none());
    }

    #[test]
    fn test_from_json() {
        let block = TextBlock::from_json(&json!({
            "x": 0.5,
            "y": 0.25,
            "strings": ["def ", "hello", "("],
            "colors": ["blue", "black", "green"],
            "styles": {"1": {"weight": "bold"}},
            "fontsizes": {"0,2": 14},
            "ha": "center",
            "va": "top",
            "box_width": null,
        }))
        .unwrap();

        assert_eq!(block.strings(), ["def ", "hello", "("]);
        assert!(matches!(block.colors_spec(), Some(PropertySpec::List(v)) if v.len() == 3));
        assert!(block.styles_spec().is_some());
        assert_eq!(block.props().iter().count(), 1);
        assert_eq!(block.options().horizontal_align, HorizontalAlign::Center);
        assert_eq!(block.options().vertical_align, VerticalAlign::Top);
        assert_eq!(block.options().box_width, None);
    }

    #[test]
    fn test_spacing_is_linespacing() {
        let block =
            TextBlock::from_json(&json!({"x": 0, "y": 0, "strings": ["a"], "spacing": 2.5}))
                .unwrap();
        assert_eq!(block.options().linespacing, 2.5);
        assert_eq!(block.props().iter().count(), 0);
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(TextBlock::from_json(&json!(["x"])).is_err());
        assert!(TextBlock::from_json(&json!({"x": 0, "y": 0, "strings": [1]})).is_err());
        assert!(TextBlock::from_json(&json!({"x": 0, "strings": []})).is_err());
        assert!(matches!(
            TextBlock::from_json(&json!({"x": 0, "y": 0, "strings": [], "linespacing": "wide"})),
            Err(RichTextError::InvalidArgument(_))
        ));
    }
}
