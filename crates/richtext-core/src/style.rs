//! Resolved per-segment styles and the defaults that complete them

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RichTextError};
use crate::property::Value;

/// Recognised property names
pub mod names {
    pub const COLOR: &str = "color";
    pub const FONTSIZE: &str = "fontsize";
    pub const FONTWEIGHT: &str = "fontweight";
    pub const FONTFAMILY: &str = "fontfamily";
    pub const FONTSTYLE: &str = "fontstyle";
    pub const ALPHA: &str = "alpha";
    pub const BACKGROUNDCOLOR: &str = "backgroundcolor";
    pub const UNDERLINE: &str = "underline";

    pub const ALL: [&str; 8] = [
        COLOR,
        FONTSIZE,
        FONTWEIGHT,
        FONTFAMILY,
        FONTSTYLE,
        ALPHA,
        BACKGROUNDCOLOR,
        UNDERLINE,
    ];
}

/// Fold short aliases onto their canonical property name
pub fn canonical_name(name: &str) -> &str {
    match name {
        "size" => names::FONTSIZE,
        "weight" => names::FONTWEIGHT,
        "family" => names::FONTFAMILY,
        "style" => names::FONTSTYLE,
        other => other,
    }
}

/// The singular property a plural name stands for
pub fn singular_of(name: &str) -> Option<&'static str> {
    match name {
        "colors" => Some(names::COLOR),
        "fontsizes" => Some(names::FONTSIZE),
        "fontweights" => Some(names::FONTWEIGHT),
        "fontfamilies" => Some(names::FONTFAMILY),
        "fontstyles" => Some(names::FONTSTYLE),
        "alphas" => Some(names::ALPHA),
        "backgroundcolors" => Some(names::BACKGROUNDCOLOR),
        "underlines" => Some(names::UNDERLINE),
        _ => None,
    }
}

/// One segment's final property set
///
/// Holds exactly one value per property name that any input set. Names that
/// nothing set are absent, and [`StyleDefaults::materialize`] fills them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedStyle(BTreeMap<String, Value>);

impl ResolvedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn unset(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// Parses CSS colors (`red`, `#2C4A6E`, `rgb(..)`) and the
    /// single-letter shorthands `b g r c m y k w`
    pub fn parse(spec: &str) -> Option<Self> {
        let shorthand = match spec.trim() {
            "b" => Some(Self::rgba(0, 0, 255, 255)),
            "g" => Some(Self::rgba(0, 128, 0, 255)),
            "r" => Some(Self::rgba(255, 0, 0, 255)),
            "c" => Some(Self::rgba(0, 191, 191, 255)),
            "m" => Some(Self::rgba(191, 0, 191, 255)),
            "y" => Some(Self::rgba(191, 191, 0, 255)),
            "k" => Some(Self::black()),
            "w" => Some(Self::white()),
            _ => None,
        };
        if shorthand.is_some() {
            return shorthand;
        }
        svgtypes::Color::from_str(spec.trim())
            .ok()
            .map(|c| Self::rgba(c.red, c.green, c.blue, c.alpha))
    }

    /// Multiply the alpha channel by `alpha` (clamped to 0..=1)
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (self.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// Relative font size keywords and their scale against the default size
fn named_size_scale(name: &str) -> Option<f64> {
    match name {
        "xx-small" => Some(0.579),
        "x-small" => Some(0.694),
        "small" | "smaller" => Some(0.833),
        "medium" => Some(1.0),
        "large" | "larger" => Some(1.2),
        "x-large" => Some(1.44),
        "xx-large" => Some(1.728),
        _ => None,
    }
}

/// Style defaults for every property a segment leaves unset
///
/// Passed explicitly into the engine; nothing reads process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub color: String,
    pub fontsize: f64,
    pub fontweight: String,
    pub fontfamily: String,
    pub fontstyle: String,
    pub alpha: Option<f64>,
    pub backgroundcolor: Option<String>,
    pub underline: bool,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            fontsize: 10.0,
            fontweight: "normal".to_string(),
            fontfamily: "sans-serif".to_string(),
            fontstyle: "normal".to_string(),
            alpha: None,
            backgroundcolor: None,
            underline: false,
        }
    }
}

impl StyleDefaults {
    /// Load defaults from a JSON object; missing keys keep their default
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| RichTextError::invalid(format!("style defaults: {e}")))
    }

    /// Font size in points for a size value, honouring keywords like `large`
    pub fn fontsize_of(&self, value: &Value) -> f64 {
        if let Some(size) = value.as_f64() {
            return size;
        }
        value
            .as_str()
            .and_then(|s| named_size_scale(s.trim()))
            .map(|scale| scale * self.fontsize)
            .unwrap_or(self.fontsize)
    }

    /// Fill every unset property from the defaults
    pub fn materialize(&self, style: &ResolvedStyle) -> TextStyle {
        let text = |name: &str, fallback: &str| {
            style
                .get(name)
                .map(Value::to_string)
                .unwrap_or_else(|| fallback.to_string())
        };

        let extra = style
            .iter()
            .filter(|(name, _)| !names::ALL.contains(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();

        TextStyle {
            color: text(names::COLOR, &self.color),
            fontsize: style
                .get(names::FONTSIZE)
                .map(|v| self.fontsize_of(v))
                .unwrap_or(self.fontsize),
            fontweight: text(names::FONTWEIGHT, &self.fontweight),
            fontfamily: text(names::FONTFAMILY, &self.fontfamily),
            fontstyle: text(names::FONTSTYLE, &self.fontstyle),
            alpha: style
                .get(names::ALPHA)
                .and_then(Value::as_f64)
                .or(self.alpha),
            backgroundcolor: style
                .get(names::BACKGROUNDCOLOR)
                .map(Value::to_string)
                .or_else(|| self.backgroundcolor.clone()),
            underline: style
                .get(names::UNDERLINE)
                .and_then(Value::as_bool)
                .unwrap_or(self.underline),
            extra,
        }
    }
}

/// A fully specified style, ready for a canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub color: String,
    pub fontsize: f64,
    pub fontweight: String,
    pub fontfamily: String,
    pub fontstyle: String,
    pub alpha: Option<f64>,
    pub backgroundcolor: Option<String>,
    pub underline: bool,
    /// Properties this crate does not interpret, passed through to the canvas
    pub extra: BTreeMap<String, Value>,
}

impl TextStyle {
    /// The parsed color without `alpha`; unknown color strings become black
    ///
    /// Underlines are stroked with this, so they stay opaque under a translucent fill.
    pub fn base_color(&self) -> Color {
        Color::parse(&self.color).unwrap_or_else(|| {
            log::warn!("Unrecognised color {:?}, using black", self.color);
            Color::black()
        })
    }

    /// Fill color with alpha applied
    pub fn rgba(&self) -> Color {
        let color = self.base_color();
        match self.alpha {
            Some(alpha) => color.with_alpha(alpha),
            None => color,
        }
    }

    /// Families in preference order, split on commas
    pub fn families(&self) -> Vec<&str> {
        self.fontfamily
            .split(',')
            .map(|f| f.trim().trim_matches(['"', '\'']))
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// Numeric CSS weight (100..=900) for the weight keyword or number
    pub fn weight_value(&self) -> u16 {
        match self.fontweight.trim().to_ascii_lowercase().as_str() {
            "ultralight" | "thin" => 100,
            "extra light" | "extralight" => 200,
            "light" => 300,
            "normal" | "regular" | "book" => 400,
            "medium" => 500,
            "semibold" | "demibold" | "demi" => 600,
            "bold" => 700,
            "heavy" | "extra bold" | "extrabold" => 800,
            "black" => 900,
            other => other
                .parse::<f64>()
                .map(|w| w.clamp(1.0, 1000.0) as u16)
                .unwrap_or(400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_and_plural_names() {
        assert_eq!(canonical_name("size"), "fontsize");
        assert_eq!(canonical_name("weight"), "fontweight");
        assert_eq!(canonical_name("family"), "fontfamily");
        assert_eq!(canonical_name("style"), "fontstyle");
        assert_eq!(canonical_name("rotation"), "rotation");
        assert_eq!(singular_of("fontsizes"), Some("fontsize"));
        assert_eq!(singular_of("underlines"), Some("underline"));
        assert_eq!(singular_of("fontsize"), None);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("red"), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(Color::parse("#2C4A6E"), Some(Color::rgba(0x2c, 0x4a, 0x6e, 255)));
        assert_eq!(Color::parse("k"), Some(Color::black()));
        assert_eq!(Color::parse("definitely-not-a-color"), None);
        assert_eq!(Color::white().with_alpha(0.5).a, 128);
    }

    #[test]
    fn test_materialize_fills_defaults() {
        let defaults = StyleDefaults::default();
        let mut resolved = ResolvedStyle::new();
        resolved.set("color", Value::from("red"));
        resolved.set("rotation", Value::from(45.0));

        let style = defaults.materialize(&resolved);
        assert_eq!(style.color, "red");
        assert_eq!(style.fontsize, 10.0);
        assert_eq!(style.fontweight, "normal");
        assert!(!style.underline);
        assert_eq!(style.extra.get("rotation"), Some(&Value::from(45.0)));
        assert!(!style.extra.contains_key("color"));
    }

    #[test]
    fn test_named_font_sizes() {
        let defaults = StyleDefaults::default();
        assert_eq!(defaults.fontsize_of(&Value::from(20)), 20.0);
        assert!((defaults.fontsize_of(&Value::from("large")) - 12.0).abs() < 1e-9);
        assert_eq!(defaults.fontsize_of(&Value::from("enormous")), 10.0);
    }

    #[test]
    fn test_defaults_from_json() {
        let defaults = StyleDefaults::from_json(r#"{"fontsize": 14, "color": "navy"}"#).unwrap();
        assert_eq!(defaults.fontsize, 14.0);
        assert_eq!(defaults.color, "navy");
        assert_eq!(defaults.fontfamily, "sans-serif");
        assert!(StyleDefaults::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_families_and_weight() {
        let mut style = StyleDefaults::default().materialize(&ResolvedStyle::new());
        style.fontfamily = "Noto Sans Devanagari, 'DejaVu Sans', sans-serif".into();
        assert_eq!(
            style.families(),
            vec!["Noto Sans Devanagari", "DejaVu Sans", "sans-serif"]
        );
        style.fontweight = "bold".into();
        assert_eq!(style.weight_value(), 700);
        style.fontweight = "300".into();
        assert_eq!(style.weight_value(), 300);
    }

    #[test]
    fn test_rgba_with_alpha() {
        let mut resolved = ResolvedStyle::new();
        resolved.set("color", Value::from("blue"));
        resolved.set("alpha", Value::from(0.5));
        let style = StyleDefaults::default().materialize(&resolved);
        assert_eq!(style.rgba(), Color::rgba(0, 0, 255, 128));
    }
}
