//! Block-level options for one render call

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use kurbo::Affine;
use serde::{Deserialize, Serialize};

/// Where each line sits relative to the anchor x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Unrecognised names fall back to `Left`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Self::Center,
            "right" => Self::Right,
            "left" => Self::Left,
            other => {
                log::debug!("Unknown horizontal alignment {other:?}, using left");
                Self::Left
            },
        }
    }
}

/// Where the block sits relative to the anchor y
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    /// Unrecognised names fall back to `Center`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "center" | "centre" => Self::Center,
            other => {
                log::debug!("Unknown vertical alignment {other:?}, using center");
                Self::Center
            },
        }
    }
}

impl fmt::Display for HorizontalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        })
    }
}

impl FromStr for HorizontalAlign {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl FromStr for VerticalAlign {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// How the block is wrapped, aligned and placed
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Maximum line width; `Some` enables word wrapping
    pub box_width: Option<f64>,
    /// Line height multiplier over the tallest segment
    pub linespacing: f64,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub zorder: i32,
    /// Caller space to device pixels; the canvas data transform when `None`
    pub transform: Option<Affine>,
    /// Degrees, counter-clockwise about the block anchor
    pub rotation: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            box_width: None,
            linespacing: 1.5,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Center,
            zorder: 1,
            transform: None,
            rotation: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_parse() {
        assert_eq!(HorizontalAlign::parse("center"), HorizontalAlign::Center);
        assert_eq!(HorizontalAlign::parse("RIGHT"), HorizontalAlign::Right);
        assert_eq!(HorizontalAlign::parse("justify"), HorizontalAlign::Left);
        assert_eq!(VerticalAlign::parse("top"), VerticalAlign::Top);
        assert_eq!(VerticalAlign::parse("bottom"), VerticalAlign::Bottom);
        assert_eq!(VerticalAlign::parse("baseline"), VerticalAlign::Center);
        assert_eq!("centre".parse::<HorizontalAlign>(), Ok(HorizontalAlign::Center));
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.linespacing, 1.5);
        assert_eq!(options.horizontal_align, HorizontalAlign::Left);
        assert_eq!(options.vertical_align, VerticalAlign::Center);
        assert_eq!(options.zorder, 1);
        assert!(options.box_width.is_none());
        assert!(options.transform.is_none());
    }

    #[test]
    fn test_alignment_serde() {
        let align: VerticalAlign = serde_json::from_str("\"bottom\"").unwrap();
        assert_eq!(align, VerticalAlign::Bottom);
        assert_eq!(HorizontalAlign::Right.to_string(), "right");
    }
}
