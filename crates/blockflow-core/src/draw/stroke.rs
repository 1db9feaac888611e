//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width, style, cap and join of a stroke
//! - [`StrokeStyle`]: solid or dash pattern
//! - [`StrokeCap`] / [`StrokeJoin`]: SVG line endpoint and corner rendering
//! - [`apply_stroke!`](crate::apply_stroke!): applies a definition to an SVG element
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#000000"`, `0.3` |
//! | `width` | `stroke-width` | `3.0` |
//! | `style` | `stroke-dasharray` | `"8,4"` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"`, `"square"` |
//! | `join` | `stroke-linejoin` | `"miter"`, `"round"`, `"bevel"` |

use std::{convert::Infallible, str::FromStr};

use crate::color::Color;

/// Visual style of a stroke, including its dash pattern.
///
/// - `Solid`: No dasharray attribute
/// - `Dashed`: "8,4"
/// - `Custom(pattern)`: Uses the provided pattern string
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// 8px dash, 4px gap
    Dashed,
    /// Custom SVG dasharray pattern, e.g. "10,5,2,5"
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "solid" | "none" | "" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            // Any other value is treated as a custom dasharray pattern
            other => Ok(Self::Custom(other.to_string())),
        }
    }
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8,4".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// Defines how line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat cap at the exact endpoint (SVG default)
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Defines how line corners (joins) are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    /// Sharp corner with mitered point (SVG default)
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke definition for rendering edges and outlines.
///
/// # Examples
///
/// ```
/// use blockflow_core::draw::{StrokeCap, StrokeDefinition, StrokeStyle};
/// use blockflow_core::color::Color;
///
/// // An attention edge: 3px, dashed, rounded ends.
/// let mut stroke = StrokeDefinition::dashed(Color::new("#000000").unwrap(), 3.0);
/// stroke.set_cap(StrokeCap::Round);
/// assert_eq!(stroke.style().to_svg_value().as_deref(), Some("8,4"));
/// ```
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a new stroke with the given color and width.
    ///
    /// Other properties use their default values (solid, butt cap, miter join).
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke.
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        let mut stroke = Self::new(color, width);
        stroke.set_style(StrokeStyle::Dashed);
        stroke
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns the stroke join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Sets the stroke cap style.
    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }

    /// Sets the stroke join style.
    pub fn set_join(&mut self, join: StrokeJoin) {
        self.join = join;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width, line cap, line join, and the dash pattern
/// when the style is not solid.
///
/// ```
/// use blockflow_core::draw::StrokeDefinition;
/// use blockflow_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::white().with_alpha(0.3), 1.0);
/// let rect = svg_element::Rectangle::new().set("width", 100).set("height", 50);
///
/// let rect = blockflow_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
        assert_eq!(stroke.join(), StrokeJoin::Miter);
    }

    #[test]
    fn test_stroke_constructors() {
        let color = Color::new("#000000").unwrap();

        let solid = StrokeDefinition::solid(color, 3.0);
        assert_eq!(solid.width(), 3.0);
        assert_eq!(*solid.style(), StrokeStyle::Solid);

        let dashed = StrokeDefinition::dashed(color, 3.0);
        assert_eq!(*dashed.style(), StrokeStyle::Dashed);
    }

    #[test]
    fn test_stroke_setters() {
        let mut stroke = StrokeDefinition::default();

        stroke.set_color(Color::new("green").unwrap());
        stroke.set_width(2.5);
        stroke.set_style(StrokeStyle::Custom("2,2".to_string()));
        stroke.set_cap(StrokeCap::Round);
        stroke.set_join(StrokeJoin::Bevel);

        assert_eq!(stroke.color().to_string(), "green");
        assert_eq!(stroke.width(), 2.5);
        assert_eq!(stroke.style().to_svg_value().as_deref(), Some("2,2"));
        assert_eq!(stroke.cap(), StrokeCap::Round);
        assert_eq!(stroke.join(), StrokeJoin::Bevel);
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!("solid".parse::<StrokeStyle>().unwrap(), StrokeStyle::Solid);
        assert_eq!("none".parse::<StrokeStyle>().unwrap(), StrokeStyle::Solid);
        assert_eq!("dashed".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dashed);
        assert_eq!(
            "8,4".parse::<StrokeStyle>().unwrap(),
            StrokeStyle::Custom("8,4".to_string())
        );
    }

    #[test]
    fn test_svg_values() {
        assert_eq!(StrokeCap::Round.to_svg_value(), "round");
        assert_eq!(StrokeJoin::Round.to_svg_value(), "round");
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
    }

    #[test]
    fn test_apply_stroke_sets_dasharray() {
        use svg::node::element as svg_element;

        let stroke = StrokeDefinition::dashed(Color::default(), 3.0);
        let line = crate::apply_stroke!(svg_element::Path::new(), &stroke);
        let rendered = line.to_string();
        assert!(rendered.contains("stroke-dasharray=\"8,4\""));
        assert!(rendered.contains("stroke-width=\"3\""));
    }
}
