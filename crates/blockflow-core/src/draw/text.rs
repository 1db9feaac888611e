//! Text rendering definitions for node labels and decorations.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`Text`] - A renderable text element anchored at a scene point
//!
//! Text is always horizontally centered on its anchor. Measurement goes
//! through a shared `cosmic-text` font system so that callers can detect
//! labels that overflow the block they are drawn on.
//!
//! # Quick Start
//!
//! ```
//! # use blockflow_core::draw::{Text, TextDefinition};
//! # use blockflow_core::geometry::Point;
//! let style = TextDefinition::label();
//! let text = Text::new(&style, "Hybrid Tokenizer", Point::new(450.0, 132.0));
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::info;
use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
};

/// Font weight of a text element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Medium,
    Bold,
}

impl FontWeight {
    /// Returns the SVG `font-weight` value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Medium => "500",
            Self::Bold => "bold",
        }
    }

    fn to_cosmic(self) -> Weight {
        match self {
            Self::Normal => Weight::NORMAL,
            Self::Medium => Weight::MEDIUM,
            Self::Bold => Weight::BOLD,
        }
    }
}

/// Vertical meaning of a text anchor's y coordinate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// The anchor lies on the alphabetic baseline (SVG default).
    #[default]
    Alphabetic,
    /// The anchor lies on the vertical center of the glyphs.
    Central,
}

/// Defines the visual style for text elements.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `14` |
/// | Font weight | normal |
/// | Text color | `None` (SVG default, typically black) |
/// | Opacity | `1.0` |
/// | Baseline | alphabetic |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    font_weight: FontWeight,
    color: Option<Color>,
    opacity: f32,
    baseline: TextBaseline,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Main node label: 16px bold.
    pub fn label() -> Self {
        Self {
            font_size: 16.0,
            font_weight: FontWeight::Bold,
            ..Self::default()
        }
    }

    /// Node sublabel: 12px medium at 0.9 opacity.
    pub fn sublabel() -> Self {
        Self {
            font_size: 12.0,
            font_weight: FontWeight::Medium,
            opacity: 0.9,
            ..Self::default()
        }
    }

    /// Stack-count badge text: 14px bold.
    pub fn badge() -> Self {
        Self {
            font_size: 14.0,
            font_weight: FontWeight::Bold,
            ..Self::default()
        }
    }

    /// Icon glyph: 12px, centered on its anchor.
    pub fn glyph() -> Self {
        Self {
            font_size: 12.0,
            baseline: TextBaseline::Central,
            ..Self::default()
        }
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sets the font family (e.g. "Inter", "sans-serif", "monospace").
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    /// Sets the fill color. `None` leaves the SVG default.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets the element opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Returns a copy of this definition with the given fill color.
    pub fn with_color(&self, color: Color) -> Self {
        let mut def = self.clone();
        def.set_color(Some(color));
        def
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn baseline(&self) -> TextBaseline {
        self.baseline
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
            font_weight: FontWeight::default(),
            color: None,
            opacity: 1.0,
            baseline: TextBaseline::default(),
        }
    }
}

/// A renderable text element, horizontally centered on `anchor`.
///
/// # Examples
///
/// ```
/// # use blockflow_core::draw::{Drawable, Text, TextDefinition};
/// # use blockflow_core::geometry::Point;
/// let style = TextDefinition::sublabel();
/// let text = Text::new(&style, "Clinical narratives", Point::new(450.0, 65.0));
///
/// assert_eq!(text.content(), "Clinical narratives");
/// assert!(!text.render_to_layers().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
    anchor: Point,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str, anchor: Point) -> Self {
        Self {
            definition,
            content,
            anchor,
        }
    }

    /// Returns the text content of this element.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Returns the anchor point of this element.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Measures the rendered size of the content.
    pub fn calculate_size(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }

    /// Builds the SVG element without assigning it to a layer.
    pub(crate) fn to_svg_element(&self) -> svg_element::Text {
        let def = self.definition;

        let mut rendered = svg_element::Text::new(self.content)
            .set("x", self.anchor.x())
            .set("y", self.anchor.y())
            .set("text-anchor", "middle")
            .set("font-family", def.font_family())
            .set("font-size", def.font_size())
            .set("font-weight", def.font_weight().to_svg_value());

        if def.baseline() == TextBaseline::Central {
            rendered = rendered.set("dominant-baseline", "central");
        }

        if let Some(color) = def.color() {
            rendered = rendered
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        if def.opacity() < 1.0 {
            rendered = rendered.set("opacity", def.opacity());
        }

        rendered
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, Box::new(self.to_svg_element()));
        output
    }

    fn bounds(&self) -> Bounds {
        let size = self.calculate_size();
        let top = match self.definition.baseline() {
            TextBaseline::Central => self.anchor.y() - size.height() / 2.0,
            // Roughly the ascent of a sans-serif face
            TextBaseline::Alphabetic => self.anchor.y() - size.height() * 0.8,
        };
        Bounds::new_from_top_left(
            Point::new(self.anchor.x() - size.width() / 2.0, top),
            size,
        )
    }
}

/// Shared font system used for text measurement.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` with cosmic-text shaping, falling back to an
    /// average-advance estimate when no layout runs are produced.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size_px = text_def.font_size();
        let line_height = font_size_px * 1.2;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let family = match text_def.font_family() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let attrs = Attrs::new()
            .family(family)
            .weight(text_def.font_weight().to_cosmic());

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            max_width = text.chars().count() as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height;
        } else {
            for run in &layout_runs {
                if let Some(last) = run.glyphs.last() {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_presets() {
        let label = TextDefinition::label();
        assert_approx_eq!(f32, label.font_size(), 16.0);
        assert_eq!(label.font_weight(), FontWeight::Bold);

        let sublabel = TextDefinition::sublabel();
        assert_approx_eq!(f32, sublabel.font_size(), 12.0);
        assert_approx_eq!(f32, sublabel.opacity(), 0.9);

        let badge = TextDefinition::badge();
        assert_eq!(badge.font_weight(), FontWeight::Bold);

        let glyph = TextDefinition::glyph();
        assert_eq!(glyph.baseline(), TextBaseline::Central);
    }

    #[test]
    fn test_text_definition_setters() {
        let mut def = TextDefinition::new();
        assert_eq!(def.font_family(), "sans-serif");
        assert!(def.color().is_none());

        def.set_font_family("Inter");
        def.set_font_size(20.0);
        def.set_font_weight(FontWeight::Medium);
        def.set_opacity(1.5);
        def.set_color(Some(Color::new("#1A202C").unwrap()));

        assert_eq!(def.font_family(), "Inter");
        assert_approx_eq!(f32, def.font_size(), 20.0);
        assert_eq!(def.font_weight(), FontWeight::Medium);
        assert_approx_eq!(f32, def.opacity(), 1.0);
        assert!(def.color().is_some());
    }

    #[test]
    fn test_with_color_keeps_style() {
        let def = TextDefinition::badge().with_color(Color::new("#3B82F6").unwrap());
        assert_eq!(def.font_weight(), FontWeight::Bold);
        assert!(def.color().is_some());
    }

    #[test]
    fn test_text_calculate_size_empty() {
        let def = TextDefinition::new();
        let size = Text::new(&def, "", Point::default()).calculate_size();
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }

    #[test]
    fn test_text_calculate_size_grows_with_content() {
        let def = TextDefinition::label();
        let short = Text::new(&def, "LM", Point::default()).calculate_size();
        let long = Text::new(&def, "LM Head with a long suffix", Point::default()).calculate_size();
        assert!(short.width() > 0.0);
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_text_render_attributes() {
        let def = TextDefinition::sublabel().with_color(Color::new("white").unwrap());
        let text = Text::new(&def, "E(256)", Point::new(100.0, 60.0));
        let rendered: String = text
            .render_to_layers()
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();

        assert!(rendered.contains("text-anchor=\"middle\""));
        assert!(rendered.contains("font-weight=\"500\""));
        assert!(rendered.contains("opacity=\"0.9\""));
        assert!(rendered.contains("E(256)"));
        assert!(!rendered.contains("dominant-baseline"));
    }

    #[test]
    fn test_text_bounds_centered_on_anchor() {
        let def = TextDefinition::glyph();
        let text = Text::new(&def, "Σ", Point::new(15.0, 15.0));
        let bounds = text.bounds();
        assert_approx_eq!(f32, bounds.center().x(), 15.0, epsilon = 0.01);
        assert_approx_eq!(f32, bounds.center().y(), 15.0, epsilon = 0.01);
    }
}
