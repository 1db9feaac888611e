//! Stack-count badge drawn in the top-right corner of a block.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, SvgNode, Text, TextDefinition},
    geometry::{Bounds, Point, Size},
};

const BADGE_RADIUS: f32 = 14.0;
const BADGE_FILL_OPACITY: f32 = 0.95;
/// Offset from the circle center down to the text baseline.
const TEXT_BASELINE_OFFSET: f32 = 5.0;

/// A white disc showing `×N`, where `N` is the number of stacked layers.
///
/// The disc and its text are emitted as one `<g>` so that opacity and SMIL
/// animations apply to both.
///
/// ```
/// # use blockflow_core::color::Color;
/// # use blockflow_core::draw::{Badge, Drawable};
/// # use blockflow_core::geometry::Point;
/// let badge = Badge::new(20, Point::new(620.0, 330.0), Color::new("#3B82F6").unwrap());
/// assert_eq!(badge.label(), "×20");
/// ```
#[derive(Debug, Clone)]
pub struct Badge {
    label: String,
    center: Point,
    text_definition: TextDefinition,
    opacity: f32,
    animations: Vec<SvgNode>,
}

impl Badge {
    /// Creates a badge for `count` centered at `center`, with text in `color`.
    pub fn new(count: u32, center: Point, color: Color) -> Self {
        Self {
            label: format!("×{count}"),
            center,
            text_definition: TextDefinition::badge().with_color(color),
            opacity: 1.0,
            animations: Vec::new(),
        }
    }

    /// Sets the group opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Attaches an SMIL animation element to the badge group.
    pub fn add_animation(&mut self, animation: SvgNode) {
        self.animations.push(animation);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Point where the badge text sits on its baseline.
    pub fn text_anchor(&self) -> Point {
        Point::new(self.center.x(), self.center.y() + TEXT_BASELINE_OFFSET)
    }
}

impl Drawable for Badge {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let disc = svg_element::Circle::new()
            .set("cx", self.center.x())
            .set("cy", self.center.y())
            .set("r", BADGE_RADIUS)
            .set("fill", Color::white().to_string())
            .set("fill-opacity", BADGE_FILL_OPACITY);
        let text = Text::new(&self.text_definition, &self.label, self.text_anchor());

        let mut group = svg_element::Group::new()
            .add(disc)
            .add(text.to_svg_element());
        if self.opacity < 1.0 {
            group = group.set("opacity", self.opacity);
        }
        for animation in &self.animations {
            group = group.add(animation.clone());
        }

        output.add_to_layer(RenderLayer::Node, Box::new(group));
        output
    }

    fn bounds(&self) -> Bounds {
        let diameter = BADGE_RADIUS * 2.0;
        Bounds::new_from_top_left(
            Point::new(self.center.x() - BADGE_RADIUS, self.center.y() - BADGE_RADIUS),
            Size::new(diameter, diameter),
        )
    }
}
