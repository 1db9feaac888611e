//! Icon glyph drawn in the top-left corner of a block.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Text, TextDefinition},
    geometry::{Bounds, Point, Size},
};

const ICON_RADIUS: f32 = 10.0;
const ICON_FILL_OPACITY: f32 = 0.2;

/// A translucent disc with a single glyph centered in it.
#[derive(Debug, Clone)]
pub struct Icon<'a> {
    glyph: &'a str,
    center: Point,
    text_definition: TextDefinition,
}

impl<'a> Icon<'a> {
    pub fn new(glyph: &'a str, center: Point, color: Color) -> Self {
        Self {
            glyph,
            center,
            text_definition: TextDefinition::glyph().with_color(color),
        }
    }

    pub fn glyph(&self) -> &str {
        self.glyph
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

impl Drawable for Icon<'_> {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let disc = svg_element::Circle::new()
            .set("cx", self.center.x())
            .set("cy", self.center.y())
            .set("r", ICON_RADIUS)
            .set("fill", Color::white().to_string())
            .set("fill-opacity", ICON_FILL_OPACITY);
        output.add_to_layer(RenderLayer::Node, Box::new(disc));

        let text = Text::new(&self.text_definition, self.glyph, self.center);
        output.merge(text.render_to_layers());

        output
    }

    fn bounds(&self) -> Bounds {
        let diameter = ICON_RADIUS * 2.0;
        Bounds::new_from_top_left(
            Point::new(self.center.x() - ICON_RADIUS, self.center.y() - ICON_RADIUS),
            Size::new(diameter, diameter),
        )
    }
}
