//! Flow markers traveling along edges.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, SvgNode},
    geometry::{Bounds, Point, Size},
};

/// A small filled disc showing the direction of flow on an edge.
///
/// In a single frame the marker sits at `center` with the given opacity.
/// In self-animating output it is placed at the origin and moved by an
/// attached `animateMotion` child.
#[derive(Debug, Clone)]
pub struct FlowMarker {
    center: Point,
    radius: f32,
    color: Color,
    opacity: f32,
    animations: Vec<SvgNode>,
}

impl FlowMarker {
    pub fn new(center: Point, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            opacity: 1.0,
            animations: Vec::new(),
        }
    }

    /// Sets the marker opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Attaches an SMIL animation element as a child of the marker.
    pub fn add_animation(&mut self, animation: SvgNode) {
        self.animations.push(animation);
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl Drawable for FlowMarker {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let mut circle = svg_element::Circle::new()
            .set("cx", self.center.x())
            .set("cy", self.center.y())
            .set("r", self.radius)
            .set("fill", self.color.to_string())
            .set("fill-opacity", self.color.alpha())
            .set("opacity", self.opacity);
        for animation in &self.animations {
            circle = circle.add(animation.clone());
        }

        output.add_to_layer(RenderLayer::Edge, Box::new(circle));
        output
    }

    fn bounds(&self) -> Bounds {
        let diameter = self.radius * 2.0;
        Bounds::new_from_top_left(
            Point::new(self.center.x() - self.radius, self.center.y() - self.radius),
            Size::new(diameter, diameter),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_render() {
        let marker = FlowMarker::new(Point::new(50.0, 75.0), 4.0, Color::default()).with_opacity(0.5);
        let output = marker.render_to_layers();
        assert_eq!(output.count_in_layer(RenderLayer::Edge), 1);

        let rendered: String = output.render().iter().map(|n| n.to_string()).collect();
        assert!(rendered.contains("cx=\"50\""));
        assert!(rendered.contains("cy=\"75\""));
        assert!(rendered.contains("r=\"4\""));
        assert!(rendered.contains(" opacity=\"0.5\""));
    }

    #[test]
    fn test_marker_bounds() {
        let marker = FlowMarker::new(Point::new(50.0, 50.0), 4.0, Color::default());
        let bounds = marker.bounds();
        assert_eq!(bounds.min_point(), Point::new(46.0, 46.0));
        assert_eq!(bounds.center(), marker.center());
        assert_eq!(marker.radius(), 4.0);
    }
}
