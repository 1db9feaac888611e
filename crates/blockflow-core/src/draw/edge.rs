//! Stroked edge paths.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, SvgNode},
    geometry::Bounds,
    path::EdgePath,
};

/// The visible stroke of a routed edge.
///
/// `opacity` carries the reveal progress of the edge in a single frame;
/// `animations` carries SMIL children for self-animating output.
///
/// ```
/// # use blockflow_core::color::Color;
/// # use blockflow_core::draw::{Drawable, EdgeStroke, StrokeDefinition};
/// # use blockflow_core::geometry::Point;
/// # use blockflow_core::path::EdgePath;
/// let path = EdgePath::line(Point::new(450.0, 80.0), Point::new(450.0, 110.0));
/// let stroke = StrokeDefinition::solid(Color::default(), 3.0);
///
/// let edge = EdgeStroke::new(&path, &stroke);
/// assert!(!edge.render_to_layers().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EdgeStroke<'a> {
    path: &'a EdgePath,
    stroke: &'a StrokeDefinition,
    opacity: f32,
    dom_id: Option<String>,
    animations: Vec<SvgNode>,
}

impl<'a> EdgeStroke<'a> {
    pub fn new(path: &'a EdgePath, stroke: &'a StrokeDefinition) -> Self {
        Self {
            path,
            stroke,
            opacity: 1.0,
            dom_id: None,
            animations: Vec::new(),
        }
    }

    /// Sets the overall opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Sets the `id` attribute of the emitted path.
    pub fn with_dom_id(mut self, id: String) -> Self {
        self.dom_id = Some(id);
        self
    }

    /// Attaches an SMIL animation element as a child of the path.
    pub fn add_animation(&mut self, animation: SvgNode) {
        self.animations.push(animation);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl Drawable for EdgeStroke<'_> {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let mut path = svg_element::Path::new()
            .set("d", self.path.to_path_data())
            .set("fill", "none");
        path = apply_stroke!(path, self.stroke);

        if let Some(id) = &self.dom_id {
            path = path.set("id", id.as_str());
        }
        if self.opacity < 1.0 {
            path = path.set("opacity", self.opacity);
        }
        for animation in &self.animations {
            path = path.add(animation.clone());
        }

        output.add_to_layer(RenderLayer::Edge, Box::new(path));
        output
    }

    fn bounds(&self) -> Bounds {
        self.path.bounds()
    }
}
