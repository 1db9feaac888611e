//! Pseudo-3D block faces.
//!
//! A block is drawn as four faces painted back to front: the back face (the
//! front rectangle shifted up and to the right), the right side, the top, and
//! finally the opaque front face. The face geometry is computed by the
//! caller; this module only knows how to paint it.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, SvgNode},
    geometry::{Bounds, Polygon},
};

/// Geometry of the four faces of an extruded block.
#[derive(Debug, Clone, PartialEq)]
pub struct PrismFaces {
    back: Bounds,
    side: Polygon,
    top: Polygon,
    front: Bounds,
}

impl PrismFaces {
    pub fn new(back: Bounds, side: Polygon, top: Polygon, front: Bounds) -> Self {
        Self {
            back,
            side,
            top,
            front,
        }
    }

    pub fn back(&self) -> Bounds {
        self.back
    }

    pub fn side(&self) -> &Polygon {
        &self.side
    }

    pub fn top(&self) -> &Polygon {
        &self.top
    }

    pub fn front(&self) -> Bounds {
        self.front
    }

    /// Smallest box enclosing every face.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = self.front.merge(&self.back);
        for polygon in [&self.side, &self.top] {
            if let Some(poly_bounds) = polygon.bounds() {
                bounds = bounds.merge(&poly_bounds);
            }
        }
        bounds
    }
}

/// Paint settings shared by every block in a scene.
///
/// `front_opacity` is what drives the mount reveal of a block; everything
/// else is static per scene.
#[derive(Debug, Clone)]
pub struct PrismDefinition {
    fill: Color,
    corner_radius: f32,
    back_opacity: f32,
    side_opacity: f32,
    top_opacity: f32,
    front_opacity: f32,
    outline: StrokeDefinition,
    shadow_filter: Option<String>,
}

impl PrismDefinition {
    /// Creates a definition with the default face opacities
    /// (back 0.3, side 0.5, top 0.4, front 1.0), corner radius 8 and a thin
    /// translucent white outline.
    pub fn new(fill: Color) -> Self {
        Self {
            fill,
            corner_radius: 8.0,
            back_opacity: 0.3,
            side_opacity: 0.5,
            top_opacity: 0.4,
            front_opacity: 1.0,
            outline: StrokeDefinition::solid(Color::white().with_alpha(0.3), 1.0),
            shadow_filter: None,
        }
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }

    /// Sets the back, side and top opacities.
    pub fn set_face_opacities(&mut self, back: f32, side: f32, top: f32) {
        self.back_opacity = back;
        self.side_opacity = side;
        self.top_opacity = top;
    }

    pub fn back_opacity(&self) -> f32 {
        self.back_opacity
    }

    pub fn side_opacity(&self) -> f32 {
        self.side_opacity
    }

    pub fn top_opacity(&self) -> f32 {
        self.top_opacity
    }

    pub fn front_opacity(&self) -> f32 {
        self.front_opacity
    }

    pub fn set_front_opacity(&mut self, opacity: f32) {
        self.front_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_outline(&mut self, outline: StrokeDefinition) {
        self.outline = outline;
    }

    /// References an SVG filter by id, e.g. `Some("shadow")`.
    pub fn set_shadow_filter(&mut self, filter_id: Option<&str>) {
        self.shadow_filter = filter_id.map(str::to_string);
    }

    pub fn shadow_filter(&self) -> Option<&str> {
        self.shadow_filter.as_deref()
    }
}

/// A block ready to be painted.
///
/// ```
/// # use blockflow_core::color::Color;
/// # use blockflow_core::draw::{Drawable, Prism, PrismDefinition, PrismFaces};
/// # use blockflow_core::geometry::{Bounds, Point, Size};
/// let front = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
/// let faces = PrismFaces::new(front, front.to_polygon(), front.to_polygon(), front);
/// let definition = PrismDefinition::new(Color::new("#3B82F6").unwrap());
///
/// let output = Prism::new(&definition, faces).render_to_layers();
/// assert_eq!(output.count_in_layer(blockflow_core::draw::RenderLayer::Node), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Prism<'a> {
    definition: &'a PrismDefinition,
    faces: PrismFaces,
    front_animations: Vec<SvgNode>,
}

impl<'a> Prism<'a> {
    pub fn new(definition: &'a PrismDefinition, faces: PrismFaces) -> Self {
        Self {
            definition,
            faces,
            front_animations: Vec::new(),
        }
    }

    pub fn faces(&self) -> &PrismFaces {
        &self.faces
    }

    /// Attaches an SMIL animation element to the front face.
    pub fn add_front_animation(&mut self, animation: SvgNode) {
        self.front_animations.push(animation);
    }

    fn rounded_rect(&self, bounds: Bounds) -> svg_element::Rectangle {
        let def = self.definition;
        svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", def.corner_radius())
            .set("fill", def.fill().to_string())
    }

    fn face_polygon(&self, polygon: &Polygon, opacity: f32) -> svg_element::Polygon {
        svg_element::Polygon::new()
            .set("points", polygon.to_svg_points())
            .set("fill", self.definition.fill().to_string())
            .set("opacity", opacity)
    }
}

impl Drawable for Prism<'_> {
    fn render_to_layers(&self) -> LayeredOutput {
        let def = self.definition;
        let mut output = LayeredOutput::new();

        let back = self
            .rounded_rect(self.faces.back())
            .set("opacity", def.back_opacity());
        output.add_to_layer(RenderLayer::Node, Box::new(back));

        let side = self.face_polygon(self.faces.side(), def.side_opacity());
        output.add_to_layer(RenderLayer::Node, Box::new(side));

        let top = self.face_polygon(self.faces.top(), def.top_opacity());
        output.add_to_layer(RenderLayer::Node, Box::new(top));

        let mut front = apply_stroke!(self.rounded_rect(self.faces.front()), &def.outline);
        if def.front_opacity() < 1.0 {
            front = front.set("opacity", def.front_opacity());
        }
        if let Some(filter_id) = def.shadow_filter() {
            front = front.set("filter", format!("url(#{filter_id})"));
        }
        for animation in &self.front_animations {
            front = front.add(animation.clone());
        }
        output.add_to_layer(RenderLayer::Node, Box::new(front));

        output
    }

    fn bounds(&self) -> Bounds {
        self.faces.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};

    fn faces() -> PrismFaces {
        let front = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let back = front.translate(Point::new(5.0, -5.0));
        let side = Polygon::new(vec![
            Point::new(100.0, 0.0),
            Point::new(105.0, -5.0),
            Point::new(105.0, 45.0),
            Point::new(100.0, 50.0),
        ]);
        let top = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, -5.0),
            Point::new(105.0, -5.0),
            Point::new(100.0, 0.0),
        ]);
        PrismFaces::new(back, side, top, front)
    }

    fn render(prism: &Prism) -> String {
        prism
            .render_to_layers()
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_faces_bounds() {
        let bounds = faces().bounds();
        assert_eq!(bounds.min_point(), Point::new(0.0, -5.0));
        assert_eq!(bounds.max_x(), 105.0);
        assert_eq!(bounds.max_y(), 50.0);
    }

    #[test]
    fn test_render_paints_back_to_front() {
        let definition = PrismDefinition::new(Color::new("#10B981").unwrap());
        let rendered = render(&Prism::new(&definition, faces()));

        let back = rendered.find("opacity=\"0.3\"").unwrap();
        let side = rendered.find("opacity=\"0.5\"").unwrap();
        let top = rendered.find("opacity=\"0.4\"").unwrap();
        let front = rendered.find("stroke-width").unwrap();
        assert!(back < side && side < top && top < front);
    }

    #[test]
    fn test_front_face_shadow_and_opacity() {
        let mut definition = PrismDefinition::new(Color::new("#10B981").unwrap());
        let rendered = render(&Prism::new(&definition, faces()));
        assert!(!rendered.contains("filter="));

        definition.set_shadow_filter(Some("shadow"));
        definition.set_front_opacity(0.25);
        let rendered = render(&Prism::new(&definition, faces()));
        assert!(rendered.contains("filter=\"url(#shadow)\""));
        assert!(rendered.contains("opacity=\"0.25\""));
    }

    #[test]
    fn test_front_face_animation() {
        let definition = PrismDefinition::new(Color::new("#10B981").unwrap());
        let mut prism = Prism::new(&definition, faces());
        prism.add_front_animation(Box::new(
            svg_element::Animate::new()
                .set("attributeName", "opacity")
                .set("from", 0)
                .set("to", 1),
        ));
        let rendered = render(&prism);
        let animate = rendered.find("<animate").unwrap();
        let stroke = rendered.find("stroke-width").unwrap();
        assert!(stroke < animate);
        assert_eq!(rendered.matches("<animate").count(), 1);
    }

    #[test]
    fn test_definition_defaults() {
        let mut definition = PrismDefinition::new(Color::default());
        assert_eq!(definition.corner_radius(), 8.0);
        assert_eq!(definition.front_opacity(), 1.0);

        definition.set_face_opacities(0.1, 0.2, 0.3);
        definition.set_corner_radius(4.0);
        assert_eq!(definition.back_opacity(), 0.1);
        assert_eq!(definition.side_opacity(), 0.2);
        assert_eq!(definition.top_opacity(), 0.3);
        assert_eq!(definition.corner_radius(), 4.0);
    }
}
