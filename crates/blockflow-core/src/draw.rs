//! Drawable components for scene rendering.
//!
//! Every drawable carries absolute scene geometry and implements
//! [`Drawable`], producing SVG nodes tagged with the layer they belong to.

mod badge;
mod block;
mod edge;
mod icon;
mod layer;
mod marker;
mod prism;
mod stroke;
mod text;

pub use badge::Badge;
pub use block::Block;
pub use edge::EdgeStroke;
pub use icon::Icon;
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use marker::FlowMarker;
pub use prism::{Prism, PrismDefinition, PrismFaces};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use text::{FontWeight, Text, TextBaseline, TextDefinition};

use crate::geometry::Bounds;

/// A visual element that can be rendered to layered SVG output.
pub trait Drawable: std::fmt::Debug {
    /// Renders this element into SVG nodes grouped by layer.
    fn render_to_layers(&self) -> LayeredOutput;

    /// Scene-space box enclosing everything this element draws.
    fn bounds(&self) -> Bounds;
}
