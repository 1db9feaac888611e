//! Declarative scene definitions.
//!
//! A [`SceneDefinition`] is a plain data table of node and edge records. It
//! can be deserialized (the CLI reads it from TOML with `[[node]]` and
//! `[[edge]]` tables) or built in code with the `with_*` methods. Nothing is
//! validated here; see [`Diagram::from_definition`].
//!
//! [`Diagram::from_definition`]: crate::model::Diagram::from_definition
//!
//! # Example
//!
//! ```
//! use blockflow::definition::{EdgeDefinition, NodeDefinition, SceneDefinition};
//! use blockflow::model::{NodeRole, RoutingStyle};
//!
//! let scene = SceneDefinition::new()
//!     .with_node(NodeDefinition::new("encoder", NodeRole::Encoder, "Encoder", 260.0, 310.0, 380.0, 100.0)
//!         .with_depth(40.0)
//!         .with_stack_count(20))
//!     .with_node(NodeDefinition::new("decoder", NodeRole::Decoder, "Decoder", 190.0, 460.0, 300.0, 85.0))
//!     .with_edge(EdgeDefinition::new("encoder", "decoder").with_routing(RoutingStyle::CurvedLeft));
//!
//! assert_eq!(scene.nodes().len(), 2);
//! assert_eq!(scene.edges().len(), 1);
//! ```

use serde::Deserialize;

use crate::model::{EdgeKind, NodeRole, RoutingStyle};

/// Node and edge records of one scene.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDefinition {
    #[serde(default, rename = "node")]
    nodes: Vec<NodeDefinition>,

    #[serde(default, rename = "edge")]
    edges: Vec<EdgeDefinition>,
}

impl SceneDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeDefinition) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: EdgeDefinition) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeDefinition] {
        &self.edges
    }
}

/// One node record.
///
/// `color` and `text_color` default to the role's palette when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    id: String,
    role: NodeRole,
    label: String,
    #[serde(default)]
    sublabel: Option<String>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    depth: f32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    stack_count: Option<u32>,
}

impl NodeDefinition {
    /// Creates a node record with zero depth and role-default colors.
    pub fn new(
        id: impl Into<String>,
        role: NodeRole,
        label: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            label: label.into(),
            sublabel: None,
            x,
            y,
            width,
            height,
            depth: 0.0,
            color: None,
            text_color: None,
            icon: None,
            stack_count: None,
        }
    }

    pub fn with_sublabel(mut self, sublabel: impl Into<String>) -> Self {
        self.sublabel = Some(sublabel.into());
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, glyph: impl Into<String>) -> Self {
        self.icon = Some(glyph.into());
        self
    }

    pub fn with_stack_count(mut self, count: u32) -> Self {
        self.stack_count = Some(count);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sublabel(&self) -> Option<&str> {
        self.sublabel.as_deref()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn text_color(&self) -> Option<&str> {
        self.text_color.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn stack_count(&self) -> Option<u32> {
        self.stack_count
    }
}

fn default_animated() -> bool {
    true
}

fn default_stroke_color() -> String {
    "#000000".to_string()
}

/// One edge record.
///
/// Edges are animated, black, straight and of kind `primary` unless stated.
/// A missing `dash` falls back to the kind's default pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDefinition {
    #[serde(alias = "source")]
    from: String,
    #[serde(alias = "target")]
    to: String,
    #[serde(default)]
    kind: EdgeKind,
    #[serde(default)]
    routing: RoutingStyle,
    #[serde(default = "default_animated")]
    animated: bool,
    #[serde(default = "default_stroke_color")]
    stroke_color: String,
    #[serde(default)]
    dash: Option<String>,
}

impl EdgeDefinition {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            from: source.into(),
            to: target.into(),
            kind: EdgeKind::default(),
            routing: RoutingStyle::default(),
            animated: default_animated(),
            stroke_color: default_stroke_color(),
            dash: None,
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_routing(mut self, routing: RoutingStyle) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    /// Sets the dash pattern: `"solid"`, `"dashed"` or an SVG dasharray.
    pub fn with_dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.from
    }

    pub fn target(&self) -> &str {
        &self.to
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn routing(&self) -> RoutingStyle {
        self.routing
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn dash(&self) -> Option<&str> {
        self.dash.as_deref()
    }
}
