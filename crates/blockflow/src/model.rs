//! Validated scene model.
//!
//! A [`Diagram`] is built once from a [`SceneDefinition`] and is read-only
//! afterwards. Every invariant of the input is checked during construction:
//! positive box sizes, non-negative depths, unique node ids, parseable colors
//! and edge endpoints that name existing nodes.
//!
//! [`SceneDefinition`]: crate::definition::SceneDefinition

use std::fmt;

use indexmap::{IndexMap, map::Entry};
use log::{debug, info, trace};
use serde::Deserialize;

use blockflow_core::{
    color::Color,
    draw::StrokeStyle,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    definition::{EdgeDefinition, NodeDefinition, SceneDefinition},
    error::{BlockflowError, EdgeEndpoint},
};

/// Pipeline role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    Input,
    Tokenizer,
    Embedding,
    Projection,
    Encoder,
    Decoder,
    Output,
    Classification,
    Generation,
}

impl NodeRole {
    pub fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Tokenizer => "tokenizer",
            Self::Embedding => "embedding",
            Self::Projection => "projection",
            Self::Encoder => "encoder",
            Self::Decoder => "decoder",
            Self::Output => "output",
            Self::Classification => "classification",
            Self::Generation => "generation",
        }
    }

    /// Fill color used when a node does not name one.
    pub fn default_fill(self) -> &'static str {
        match self {
            Self::Input => "#F8FAFC",
            Self::Tokenizer => "#6366F1",
            Self::Embedding => "#10B981",
            Self::Projection => "#059669",
            Self::Encoder => "#3B82F6",
            Self::Decoder => "#8B5CF6",
            Self::Output => "#0EA5E9",
            Self::Classification => "#F59E0B",
            Self::Generation => "#7C3AED",
        }
    }

    /// Label color used when a node does not name one.
    ///
    /// Input blocks are near-white and get dark text; every other role gets white.
    pub fn default_label_color(self) -> &'static str {
        match self {
            Self::Input => "#1A202C",
            _ => "#FFFFFF",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colors and decorations of a node.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    fill: Color,
    label_color: Color,
    icon: Option<String>,
    stack_count: Option<u32>,
}

impl NodeStyle {
    pub fn new(fill: Color, label_color: Color) -> Self {
        Self {
            fill,
            label_color,
            icon: None,
            stack_count: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_stack_count(mut self, count: u32) -> Self {
        self.stack_count = Some(count);
        self
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn label_color(&self) -> Color {
        self.label_color
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn stack_count(&self) -> Option<u32> {
        self.stack_count
    }

    /// Count to show on the badge; `None` when no badge is drawn.
    pub fn badge_count(&self) -> Option<u32> {
        self.stack_count.filter(|count| *count > 0)
    }
}

/// A pipeline stage drawn as a pseudo-3D block.
#[derive(Debug, Clone)]
pub struct Node {
    id: Id,
    role: NodeRole,
    bounds: Bounds,
    depth: f32,
    style: NodeStyle,
    label: String,
    sublabel: Option<String>,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Front face of the block.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sublabel(&self) -> Option<&str> {
        self.sublabel.as_deref()
    }

    fn from_definition(def: &NodeDefinition) -> Result<Self, BlockflowError> {
        let id = def.id();
        let size = Size::new(def.width(), def.height());
        let origin = Point::new(def.x(), def.y());
        if !size.is_positive() || !def.x().is_finite() || !def.y().is_finite() {
            return Err(BlockflowError::DegenerateGeometry {
                id: id.to_string(),
                width: def.width(),
                height: def.height(),
            });
        }

        let depth = def.depth();
        if !depth.is_finite() || depth < 0.0 {
            return Err(BlockflowError::NegativeDepth {
                id: id.to_string(),
                depth,
            });
        }

        let owner = || format!("node `{id}`");
        let fill_str = def.color().unwrap_or(def.role().default_fill());
        let fill = Color::new(fill_str).map_err(|source| BlockflowError::InvalidColor {
            owner: owner(),
            field: "color",
            source,
        })?;
        let label_str = def
            .text_color()
            .unwrap_or(def.role().default_label_color());
        let label_color = Color::new(label_str).map_err(|source| BlockflowError::InvalidColor {
            owner: owner(),
            field: "text_color",
            source,
        })?;

        let mut style = NodeStyle::new(fill, label_color);
        if let Some(icon) = def.icon() {
            style = style.with_icon(icon);
        }
        if let Some(count) = def.stack_count() {
            style = style.with_stack_count(count);
        }

        Ok(Self {
            id: Id::new(id),
            role: def.role(),
            bounds: Bounds::new_from_top_left(origin, size),
            depth,
            style,
            label: def.label().to_string(),
            sublabel: def.sublabel().map(str::to_string),
        })
    }
}

/// How an edge is routed between its anchors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingStyle {
    #[default]
    Straight,
    CurvedLeft,
    CurvedRight,
}

impl RoutingStyle {
    pub fn is_curved(self) -> bool {
        !matches!(self, Self::Straight)
    }
}

/// Data relationship carried by an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    #[default]
    Primary,
    Attention,
    Classification,
    Generation,
}

impl EdgeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Attention => "attention",
            Self::Classification => "classification",
            Self::Generation => "generation",
        }
    }

    /// Dash pattern used when an edge does not name one.
    pub fn default_stroke_style(self) -> StrokeStyle {
        match self {
            Self::Attention => StrokeStyle::Dashed,
            _ => StrokeStyle::Solid,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A directed, styled connection between two nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    source: Id,
    target: Id,
    routing: RoutingStyle,
    animated: bool,
    stroke_color: Color,
    dash: StrokeStyle,
    kind: EdgeKind,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn routing(&self) -> RoutingStyle {
        self.routing
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn dash(&self) -> &StrokeStyle {
        &self.dash
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    fn from_definition(index: usize, def: &EdgeDefinition) -> Result<Self, BlockflowError> {
        let stroke_color =
            Color::new(def.stroke_color()).map_err(|source| BlockflowError::InvalidColor {
                owner: format!("edge #{index}"),
                field: "stroke_color",
                source,
            })?;

        let dash = match def.dash() {
            Some(pattern) => pattern
                .parse::<StrokeStyle>()
                .unwrap_or_else(|never| match never {}),
            None => def.kind().default_stroke_style(),
        };

        Ok(Self {
            source: Id::new(def.source()),
            target: Id::new(def.target()),
            routing: def.routing(),
            animated: def.animated(),
            stroke_color,
            dash,
            kind: def.kind(),
        })
    }
}

/// The validated node set and edge list of a scene.
///
/// Nodes keep their definition order, which is also their paint order.
#[derive(Debug, Clone)]
pub struct Diagram {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Validates a definition and builds the diagram.
    ///
    /// # Errors
    ///
    /// - [`BlockflowError::DegenerateGeometry`] for a non-positive or non-finite box
    /// - [`BlockflowError::NegativeDepth`] for a negative or non-finite depth
    /// - [`BlockflowError::DuplicateNode`] when two nodes share an id
    /// - [`BlockflowError::InvalidColor`] for an unparseable color string
    /// - [`BlockflowError::UnknownNodeReference`] for an edge naming an absent node
    pub fn from_definition(definition: &SceneDefinition) -> Result<Self, BlockflowError> {
        let mut nodes = IndexMap::with_capacity(definition.nodes().len());
        for node_def in definition.nodes() {
            let node = Node::from_definition(node_def)?;
            trace!(id = node_def.id(), role = node.role().name(); "Validated node");
            match nodes.entry(node.id()) {
                Entry::Occupied(_) => {
                    return Err(BlockflowError::DuplicateNode {
                        id: node_def.id().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
        }

        let mut edges = Vec::with_capacity(definition.edges().len());
        for (index, edge_def) in definition.edges().iter().enumerate() {
            for (endpoint, name) in [
                (EdgeEndpoint::Source, edge_def.source()),
                (EdgeEndpoint::Target, edge_def.target()),
            ] {
                if !nodes.contains_key(&Id::new(name)) {
                    return Err(BlockflowError::UnknownNodeReference {
                        edge_index: index,
                        endpoint,
                        id: name.to_string(),
                    });
                }
            }
            let edge = Edge::from_definition(index, edge_def)?;
            trace!(
                index,
                source = edge_def.source(),
                target = edge_def.target(),
                kind = edge.kind().name();
                "Validated edge"
            );
            edges.push(edge);
        }

        debug!(nodes = nodes.len(), edges = edges.len(); "Diagram validated");
        let self_loops = edges.iter().filter(|edge| edge.is_self_loop()).count();
        if self_loops > 0 {
            info!(self_loops; "Diagram contains self-loop edges");
        }

        Ok(Self { nodes, edges })
    }

    /// Looks up a node by id.
    pub fn find_node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in definition order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolves both endpoints of an edge.
    ///
    /// Always `Some` for edges of this diagram, since endpoints are checked
    /// during construction.
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.find_node(edge.source())?, self.find_node(edge.target())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> SceneDefinition {
        SceneDefinition::new()
            .with_node(NodeDefinition::new("a", NodeRole::Input, "A", 0.0, 0.0, 100.0, 50.0).with_depth(10.0))
            .with_node(
                NodeDefinition::new("b", NodeRole::Tokenizer, "B", 0.0, 100.0, 100.0, 50.0)
                    .with_depth(10.0),
            )
    }

    #[test]
    fn test_edges_between_present_nodes_construct() {
        let definition = two_nodes().with_edge(EdgeDefinition::new("a", "b"));
        let diagram = Diagram::from_definition(&definition).unwrap();

        assert_eq!(diagram.node_count(), 2);
        assert_eq!(diagram.edges().len(), 1);
        let (source, target) = diagram.endpoints(&diagram.edges()[0]).unwrap();
        assert_eq!(source.id(), "a");
        assert_eq!(target.id(), "b");
    }

    #[test]
    fn test_unknown_target_fails() {
        let definition = two_nodes().with_edge(EdgeDefinition::new("a", "missing"));
        let err = Diagram::from_definition(&definition).unwrap_err();
        match err {
            BlockflowError::UnknownNodeReference {
                edge_index,
                endpoint,
                id,
            } => {
                assert_eq!(edge_index, 0);
                assert_eq!(endpoint, EdgeEndpoint::Target);
                assert_eq!(id, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_source_fails() {
        let definition = two_nodes()
            .with_edge(EdgeDefinition::new("a", "b"))
            .with_edge(EdgeDefinition::new("ghost", "b"));
        assert!(matches!(
            Diagram::from_definition(&definition),
            Err(BlockflowError::UnknownNodeReference {
                edge_index: 1,
                endpoint: EdgeEndpoint::Source,
                ..
            })
        ));
    }

    #[test]
    fn test_degenerate_geometry() {
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (f32::NAN, 10.0), (10.0, f32::INFINITY)] {
            let definition = SceneDefinition::new()
                .with_node(NodeDefinition::new("flat", NodeRole::Output, "F", 0.0, 0.0, w, h));
            assert!(matches!(
                Diagram::from_definition(&definition),
                Err(BlockflowError::DegenerateGeometry { .. })
            ));
        }
    }

    #[test]
    fn test_negative_depth() {
        let definition = SceneDefinition::new().with_node(
            NodeDefinition::new("n", NodeRole::Output, "N", 0.0, 0.0, 10.0, 10.0).with_depth(-1.0),
        );
        assert!(matches!(
            Diagram::from_definition(&definition),
            Err(BlockflowError::NegativeDepth { .. })
        ));
    }

    #[test]
    fn test_zero_depth_is_valid() {
        let definition = SceneDefinition::new()
            .with_node(NodeDefinition::new("n", NodeRole::Output, "N", 0.0, 0.0, 10.0, 10.0));
        let diagram = Diagram::from_definition(&definition).unwrap();
        assert_eq!(diagram.find_node(Id::new("n")).unwrap().depth(), 0.0);
    }

    #[test]
    fn test_duplicate_node() {
        let definition = two_nodes().with_node(NodeDefinition::new(
            "a",
            NodeRole::Output,
            "again",
            0.0,
            0.0,
            10.0,
            10.0,
        ));
        assert!(matches!(
            Diagram::from_definition(&definition),
            Err(BlockflowError::DuplicateNode { id }) if id == "a"
        ));
    }

    #[test]
    fn test_invalid_colors() {
        let definition = SceneDefinition::new().with_node(
            NodeDefinition::new("n", NodeRole::Output, "N", 0.0, 0.0, 10.0, 10.0)
                .with_color("not-a-color"),
        );
        assert!(matches!(
            Diagram::from_definition(&definition),
            Err(BlockflowError::InvalidColor { field: "color", .. })
        ));

        let definition = two_nodes().with_edge(EdgeDefinition::new("a", "b").with_stroke_color("??"));
        assert!(matches!(
            Diagram::from_definition(&definition),
            Err(BlockflowError::InvalidColor {
                field: "stroke_color",
                ..
            })
        ));
    }

    #[test]
    fn test_parallel_edges_and_self_loops_allowed() {
        let definition = two_nodes()
            .with_edge(EdgeDefinition::new("a", "b"))
            .with_edge(EdgeDefinition::new("a", "b"))
            .with_edge(EdgeDefinition::new("b", "b"));
        let diagram = Diagram::from_definition(&definition).unwrap();
        assert_eq!(diagram.edges().len(), 3);
        assert!(diagram.edges()[2].is_self_loop());
    }

    #[test]
    fn test_role_defaults_and_order() {
        let diagram = Diagram::from_definition(&two_nodes()).unwrap();
        let ids: Vec<String> = diagram.nodes().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);

        let input = diagram.find_node(Id::new("a")).unwrap();
        assert_eq!(input.style().fill(), Color::new("#F8FAFC").unwrap());
        assert_eq!(input.style().label_color(), Color::new("#1A202C").unwrap());
        assert!(diagram.find_node(Id::new("zzz")).is_none());
    }

    #[test]
    fn test_attention_edges_default_to_dashed() {
        let definition = two_nodes()
            .with_edge(EdgeDefinition::new("a", "b").with_kind(EdgeKind::Attention))
            .with_edge(
                EdgeDefinition::new("a", "b")
                    .with_kind(EdgeKind::Attention)
                    .with_dash("none"),
            );
        let diagram = Diagram::from_definition(&definition).unwrap();
        assert_eq!(*diagram.edges()[0].dash(), StrokeStyle::Dashed);
        assert_eq!(*diagram.edges()[1].dash(), StrokeStyle::Solid);
    }

    #[test]
    fn test_badge_count() {
        let color = Color::default();
        assert_eq!(NodeStyle::new(color, color).badge_count(), None);
        assert_eq!(NodeStyle::new(color, color).with_stack_count(0).badge_count(), None);
        assert_eq!(NodeStyle::new(color, color).with_stack_count(7).badge_count(), Some(7));
    }
}
