//! Scene composition.
//!
//! A render pass walks the diagram once: first every edge stroke with its
//! flow marker in edge-list order, then every node block in node-list order.
//! The result is a [`LayeredOutput`], so edges end up underneath blocks no
//! matter how the layers are later flattened.
//!
//! Two modes are supported. [`RenderMode::Frame`] samples the animation at
//! one instant. [`RenderMode::Animated`] emits SMIL children so the document
//! animates itself.

use std::time::Duration;

use log::trace;
use svg::node::element as svg_element;

use blockflow_core::{
    draw::{
        Badge, Block, Drawable, EdgeStroke, FlowMarker, Icon, LayeredOutput, Prism, StrokeCap,
        StrokeDefinition, SvgNode, Text, TextDefinition,
    },
    geometry::Point,
    path::EdgePath,
};

use crate::{
    animation::{FlowAnimator, Transition},
    config::StyleConfig,
    export::svg::SHADOW_FILTER_ID,
    model::{Diagram, Edge, Node},
    projection::ProjectionEngine,
};

/// Duration of the opacity step that shows a curved marker in animated output.
const MARKER_APPEAR: Duration = Duration::from_millis(100);

/// What a render pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One frame at `elapsed` since mount, with the clock at `phase`.
    /// Markers are left out when the clock has been `stopped`.
    Frame {
        elapsed: Duration,
        phase: usize,
        stopped: bool,
    },
    /// A self-animating scene with markers staggered for `phase`.
    Animated { phase: usize },
}

/// Formats a duration as an SMIL clock value, e.g. `0.3s`.
fn clock_value(duration: Duration) -> String {
    format!("{}s", duration.as_secs_f32())
}

/// `<animate>` taking `opacity` from 0 to 1 once.
fn fade_in(transition: Transition) -> SvgNode {
    Box::new(
        svg_element::Animate::new()
            .set("attributeName", "opacity")
            .set("from", 0)
            .set("to", 1)
            .set("begin", clock_value(transition.delay))
            .set("dur", clock_value(transition.duration))
            .set("fill", "freeze"),
    )
}

/// Composes render passes over a validated diagram and its routed paths.
#[derive(Debug)]
pub struct SceneComposer<'a> {
    diagram: &'a Diagram,
    paths: &'a [EdgePath],
    projection: &'a ProjectionEngine,
    animator: &'a FlowAnimator,
    style: &'a StyleConfig,
}

impl<'a> SceneComposer<'a> {
    /// `paths` holds the routed path of every edge, by edge index.
    pub fn new(
        diagram: &'a Diagram,
        paths: &'a [EdgePath],
        projection: &'a ProjectionEngine,
        animator: &'a FlowAnimator,
        style: &'a StyleConfig,
    ) -> Self {
        Self {
            diagram,
            paths,
            projection,
            animator,
            style,
        }
    }

    /// Runs one render pass.
    pub fn compose(&self, mode: RenderMode) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for (index, (edge, path)) in self.diagram.edges().iter().zip(self.paths).enumerate() {
            self.compose_edge(&mut output, index, edge, path, mode);
        }
        for (index, node) in self.diagram.nodes().enumerate() {
            self.compose_block(&mut output, index, node, mode);
        }

        output
    }

    fn edge_stroke(&self, edge: &Edge) -> StrokeDefinition {
        let mut stroke = StrokeDefinition::new(edge.stroke_color(), self.style.edge_width());
        stroke.set_style(edge.dash().clone());
        stroke.set_cap(StrokeCap::Round);
        stroke
    }

    fn compose_edge(
        &self,
        output: &mut LayeredOutput,
        index: usize,
        edge: &Edge,
        path: &EdgePath,
        mode: RenderMode,
    ) {
        let stroke = self.edge_stroke(edge);
        let dom_id = format!("edge-{index}");
        let reveal = self.animator.config().reveal();
        let radius = self.animator.config().marker_radius();

        match mode {
            RenderMode::Frame {
                elapsed,
                phase,
                stopped,
            } => {
                let opacity = self.animator.edge_opacity(path, elapsed);
                let edge_stroke = EdgeStroke::new(path, &stroke)
                    .with_dom_id(dom_id)
                    .with_opacity(opacity);
                output.merge(edge_stroke.render_to_layers());

                if stopped || !edge.animated() {
                    return;
                }
                if let Some(frame) = self.animator.marker_frame(path, phase, index, elapsed) {
                    trace!(
                        index,
                        t = frame.t(),
                        x = frame.position().x(),
                        y = frame.position().y();
                        "Marker sampled"
                    );
                    let marker = FlowMarker::new(frame.position(), radius, edge.stroke_color())
                        .with_opacity(frame.opacity());
                    output.merge(marker.render_to_layers());
                }
            }
            RenderMode::Animated { phase } => {
                let mut edge_stroke = EdgeStroke::new(path, &stroke).with_dom_id(dom_id);
                if reveal {
                    edge_stroke = edge_stroke.with_opacity(0.0);
                    edge_stroke.add_animation(fade_in(self.animator.edge_reveal(path)));
                }
                output.merge(edge_stroke.render_to_layers());

                if edge.animated() {
                    let marker = self.animated_marker(edge, path, phase, index);
                    output.merge(marker.render_to_layers());
                }
            }
        }
    }

    /// A marker parked at the origin and moved along `path` by `animateMotion`.
    fn animated_marker(
        &self,
        edge: &Edge,
        path: &EdgePath,
        phase: usize,
        index: usize,
    ) -> FlowMarker {
        let config = self.animator.config();
        let begin = clock_value(self.animator.marker_delay(phase, index));
        let dur = clock_value(self.animator.marker_duration(path));

        let mut motion = svg_element::AnimateMotion::new()
            .set("path", path.to_path_data())
            .set("begin", begin.as_str())
            .set("dur", dur.as_str())
            .set("repeatCount", "indefinite");
        if let Some(spline) = config.easing().key_spline() {
            motion = motion
                .set("calcMode", "spline")
                .set("keyPoints", "0;1")
                .set("keyTimes", "0;1")
                .set("keySplines", spline);
        }

        let visibility = if path.is_curved() {
            svg_element::Animate::new()
                .set("attributeName", "opacity")
                .set("from", 0)
                .set("to", 1)
                .set("begin", begin.as_str())
                .set("dur", clock_value(MARKER_APPEAR))
                .set("fill", "freeze")
        } else {
            svg_element::Animate::new()
                .set("attributeName", "opacity")
                .set("values", "0;1;0")
                .set("begin", begin.as_str())
                .set("dur", dur.as_str())
                .set("repeatCount", "indefinite")
        };

        let mut marker = FlowMarker::new(Point::default(), config.marker_radius(), edge.stroke_color())
            .with_opacity(0.0);
        marker.add_animation(Box::new(motion));
        marker.add_animation(Box::new(visibility));
        marker
    }

    fn compose_block(&self, output: &mut LayeredOutput, index: usize, node: &Node, mode: RenderMode) {
        let shadow = self.style.shadow().then_some(SHADOW_FILTER_ID);
        let mut definition = self.projection.definition(node, shadow);
        let layout = self.projection.decorations(node);
        let reveal = self.animator.config().reveal();

        let mut badge_opacity = 1.0;
        let mut animations: Vec<SvgNode> = Vec::new();
        match mode {
            RenderMode::Frame { elapsed, .. } => {
                definition.set_front_opacity(self.animator.node_opacity(index, elapsed));
                badge_opacity = self.animator.badge_opacity(index, elapsed);
            }
            RenderMode::Animated { .. } if reveal => {
                definition.set_front_opacity(0.0);
                badge_opacity = 0.0;
                animations.push(fade_in(self.animator.node_reveal(index)));
            }
            RenderMode::Animated { .. } => {}
        }

        let mut prism = Prism::new(&definition, self.projection.project_node(node));
        for animation in animations {
            prism.add_front_animation(animation);
        }

        let font_family = self.style.font_family();
        let label_color = node.style().label_color();
        let mut label_def = TextDefinition::label().with_color(label_color);
        label_def.set_font_family(font_family);
        let mut sublabel_def = TextDefinition::sublabel().with_color(label_color);
        sublabel_def.set_font_family(font_family);

        let mut block = Block::new(prism, Text::new(&label_def, node.label(), layout.label));

        if let Some((center, count)) = layout.badge {
            let mut badge = Badge::new(count, center, node.style().fill()).with_opacity(badge_opacity);
            if matches!(mode, RenderMode::Animated { .. }) && reveal {
                badge.add_animation(fade_in(self.animator.badge_reveal(index)));
            }
            if badge_opacity > 0.0 || matches!(mode, RenderMode::Animated { .. }) {
                block = block.with_badge(badge);
            }
        }
        if let (Some(center), Some(glyph)) = (layout.icon, node.style().icon()) {
            block = block.with_icon(Icon::new(glyph, center, label_color));
        }
        if let (Some(anchor), Some(sublabel)) = (layout.sublabel, node.sublabel()) {
            block = block.with_sublabel(Text::new(&sublabel_def, sublabel, anchor));
        }

        output.merge(block.render_to_layers());
    }
}

#[cfg(test)]
mod tests {
    use blockflow_core::draw::RenderLayer;

    use super::*;
    use crate::{
        config::AnimationConfig,
        definition::{EdgeDefinition, NodeDefinition, SceneDefinition},
        model::{NodeRole, RoutingStyle},
        route::EdgeRouter,
    };

    struct Fixture {
        diagram: Diagram,
        paths: Vec<EdgePath>,
        projection: ProjectionEngine,
        animator: FlowAnimator,
        style: StyleConfig,
    }

    impl Fixture {
        fn new(animation: AnimationConfig) -> Self {
            let definition = SceneDefinition::new()
                .with_node(
                    NodeDefinition::new("a", NodeRole::Encoder, "A", 0.0, 0.0, 100.0, 50.0)
                        .with_depth(10.0)
                        .with_stack_count(4),
                )
                .with_node(
                    NodeDefinition::new("b", NodeRole::Output, "B", 0.0, 100.0, 100.0, 50.0)
                        .with_depth(10.0)
                        .with_sublabel("sub")
                        .with_icon("◆"),
                )
                .with_edge(EdgeDefinition::new("a", "b"))
                .with_edge(
                    EdgeDefinition::new("a", "b")
                        .with_routing(RoutingStyle::CurvedLeft)
                        .with_animated(false),
                );
            let diagram = Diagram::from_definition(&definition).unwrap();
            let router = EdgeRouter::default();
            let paths = diagram
                .edges()
                .iter()
                .map(|edge| {
                    let (source, target) = diagram.endpoints(edge).unwrap();
                    router.route(source, target, edge.routing())
                })
                .collect();
            Self {
                diagram,
                paths,
                projection: ProjectionEngine::default(),
                animator: FlowAnimator::new(animation),
                style: StyleConfig::default(),
            }
        }

        fn composer(&self) -> SceneComposer<'_> {
            SceneComposer::new(
                &self.diagram,
                &self.paths,
                &self.projection,
                &self.animator,
                &self.style,
            )
        }
    }

    fn render(output: LayeredOutput) -> String {
        output.render().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_frame_layer_counts() {
        let fixture = Fixture::new(AnimationConfig::default());
        let output = fixture.composer().compose(RenderMode::Frame {
            elapsed: Duration::from_secs(10),
            phase: 0,
            stopped: false,
        });
        // Two strokes plus one marker; the curved edge is not animated
        assert_eq!(output.count_in_layer(RenderLayer::Edge), 3);
        // a: 4 faces + badge + label; b: 4 faces + icon (2) + label + sublabel
        assert_eq!(output.count_in_layer(RenderLayer::Node), 14);
    }

    #[test]
    fn test_edges_precede_blocks() {
        let fixture = Fixture::new(AnimationConfig::default());
        let rendered = render(fixture.composer().compose(RenderMode::Frame {
            elapsed: Duration::from_secs(10),
            phase: 0,
            stopped: false,
        }));
        let edge = rendered.find("id=\"edge-0\"").unwrap();
        let curved = rendered.find("id=\"edge-1\"").unwrap();
        let block = rendered.find("×4").unwrap();
        assert!(edge < curved && curved < block);
        assert!(rendered.contains("filter=\"url(#shadow)\""));
        assert!(rendered.contains("stroke-linecap=\"round\""));
    }

    #[test]
    fn test_badge_hidden_early_in_frame() {
        let fixture = Fixture::new(AnimationConfig::default());
        let rendered = render(fixture.composer().compose(RenderMode::Frame {
            elapsed: Duration::ZERO,
            phase: 0,
            stopped: false,
        }));
        assert!(!rendered.contains("×4"));
    }

    #[test]
    fn test_stopped_frame_has_no_markers() {
        let fixture = Fixture::new(AnimationConfig::default());
        let output = fixture.composer().compose(RenderMode::Frame {
            elapsed: Duration::from_secs(10),
            phase: 0,
            stopped: true,
        });
        // Both strokes, no marker
        assert_eq!(output.count_in_layer(RenderLayer::Edge), 2);
    }

    #[test]
    fn test_animated_mode_emits_smil() {
        let fixture = Fixture::new(AnimationConfig::default());
        let rendered = render(fixture.composer().compose(RenderMode::Animated { phase: 0 }));
        assert_eq!(rendered.matches("<animateMotion").count(), 1);
        assert!(rendered.contains("path=\"M 50 50 L 50 100\""));
        assert!(rendered.contains("repeatCount=\"indefinite\""));
        assert!(rendered.contains("keySplines=\"0.42 0 0.58 1\""));
        assert!(rendered.contains("values=\"0;1;0\""));
        assert!(rendered.contains("dur=\"2.5s\""));
        // Badge stays in the document, hidden until its reveal
        assert!(rendered.contains("×4"));
    }

    #[test]
    fn test_animated_without_reveal() {
        let fixture = Fixture::new(AnimationConfig::default().with_reveal(false));
        let rendered = render(fixture.composer().compose(RenderMode::Animated { phase: 0 }));
        assert!(!rendered.contains("fill=\"freeze\""));
        assert_eq!(rendered.matches("<animateMotion").count(), 1);
    }
}
