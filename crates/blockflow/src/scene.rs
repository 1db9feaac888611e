//! A mounted, renderable scene.

use std::{sync::mpsc, time::Duration};

use log::{debug, info, warn};

use blockflow_core::{
    draw::{LayeredOutput, Text, TextDefinition},
    identifier::Id,
    path::EdgePath,
};

use crate::{
    BlockflowError,
    animation::{ClockDriver, FlowAnimator, MarkerFrame, PhaseClock},
    compose::{RenderMode, SceneComposer},
    config::AppConfig,
    export::{Exporter, svg::Svg},
    model::{Diagram, Node},
    projection::ProjectionEngine,
    route::EdgeRouter,
};

/// A validated diagram with its routed geometry and its phase clock.
///
/// Geometry is computed once, at construction. Rendering never fails for
/// geometric reasons; only the export step can fail.
///
/// The clock is started by [`Scene::mount`] and stopped by
/// [`Scene::unmount`] or when the scene is dropped.
#[derive(Debug)]
pub struct Scene {
    diagram: Diagram,
    config: AppConfig,
    projection: ProjectionEngine,
    animator: FlowAnimator,
    paths: Vec<EdgePath>,
    clock: PhaseClock,
}

impl Scene {
    pub(crate) fn new(
        diagram: Diagram,
        config: AppConfig,
        driver: ClockDriver,
    ) -> Result<Self, BlockflowError> {
        let projection = ProjectionEngine::new(config.projection().clone());
        let router = EdgeRouter::new(config.routing().clone());
        let animator = FlowAnimator::new(config.animation().clone());
        let clock = PhaseClock::from_config(config.animation(), driver)?;

        let paths = diagram
            .edges()
            .iter()
            .filter_map(|edge| {
                let (source, target) = diagram.endpoints(edge)?;
                Some(router.route(source, target, edge.routing()))
            })
            .collect::<Vec<_>>();
        debug!(paths = paths.len(); "Edges routed");

        let scene = Self {
            diagram,
            config,
            projection,
            animator,
            paths,
            clock,
        };
        scene.check_label_overflow();
        Ok(scene)
    }

    fn check_label_overflow(&self) {
        let mut definition = TextDefinition::label();
        definition.set_font_family(self.config.style().font_family());
        for node in self.diagram.nodes() {
            let size = Text::new(&definition, node.label(), node.bounds().center()).calculate_size();
            if size.width() > node.bounds().width() {
                warn!(
                    id = node.id().to_string(),
                    label_width = size.width(),
                    node_width = node.bounds().width();
                    "Label is wider than its node"
                );
            }
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Looks up a node by id.
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.diagram.find_node(Id::new(id))
    }

    /// Routed path of the edge at `edge_index`.
    pub fn path(&self, edge_index: usize) -> Option<&EdgePath> {
        self.paths.get(edge_index)
    }

    /// Routed paths of all edges, by edge index.
    pub fn paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub fn animator(&self) -> &FlowAnimator {
        &self.animator
    }

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    /// Current phase of the clock.
    pub fn phase(&self) -> usize {
        self.clock.phase()
    }

    pub fn is_mounted(&self) -> bool {
        self.clock.is_running()
    }

    /// Starts the phase clock.
    ///
    /// The returned channel receives the new phase on every advance; the host
    /// re-renders when it fires.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Animation`] if the scene is already mounted
    /// or the timer thread cannot be spawned.
    pub fn mount(&mut self) -> Result<mpsc::Receiver<usize>, BlockflowError> {
        let receiver = self.clock.start()?;
        info!(
            nodes = self.diagram.node_count(),
            edges = self.diagram.edges().len();
            "Scene mounted"
        );
        Ok(receiver)
    }

    /// Stops the phase clock. Idempotent.
    pub fn unmount(&mut self) {
        if self.clock.is_running() {
            info!(phase = self.clock.phase(); "Scene unmounted");
        }
        self.clock.stop();
    }

    /// Advances simulated time on a manually driven clock.
    ///
    /// Returns the phase after the tick.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.clock.tick(dt)
    }

    /// Time after which every mount reveal has completed.
    pub fn settle_time(&self) -> Duration {
        self.animator.settle_time(self.diagram.node_count())
    }

    /// Marker of the edge at `edge_index` at raw loop fraction `t`.
    ///
    /// `None` for unknown or non-animated edges.
    pub fn marker_at(&self, edge_index: usize, t: f32) -> Option<MarkerFrame> {
        let edge = self.diagram.edges().get(edge_index)?;
        if !edge.animated() {
            return None;
        }
        let path = self.paths.get(edge_index)?;
        Some(self.animator.marker_at(path, t))
    }

    fn composer(&self) -> SceneComposer<'_> {
        SceneComposer::new(
            &self.diagram,
            &self.paths,
            &self.projection,
            &self.animator,
            self.config.style(),
        )
    }

    /// Composes one frame at `elapsed` since mount, using the current phase.
    ///
    /// Once the scene has been unmounted its markers are cancelled: frames
    /// show the strokes and blocks only, until the scene is mounted again.
    pub fn compose_frame(&self, elapsed: Duration) -> LayeredOutput {
        self.composer().compose(self.frame_mode(elapsed))
    }

    fn frame_mode(&self, elapsed: Duration) -> RenderMode {
        RenderMode::Frame {
            elapsed,
            phase: self.phase(),
            stopped: self.clock.is_stopped(),
        }
    }

    /// Composes the self-animating scene.
    pub fn compose_animated(&self) -> LayeredOutput {
        self.composer()
            .compose(RenderMode::Animated { phase: self.phase() })
    }

    /// Exports a composed render pass through `exporter`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Export`] when the exporter fails.
    pub fn export<E: Exporter>(
        &self,
        exporter: &mut E,
        mode: RenderMode,
    ) -> Result<(), BlockflowError> {
        let layers = self.composer().compose(mode);
        exporter.export_scene(layers)?;
        Ok(())
    }

    /// Renders one frame at `elapsed` since mount to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Export`] when the document cannot be written.
    pub fn render_frame(&self, elapsed: Duration) -> Result<String, BlockflowError> {
        self.render_svg(self.frame_mode(elapsed))
    }

    /// Renders the self-animating SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Export`] when the document cannot be written.
    pub fn render_animated(&self) -> Result<String, BlockflowError> {
        self.render_svg(RenderMode::Animated {
            phase: self.phase(),
        })
    }

    fn render_svg(&self, mode: RenderMode) -> Result<String, BlockflowError> {
        let mut exporter = Svg::new(Vec::new(), self.config.style().clone());
        self.export(&mut exporter, mode)?;
        String::from_utf8(exporter.into_inner()).map_err(|err| {
            BlockflowError::from(crate::export::Error::Render(format!(
                "SVG output is not valid UTF-8: {err}"
            )))
        })
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.unmount();
    }
}
