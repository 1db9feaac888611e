//! Blockflow - pseudo-3D architecture diagrams with animated data flow
//!
//! This library renders a fixed set of labeled blocks ("nodes") and directed
//! connections ("edges") as an SVG scene. Blocks are extruded into
//! pseudo-3D prisms, edges are routed between fixed anchor points, and small
//! markers travel along animated edges, staggered by a recurring phase clock.
//!
//! # Pipeline
//!
//! ```text
//! SceneDefinition (Rust value or TOML)
//!     ↓ validate           (model)
//! Diagram
//!     ↓ project, route     (projection, route)
//! Scene
//!     ↓ compose            (compose, animation)
//! LayeredOutput
//!     ↓ export             (export)
//! SVG document
//! ```

pub mod animation;
pub mod compose;
pub mod config;
pub mod definition;
pub mod export;
pub mod model;
pub mod projection;
pub mod route;

mod error;
mod scene;

pub use blockflow_core::{color, draw, geometry, identifier, path};

pub use error::{BlockflowError, EdgeEndpoint};
pub use scene::Scene;

use log::{debug, info};

use animation::ClockDriver;
use config::AppConfig;
use definition::SceneDefinition;
use model::Diagram;

/// Builder for validated, renderable scenes.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use blockflow::{SceneBuilder, animation::ClockDriver, config::AppConfig};
/// use blockflow::definition::{EdgeDefinition, NodeDefinition, SceneDefinition};
/// use blockflow::model::NodeRole;
///
/// let definition = SceneDefinition::new()
///     .with_node(NodeDefinition::new("a", NodeRole::Input, "A", 0.0, 0.0, 100.0, 50.0))
///     .with_node(NodeDefinition::new("b", NodeRole::Output, "B", 0.0, 100.0, 100.0, 50.0))
///     .with_edge(EdgeDefinition::new("a", "b"));
///
/// let mut scene = SceneBuilder::new(AppConfig::default())
///     .with_driver(ClockDriver::Manual)
///     .build(&definition)
///     .expect("valid scene");
///
/// let _ticks = scene.mount().expect("clock starts");
/// let svg = scene.render_frame(Duration::from_secs(2)).expect("renders");
/// assert!(svg.contains("data-layer=\"edge\""));
/// scene.unmount();
/// ```
#[derive(Debug, Default)]
pub struct SceneBuilder {
    config: AppConfig,
    driver: ClockDriver,
}

impl SceneBuilder {
    /// Creates a builder with the given configuration and a thread-driven
    /// clock.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            driver: ClockDriver::default(),
        }
    }

    /// Selects what advances the phase clock.
    pub fn with_driver(mut self, driver: ClockDriver) -> Self {
        self.driver = driver;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validates a definition into a [`Diagram`].
    ///
    /// # Errors
    ///
    /// Returns the first construction error found; see
    /// [`Diagram::from_definition`].
    pub fn validate(&self, definition: &SceneDefinition) -> Result<Diagram, BlockflowError> {
        Diagram::from_definition(definition)
    }

    /// Validates the configuration and the definition and builds the scene.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Config`] for an unusable configuration, or
    /// the first construction error of the definition. No scene is built on
    /// error.
    pub fn build(&self, definition: &SceneDefinition) -> Result<Scene, BlockflowError> {
        info!(
            nodes = definition.nodes().len(),
            edges = definition.edges().len();
            "Building scene"
        );
        self.config.validate()?;
        let diagram = self.validate(definition)?;
        let scene = Scene::new(diagram, self.config.clone(), self.driver)?;
        debug!(driver:? = self.driver; "Scene built");
        Ok(scene)
    }
}
