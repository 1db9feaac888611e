//! Configuration types for Blockflow rendering.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name the values it overrides.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`RoutingConfig`] - Edge routing constants.
//! - [`ProjectionConfig`] - Pseudo-3D face geometry and opacities.
//! - [`AnimationConfig`] - Phase clock, flow marker and reveal timing.
//! - [`StyleConfig`] - Document size, background and stroke styling.
//!
//! # Example
//!
//! ```
//! # use blockflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.routing().lateral_offset(), 60.0);
//! assert_eq!(config.animation().phase_count(), 3);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use blockflow_core::{color::Color, easing::Easing};

use crate::BlockflowError;

/// Top-level configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    routing: RoutingConfig,

    #[serde(default)]
    projection: ProjectionConfig,

    #[serde(default)]
    animation: AnimationConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(
        routing: RoutingConfig,
        projection: ProjectionConfig,
        animation: AnimationConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            routing,
            projection,
            animation,
            style,
        }
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn projection(&self) -> &ProjectionConfig {
        &self.projection
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks values that deserialize fine but cannot be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`BlockflowError::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<(), BlockflowError> {
        let finite_non_negative = |name: &str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(BlockflowError::Config(format!(
                    "`{name}` must be a finite, non-negative number, got {value}"
                )))
            }
        };

        if !self.routing.lateral_offset.is_finite() {
            return Err(BlockflowError::Config(format!(
                "`routing.lateral_offset` must be finite, got {}",
                self.routing.lateral_offset
            )));
        }
        finite_non_negative("projection.depth_factor", self.projection.depth_factor)?;
        finite_non_negative("projection.corner_radius", self.projection.corner_radius)?;
        for (name, value) in [
            ("projection.back_opacity", self.projection.back_opacity),
            ("projection.side_opacity", self.projection.side_opacity),
            ("projection.top_opacity", self.projection.top_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BlockflowError::Config(format!(
                    "`{name}` must be between 0 and 1, got {value}"
                )));
            }
        }
        finite_non_negative("animation.marker_radius", self.animation.marker_radius)?;
        finite_non_negative("style.edge_width", self.style.edge_width)?;

        if self.animation.phase_interval_ms == 0 {
            return Err(BlockflowError::Config(
                "`animation.phase_interval_ms` must be greater than zero".to_string(),
            ));
        }
        if self.animation.phase_count == 0 {
            return Err(BlockflowError::Config(
                "`animation.phase_count` must be greater than zero".to_string(),
            ));
        }
        if self.animation.straight_marker_ms == 0 || self.animation.curved_marker_ms == 0 {
            return Err(BlockflowError::Config(
                "marker durations must be greater than zero".to_string(),
            ));
        }
        if !(self.style.width > 0.0 && self.style.height > 0.0) {
            return Err(BlockflowError::Config(format!(
                "document size must be positive, got {}x{}",
                self.style.width, self.style.height
            )));
        }

        self.style
            .background_from()
            .and_then(|_| self.style.background_to())
            .map_err(BlockflowError::Config)?;

        Ok(())
    }
}

/// Edge routing constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Horizontal distance of a curved edge's control point from the source anchor.
    lateral_offset: f32,
}

impl RoutingConfig {
    pub fn new(lateral_offset: f32) -> Self {
        Self { lateral_offset }
    }

    pub fn lateral_offset(&self) -> f32 {
        self.lateral_offset
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            lateral_offset: 60.0,
        }
    }
}

/// Pseudo-3D projection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Fraction of a node's depth used for the up-right face offset.
    depth_factor: f32,
    back_opacity: f32,
    side_opacity: f32,
    top_opacity: f32,
    corner_radius: f32,
}

impl ProjectionConfig {
    pub fn depth_factor(&self) -> f32 {
        self.depth_factor
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

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            depth_factor: 0.5,
            back_opacity: 0.3,
            side_opacity: 0.5,
            top_opacity: 0.4,
            corner_radius: 8.0,
        }
    }
}

/// Phase clock and animation timing.
///
/// Durations are stored in milliseconds so they read naturally in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    phase_interval_ms: u64,
    phase_count: usize,
    stagger_offset_ms: u64,
    edge_offset_ms: u64,
    straight_marker_ms: u64,
    curved_marker_ms: u64,
    marker_radius: f32,
    easing: Easing,
    reveal: bool,
}

impl AnimationConfig {
    pub fn phase_interval(&self) -> Duration {
        Duration::from_millis(self.phase_interval_ms)
    }

    pub fn phase_count(&self) -> usize {
        self.phase_count
    }

    /// Marker delay added per clock phase.
    pub fn stagger_offset(&self) -> Duration {
        Duration::from_millis(self.stagger_offset_ms)
    }

    /// Marker delay added per position in the edge list.
    pub fn edge_offset(&self) -> Duration {
        Duration::from_millis(self.edge_offset_ms)
    }

    pub fn straight_marker_duration(&self) -> Duration {
        Duration::from_millis(self.straight_marker_ms)
    }

    pub fn curved_marker_duration(&self) -> Duration {
        Duration::from_millis(self.curved_marker_ms)
    }

    pub fn marker_radius(&self) -> f32 {
        self.marker_radius
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Whether edges and blocks fade in on mount.
    pub fn reveal(&self) -> bool {
        self.reveal
    }

    /// Returns a copy with the mount reveal switched on or off.
    pub fn with_reveal(mut self, reveal: bool) -> Self {
        self.reveal = reveal;
        self
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            phase_interval_ms: 6000,
            phase_count: 3,
            stagger_offset_ms: 800,
            edge_offset_ms: 200,
            straight_marker_ms: 2500,
            curved_marker_ms: 3000,
            marker_radius: 4.0,
            easing: Easing::EaseInOut,
            reveal: true,
        }
    }
}

/// Visual styling of the output document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    width: f32,
    height: f32,
    background_from: String,
    background_to: String,
    grid: bool,
    shadow: bool,
    edge_width: f32,
    font_family: String,
}

impl StyleConfig {
    /// Width of the logical viewbox.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of the logical viewbox.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the parsed start color of the background gradient.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a CSS color.
    pub fn background_from(&self) -> Result<Color, String> {
        Color::new(&self.background_from)
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed end color of the background gradient.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a CSS color.
    pub fn background_to(&self) -> Result<Color, String> {
        Color::new(&self.background_to)
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn shadow(&self) -> bool {
        self.shadow
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 750.0,
            background_from: "#f8fafc".to_string(),
            background_to: "#e2e8f0".to_string(),
            grid: true,
            shadow: true,
            edge_width: 3.0,
            font_family: "sans-serif".to_string(),
        }
    }
}
