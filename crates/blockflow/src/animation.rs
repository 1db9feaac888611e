//! Flow animation.
//!
//! The [`FlowAnimator`] turns elapsed time since mount into per-frame state:
//! where each flow marker sits on its routed path, how opaque it is, and how
//! far the one-shot mount reveal of edges and blocks has progressed. It never
//! computes geometry itself; positions always come from
//! [`EdgePath::point_at`].
//!
//! The same timing drives the self-animating export, where it is written out
//! as SMIL attributes instead of being sampled.

mod clock;

pub use clock::{AnimationError, ClockDriver, PhaseClock};

use std::time::Duration;

use blockflow_core::{geometry::Point, path::EdgePath};

use crate::config::AnimationConfig;

const STRAIGHT_REVEAL_DELAY: Duration = Duration::from_millis(300);
const STRAIGHT_REVEAL_DURATION: Duration = Duration::from_millis(800);
const CURVED_REVEAL_DELAY: Duration = Duration::from_millis(500);
const CURVED_REVEAL_DURATION: Duration = Duration::from_millis(1200);

const NODE_REVEAL_STEP: Duration = Duration::from_millis(100);
const NODE_REVEAL_DURATION: Duration = Duration::from_millis(300);
const BADGE_REVEAL_DURATION: Duration = Duration::from_millis(300);

/// A one-shot transition: starts after `delay`, completes after `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub delay: Duration,
    pub duration: Duration,
}

impl Transition {
    /// Progress in `[0, 1]` at `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (active.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Instant at which the transition is complete.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Sampled state of one flow marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFrame {
    position: Point,
    opacity: f32,
    /// Raw loop fraction before easing.
    t: f32,
}

impl MarkerFrame {
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn t(&self) -> f32 {
        self.t
    }
}

/// Timing of the flow markers and mount reveals.
#[derive(Debug, Clone, Default)]
pub struct FlowAnimator {
    config: AnimationConfig,
}

impl FlowAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Start delay of the marker on edge `edge_index` during `phase`.
    ///
    /// `phase × stagger_offset + edge_index × edge_offset`
    pub fn marker_delay(&self, phase: usize, edge_index: usize) -> Duration {
        let phase = u32::try_from(phase).unwrap_or(u32::MAX);
        let edge_index = u32::try_from(edge_index).unwrap_or(u32::MAX);
        self.config
            .stagger_offset()
            .saturating_mul(phase)
            .saturating_add(self.config.edge_offset().saturating_mul(edge_index))
    }

    /// Duration of one traversal of `path`.
    pub fn marker_duration(&self, path: &EdgePath) -> Duration {
        if path.is_curved() {
            self.config.curved_marker_duration()
        } else {
            self.config.straight_marker_duration()
        }
    }

    /// Samples the marker of edge `edge_index` at `elapsed` since mount.
    ///
    /// Returns `None` while the marker is hidden, before its delay elapses.
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use blockflow::animation::FlowAnimator;
    /// # use blockflow_core::geometry::Point;
    /// # use blockflow_core::path::EdgePath;
    /// let animator = FlowAnimator::default();
    /// let path = EdgePath::line(Point::new(50.0, 50.0), Point::new(50.0, 100.0));
    ///
    /// assert!(animator.marker_frame(&path, 0, 1, Duration::from_millis(100)).is_none());
    /// let frame = animator.marker_frame(&path, 0, 0, Duration::ZERO).unwrap();
    /// assert_eq!(frame.position(), Point::new(50.0, 50.0));
    /// ```
    pub fn marker_frame(
        &self,
        path: &EdgePath,
        phase: usize,
        edge_index: usize,
        elapsed: Duration,
    ) -> Option<MarkerFrame> {
        let active = elapsed.checked_sub(self.marker_delay(phase, edge_index))?;
        let duration = self.marker_duration(path).as_secs_f32();
        let t = if duration > 0.0 {
            active.as_secs_f32().rem_euclid(duration) / duration
        } else {
            0.0
        };
        Some(self.marker_at(path, t))
    }

    /// Marker state at raw loop fraction `t`.
    pub fn marker_at(&self, path: &EdgePath, t: f32) -> MarkerFrame {
        let t = t.clamp(0.0, 1.0);
        let position = path.point_at(self.config.easing().apply(t));
        let opacity = if path.is_curved() {
            1.0
        } else {
            1.0 - (2.0 * t - 1.0).abs()
        };
        MarkerFrame {
            position,
            opacity,
            t,
        }
    }

    /// Mount reveal of an edge stroke.
    pub fn edge_reveal(&self, path: &EdgePath) -> Transition {
        if path.is_curved() {
            Transition {
                delay: CURVED_REVEAL_DELAY,
                duration: CURVED_REVEAL_DURATION,
            }
        } else {
            Transition {
                delay: STRAIGHT_REVEAL_DELAY,
                duration: STRAIGHT_REVEAL_DURATION,
            }
        }
    }

    /// Mount reveal of the front face of the `node_index`-th block.
    pub fn node_reveal(&self, node_index: usize) -> Transition {
        let step = u32::try_from(node_index).unwrap_or(u32::MAX);
        Transition {
            delay: NODE_REVEAL_STEP.saturating_mul(step),
            duration: NODE_REVEAL_DURATION,
        }
    }

    /// Mount reveal of the stack-count badge of the `node_index`-th block.
    pub fn badge_reveal(&self, node_index: usize) -> Transition {
        let node = self.node_reveal(node_index);
        Transition {
            delay: node.delay + NODE_REVEAL_DURATION,
            duration: BADGE_REVEAL_DURATION,
        }
    }

    /// Edge stroke opacity at `elapsed`; always 1 with reveal disabled.
    pub fn edge_opacity(&self, path: &EdgePath, elapsed: Duration) -> f32 {
        if !self.config.reveal() {
            return 1.0;
        }
        self.edge_reveal(path).progress(elapsed)
    }

    /// Front face opacity at `elapsed`; always 1 with reveal disabled.
    pub fn node_opacity(&self, node_index: usize, elapsed: Duration) -> f32 {
        if !self.config.reveal() {
            return 1.0;
        }
        self.node_reveal(node_index).progress(elapsed)
    }

    /// Badge opacity at `elapsed`; always 1 with reveal disabled.
    pub fn badge_opacity(&self, node_index: usize, elapsed: Duration) -> f32 {
        if !self.config.reveal() {
            return 1.0;
        }
        self.badge_reveal(node_index).progress(elapsed)
    }

    /// Time after which every reveal of a scene with `node_count` blocks has
    /// completed.
    pub fn settle_time(&self, node_count: usize) -> Duration {
        let last_badge = self.badge_reveal(node_count.saturating_sub(1)).end();
        let curved = CURVED_REVEAL_DELAY + CURVED_REVEAL_DURATION;
        last_badge.max(curved)
    }
}
