//! Pseudo-3D projection of node blocks.
//!
//! The projection is a fixed oblique shear: a node with depth `d` is
//! extruded by `depth_factor * d` to the right and the same amount upward.
//! Face geometry and decoration anchors are pure functions of a node's box,
//! depth and the [`ProjectionConfig`].

use blockflow_core::{
    draw::{PrismDefinition, PrismFaces},
    geometry::{Bounds, Point, Polygon},
};

use crate::{config::ProjectionConfig, model::Node};

/// Distance of the badge center from the top-right corner, on each axis.
const BADGE_INSET: f32 = 20.0;
/// Distance of the icon center from the top-left corner, on each axis.
const ICON_INSET: f32 = 15.0;
/// Upward shift of the label when a sublabel is present.
const LABEL_LIFT: f32 = 8.0;
/// Downward offset of the sublabel from the block center.
const SUBLABEL_DROP: f32 = 10.0;

/// Anchor points for the decorations drawn on a block's front face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationLayout {
    /// Badge center and count; present iff the stack count is set and positive.
    pub badge: Option<(Point, u32)>,
    /// Icon center; present iff the node has an icon glyph.
    pub icon: Option<Point>,
    /// Label anchor (horizontal center, baseline).
    pub label: Point,
    /// Sublabel anchor; present iff the node has a sublabel.
    pub sublabel: Option<Point>,
}

/// Computes block faces and decoration anchors.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Faces of a box extruded by `depth`, in paint order back, side, top, front.
    ///
    /// A zero depth collapses the side and top faces to zero area and places
    /// the back face exactly on the front face.
    ///
    /// ```
    /// # use blockflow::projection::ProjectionEngine;
    /// # use blockflow_core::geometry::{Bounds, Point, Size};
    /// let engine = ProjectionEngine::default();
    /// let front = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
    ///
    /// let faces = engine.project(front, 10.0);
    /// assert_eq!(faces.back().min_point(), Point::new(5.0, -5.0));
    /// assert_eq!(faces.front(), front);
    /// ```
    pub fn project(&self, front: Bounds, depth: f32) -> PrismFaces {
        let offset = depth * self.config.depth_factor();
        let shift = Point::new(offset, -offset);

        let back = front.translate(shift);

        let (x, y) = (front.min_x(), front.min_y());
        let (right, bottom) = (front.max_x(), front.max_y());

        let side = Polygon::new(vec![
            Point::new(right, y),
            Point::new(right + offset, y - offset),
            Point::new(right + offset, bottom - offset),
            Point::new(right, bottom),
        ]);

        let top = Polygon::new(vec![
            Point::new(x, y),
            Point::new(x + offset, y - offset),
            Point::new(right + offset, y - offset),
            Point::new(right, y),
        ]);

        PrismFaces::new(back, side, top, front)
    }

    /// Faces of a node's block.
    pub fn project_node(&self, node: &Node) -> PrismFaces {
        self.project(node.bounds(), node.depth())
    }

    /// Paint settings for a node's block.
    pub fn definition(&self, node: &Node, shadow_filter: Option<&str>) -> PrismDefinition {
        let mut definition = PrismDefinition::new(node.style().fill());
        definition.set_corner_radius(self.config.corner_radius());
        definition.set_face_opacities(
            self.config.back_opacity(),
            self.config.side_opacity(),
            self.config.top_opacity(),
        );
        definition.set_shadow_filter(shadow_filter);
        definition
    }

    /// Decoration anchors for a node.
    pub fn decorations(&self, node: &Node) -> DecorationLayout {
        let bounds = node.bounds();
        let center = bounds.center();
        let style = node.style();

        let badge = style.badge_count().map(|count| {
            (
                Point::new(bounds.max_x() - BADGE_INSET, bounds.min_y() + BADGE_INSET),
                count,
            )
        });
        let icon = style
            .icon()
            .map(|_| Point::new(bounds.min_x() + ICON_INSET, bounds.min_y() + ICON_INSET));

        let label_y = if node.sublabel().is_some() {
            center.y() - LABEL_LIFT
        } else {
            center.y()
        };
        let sublabel = node
            .sublabel()
            .map(|_| Point::new(center.x(), center.y() + SUBLABEL_DROP));

        DecorationLayout {
            badge,
            icon,
            label: Point::new(center.x(), label_y),
            sublabel,
        }
    }
}
