//! Edge routing.
//!
//! Every edge leaves the bottom-center of its source block and enters the
//! top-center of its target block. Straight edges are a single segment;
//! curved edges are quadratic curves bent sideways by a fixed lateral offset.

use blockflow_core::{geometry::Point, path::EdgePath};

use crate::{
    config::RoutingConfig,
    model::{Node, RoutingStyle},
};

/// Computes [`EdgePath`]s between nodes.
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    config: RoutingConfig,
}

impl EdgeRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Bottom-center of the source box and top-center of the target box.
    pub fn anchors(source: &Node, target: &Node) -> (Point, Point) {
        (source.bounds().bottom_center(), target.bounds().top_center())
    }

    /// Routes between two anchors.
    ///
    /// The control point of a curve is the midpoint of the anchors shifted
    /// sideways: `(mid_x ∓ lateral_offset, mid_y)`, with `-` for
    /// [`RoutingStyle::CurvedLeft`] and `+` for [`RoutingStyle::CurvedRight`].
    /// Left and right controls therefore mirror across `x = mid_x`.
    ///
    /// ```
    /// # use blockflow::route::EdgeRouter;
    /// # use blockflow::model::RoutingStyle;
    /// # use blockflow_core::geometry::Point;
    /// let router = EdgeRouter::default();
    /// let path = router.route_between(
    ///     Point::new(50.0, 50.0),
    ///     Point::new(50.0, 150.0),
    ///     RoutingStyle::CurvedLeft,
    /// );
    /// assert_eq!(path.control(), Some(Point::new(-10.0, 100.0)));
    /// ```
    pub fn route_between(&self, start: Point, end: Point, routing: RoutingStyle) -> EdgePath {
        let lateral = match routing {
            RoutingStyle::Straight => return EdgePath::line(start, end),
            RoutingStyle::CurvedLeft => -self.config.lateral_offset(),
            RoutingStyle::CurvedRight => self.config.lateral_offset(),
        };
        let mid = start.midpoint(end);
        let control = Point::new(mid.x() + lateral, mid.y());
        EdgePath::quadratic(start, control, end)
    }

    /// Routes an edge from `source` to `target`.
    pub fn route(&self, source: &Node, target: &Node, routing: RoutingStyle) -> EdgePath {
        let (start, end) = Self::anchors(source, target);
        self.route_between(start, end, routing)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{
        definition::{NodeDefinition, SceneDefinition},
        model::{Diagram, NodeRole},
    };
    use blockflow_core::identifier::Id;

    fn diagram() -> Diagram {
        let definition = SceneDefinition::new()
            .with_node(NodeDefinition::new("a", NodeRole::Input, "A", 0.0, 0.0, 100.0, 50.0))
            .with_node(NodeDefinition::new("b", NodeRole::Output, "B", 0.0, 100.0, 100.0, 50.0));
        Diagram::from_definition(&definition).unwrap()
    }

    #[test]
    fn test_anchors() {
        let diagram = diagram();
        let a = diagram.find_node(Id::new("a")).unwrap();
        let b = diagram.find_node(Id::new("b")).unwrap();

        let (start, end) = EdgeRouter::anchors(a, b);
        assert_eq!(start, Point::new(50.0, 50.0));
        assert_eq!(end, Point::new(50.0, 100.0));

        let path = EdgeRouter::default().route(a, b, RoutingStyle::Straight);
        assert_eq!(path, EdgePath::line(start, end));
    }

    #[test]
    fn test_self_loop_routes() {
        let diagram = diagram();
        let a = diagram.find_node(Id::new("a")).unwrap();
        let path = EdgeRouter::default().route(a, a, RoutingStyle::CurvedRight);
        assert_eq!(path.start(), Point::new(50.0, 50.0));
        assert_eq!(path.end(), Point::new(50.0, 0.0));
        assert_eq!(path.control(), Some(Point::new(110.0, 25.0)));
    }

    #[test]
    fn test_curved_right_control() {
        let path = EdgeRouter::default().route_between(
            Point::new(450.0, 410.0),
            Point::new(630.0, 460.0),
            RoutingStyle::CurvedRight,
        );
        let control = path.control().unwrap();
        assert_approx_eq!(f32, control.x(), 600.0);
        assert_approx_eq!(f32, control.y(), 435.0);
    }

    #[test]
    fn test_offset_anchors_mirror_across_midpoint() {
        // encoder-stack -> classification-head in the transformer demo
        let router = EdgeRouter::default();
        let start = Point::new(450.0, 410.0);
        let end = Point::new(630.0, 460.0);

        let left = router.route_between(start, end, RoutingStyle::CurvedLeft).control().unwrap();
        let right = router.route_between(start, end, RoutingStyle::CurvedRight).control().unwrap();

        assert_approx_eq!(f32, left.x(), 480.0);
        assert_approx_eq!(f32, right.x(), 600.0);
        assert_approx_eq!(f32, 2.0 * 540.0 - left.x(), right.x());
        assert_approx_eq!(f32, left.y(), right.y());
    }

    #[test]
    fn test_custom_lateral_offset() {
        let router = EdgeRouter::new(RoutingConfig::new(25.0));
        let path = router.route_between(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            RoutingStyle::CurvedLeft,
        );
        assert_eq!(path.control(), Some(Point::new(-25.0, 50.0)));
    }

    fn point() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn straight_ignores_lateral_offset(
            start in point(),
            end in point(),
            offset in -500.0f32..500.0,
        ) {
            let default = EdgeRouter::default().route_between(start, end, RoutingStyle::Straight);
            let custom = EdgeRouter::new(RoutingConfig::new(offset))
                .route_between(start, end, RoutingStyle::Straight);
            prop_assert_eq!(default, custom);
        }

        #[test]
        fn curved_controls_mirror(
            start in point(),
            end in point(),
            offset in 0.0f32..500.0,
        ) {
            let router = EdgeRouter::new(RoutingConfig::new(offset));
            let left = router.route_between(start, end, RoutingStyle::CurvedLeft).control().unwrap();
            let right = router.route_between(start, end, RoutingStyle::CurvedRight).control().unwrap();

            let axis = start.midpoint(end).x();
            let mirrored = left.mirror_x(axis);
            prop_assert!((mirrored.x() - right.x()).abs() < 1e-2);
            prop_assert!((left.y() - right.y()).abs() < 1e-6);
        }

        #[test]
        fn curved_paths_hit_anchors(start in point(), end in point()) {
            let router = EdgeRouter::default();
            for routing in [RoutingStyle::CurvedLeft, RoutingStyle::CurvedRight] {
                let path = router.route_between(start, end, routing);
                prop_assert_eq!(path.point_at(0.0), start);
                prop_assert!((path.point_at(1.0).x() - end.x()).abs() < 1e-2);
                prop_assert!((path.point_at(1.0).y() - end.y()).abs() < 1e-2);
            }
        }
    }
}
