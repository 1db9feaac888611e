//! Parametric edge paths.
//!
//! An [`EdgePath`] is the routed geometry of one edge. It is evaluated at a
//! normalized parameter `t` so that flow markers can travel along exactly the
//! curve that is stroked, and it serializes to SVG path data so that the
//! self-animating export can reuse the same geometry for `animateMotion`.

use crate::geometry::{Bounds, Point};

/// Routed geometry of a single edge.
///
/// # Examples
///
/// ```
/// # use blockflow_core::geometry::Point;
/// # use blockflow_core::path::EdgePath;
/// let path = EdgePath::quadratic(
///     Point::new(50.0, 50.0),
///     Point::new(-10.0, 100.0),
///     Point::new(50.0, 150.0),
/// );
///
/// assert_eq!(path.point_at(0.0), Point::new(50.0, 50.0));
/// assert_eq!(path.point_at(1.0), Point::new(50.0, 150.0));
/// assert_eq!(path.to_path_data(), "M 50 50 Q -10 100 50 150");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePath {
    /// A single straight segment.
    Line { start: Point, end: Point },
    /// A quadratic Bezier curve with one control point.
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
}

impl EdgePath {
    pub fn line(start: Point, end: Point) -> Self {
        Self::Line { start, end }
    }

    pub fn quadratic(start: Point, control: Point, end: Point) -> Self {
        Self::Quadratic {
            start,
            control,
            end,
        }
    }

    /// Returns the point where the path begins.
    pub fn start(&self) -> Point {
        match *self {
            Self::Line { start, .. } | Self::Quadratic { start, .. } => start,
        }
    }

    /// Returns the point where the path ends.
    pub fn end(&self) -> Point {
        match *self {
            Self::Line { end, .. } | Self::Quadratic { end, .. } => end,
        }
    }

    /// Returns the control point of a curved path.
    pub fn control(&self) -> Option<Point> {
        match *self {
            Self::Line { .. } => None,
            Self::Quadratic { control, .. } => Some(control),
        }
    }

    /// Returns true for curved paths.
    pub fn is_curved(&self) -> bool {
        matches!(self, Self::Quadratic { .. })
    }

    /// Evaluates the path at `t`, clamped to `[0, 1]`.
    ///
    /// Lines interpolate linearly. Quadratic curves use the Bernstein form
    /// `(1-t)²·P0 + 2(1-t)t·P1 + t²·P2`.
    pub fn point_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Line { start, end } => start.lerp(end, t),
            Self::Quadratic {
                start,
                control,
                end,
            } => {
                let u = 1.0 - t;
                start
                    .scale(u * u)
                    .add_point(control.scale(2.0 * u * t))
                    .add_point(end.scale(t * t))
            }
        }
    }

    /// Returns the SVG path data for this path (`M .. L ..` or `M .. Q ..`).
    pub fn to_path_data(&self) -> String {
        match *self {
            Self::Line { start, end } => {
                format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
            }
            Self::Quadratic {
                start,
                control,
                end,
            } => format!(
                "M {} {} Q {} {} {} {}",
                start.x(),
                start.y(),
                control.x(),
                control.y(),
                end.x(),
                end.y()
            ),
        }
    }

    /// Bounding box of the path's defining points.
    ///
    /// For curves this includes the control point, so it encloses the curve
    /// but is not necessarily tight.
    pub fn bounds(&self) -> Bounds {
        let start = Bounds::new_from_top_left(self.start(), Default::default());
        let bounds = start.include_point(self.end());
        match self.control() {
            Some(control) => bounds.include_point(control),
            None => bounds,
        }
    }
}
