//! Easing curves.
//!
//! Every curve maps a normalized time `t` in `[0, 1]` to a normalized
//! progress in `[0, 1]`. Inputs outside the unit interval are clamped.

use serde::Deserialize;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0f32).mul_add(t, 2.0).powi(2) / 2.0
    }
}

/// Named easing curve, selectable from configuration.
///
/// ```
/// use blockflow_core::easing::Easing;
///
/// assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
/// assert_eq!(Easing::Linear.apply(2.0), 1.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Returns the function implementing this curve.
    pub fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
        }
    }

    /// Evaluates the curve at `t`.
    pub fn apply(self, t: f32) -> f32 {
        (self.function())(t)
    }

    /// Cubic-bezier control points approximating this curve, in the format of
    /// an SVG `keySplines` entry. `None` means linear pacing.
    pub fn key_spline(self) -> Option<&'static str> {
        match self {
            Self::Linear => None,
            Self::EaseIn => Some("0.42 0 1 1"),
            Self::EaseOut => Some("0 0 0.58 1"),
            Self::EaseInOut => Some("0.42 0 0.58 1"),
        }
    }
}
