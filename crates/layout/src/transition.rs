//! Animated transition requests attached to frame applications.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a child should animate into its new frame.
///
/// The layout crate never runs the animation itself; the request is handed
/// to [`Child::set_frame`](crate::child::Child::set_frame) for the host to
/// interpret.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Total animation time.
    pub duration: Duration,
    /// Progress curve.
    pub easing: Easing,
}

impl Transition {
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// A transition that completes immediately.
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }

    /// Eased progress after `elapsed`, clamped to `0.0..=1.0`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.easing.apply(t)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Easing::EaseInOut)
    }
}

/// Easing function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

/// Solve a CSS-style cubic bezier for `x = t` and return `y`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let sample = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };

    // Bisection on x; the curve is monotonic in x for x1, x2 in [0, 1].
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    let mut s = t;
    for _ in 0..32 {
        let x = sample(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    sample(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transition() {
        let transition = Transition::default();
        assert_eq!(transition.duration, Duration::from_millis(200));
        assert_eq!(transition.easing, Easing::EaseInOut);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric_at_midpoint() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-3, "got {mid}");
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn test_progress_clamps() {
        let transition = Transition::new(Duration::from_millis(100), Easing::Linear);
        assert_eq!(transition.progress(Duration::ZERO), 0.0);
        assert!((transition.progress(Duration::from_millis(50)) - 0.5).abs() < 1e-4);
        assert_eq!(transition.progress(Duration::from_secs(5)), 1.0);
        assert_eq!(Transition::instant().progress(Duration::ZERO), 1.0);
    }
}
