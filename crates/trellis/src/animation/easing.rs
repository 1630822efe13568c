//! Easing functions for transition timing.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking motion.

use serde::{Deserialize, Serialize};

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    #[default]
    EaseInOut,
    /// Cubic ease-in (more pronounced than quadratic).
    EaseInCubic,
    /// Cubic ease-out (more pronounced than quadratic).
    EaseOutCubic,
    /// Cubic ease-in-out (more pronounced than quadratic).
    EaseInOutCubic,
}

/// Apply an easing function to a progress value.
///
/// `t` is clamped to `[0.0, 1.0]` before transformation.
///
/// # Example
///
/// ```
/// use trellis::animation::{ease, Easing};
///
/// // Linear: output equals input
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
///
/// // Ease-in: slower at start
/// assert!(ease(Easing::EaseIn, 0.5) < 0.5);
///
/// // Ease-out: slower at end
/// assert!(ease(Easing::EaseOut, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseInCubic => t * t * t,
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * ease(easing, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(ease(Easing::Linear, 0.0), 0.0);
        assert_eq!(ease(Easing::Linear, 0.5), 0.5);
        assert_eq!(ease(Easing::Linear, 1.0), 1.0);
    }

    #[test]
    fn test_boundaries_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
        ] {
            assert_eq!(ease(easing, 0.0), 0.0, "{easing:?} at 0");
            assert_eq!(ease(easing, 1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_in_is_slow_at_start() {
        assert!(ease(Easing::EaseIn, 0.5) < 0.5);
        // Cubic is even slower at the start than quadratic.
        assert!(ease(Easing::EaseInCubic, 0.5) < ease(Easing::EaseIn, 0.5));
    }

    #[test]
    fn test_ease_out_is_fast_at_start() {
        assert!(ease(Easing::EaseOut, 0.5) > 0.5);
    }

    #[test]
    fn test_ease_in_out_midpoint_unchanged() {
        assert_eq!(ease(Easing::EaseInOut, 0.5), 0.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(ease(Easing::Linear, -0.5), 0.0);
        assert_eq!(ease(Easing::Linear, 1.5), 1.0);
    }

    #[test]
    fn test_lerp_eased() {
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 1.0), 200.0);
    }
}
