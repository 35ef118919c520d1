//! Per-joint safe ranges and the saturation clamp.
//!
//! The clamp protects against mechanical joint-limit violations on a
//! per-frame basis. It is a hard saturation, not a rate limiter, and
//! has no memory of previous frames.

use serde::{Deserialize, Serialize};

use crate::core::types::JointAngles;

/// Safe range for one joint, treated as an open interval.
///
/// Values strictly inside `(lo, hi)` pass through; a value at or beyond
/// a bound snaps to that bound. Exact bound hits count as outside the
/// open range and are snapped, which keeps the output closed-interval
/// safe: `lo ≤ clamp(v) ≤ hi` for every real `v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointRange {
    /// Lower bound, radians
    pub lo: f32,
    /// Upper bound, radians
    pub hi: f32,
}

impl JointRange {
    /// Create a range. Callers must keep `lo < hi`.
    #[inline]
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    /// Whether `value` lies strictly inside the range.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        self.lo < value && value < self.hi
    }

    /// Saturate `value` into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if self.contains(value) {
            value
        } else if self.lo < value {
            self.hi
        } else {
            self.lo
        }
    }
}

/// Declared safe ranges for the clamped axes of the mimicked arm.
///
/// Only s0, s1 and e1 carry declared bounds; e0 passes through
/// unclamped and the wrist axes are fixed constants upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointLimits {
    /// Shoulder rotation bounds
    pub s0: JointRange,
    /// Shoulder elevation bounds
    pub s1: JointRange,
    /// Elbow flexion bounds
    pub e1: JointRange,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            s0: JointRange::new(-0.25, 1.60),
            s1: JointRange::new(-2.00, 0.90),
            e1: JointRange::new(0.10, 2.50),
        }
    }
}

impl JointLimits {
    /// Clamp the constrained axes of one arm's angles.
    ///
    /// e0 and the wrist axes pass through unchanged.
    pub fn apply(&self, angles: JointAngles) -> JointAngles {
        JointAngles {
            s0: self.s0.clamp(angles.s0),
            s1: self.s1.clamp(angles.s1),
            e1: self.e1.clamp(angles.e1),
            ..angles
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_inside_passes_through() {
        let r = JointRange::new(-0.25, 1.60);
        assert_relative_eq!(r.clamp(0.0), 0.0);
        assert_relative_eq!(r.clamp(1.59), 1.59);
        assert_relative_eq!(r.clamp(-0.24), -0.24);
    }

    #[test]
    fn test_clamp_bound_hits_snap() {
        // Exact bound hits are outside the open range and snap.
        let r = JointRange::new(-0.25, 1.60);
        assert_relative_eq!(r.clamp(-0.25), -0.25);
        assert_relative_eq!(r.clamp(1.60), 1.60);
    }

    #[test]
    fn test_clamp_saturates_beyond_bounds() {
        let r = JointRange::new(-0.25, 1.60);
        assert_relative_eq!(r.clamp(-5.0), -0.25);
        assert_relative_eq!(r.clamp(2.0), 1.60);
        assert_relative_eq!(r.clamp(f32::INFINITY), 1.60);
        assert_relative_eq!(r.clamp(f32::NEG_INFINITY), -0.25);
    }

    #[test]
    fn test_clamp_output_always_in_closed_range() {
        let r = JointRange::new(0.10, 2.50);
        for v in [-10.0, 0.0, 0.10, 1.3, 2.50, 10.0] {
            let c = r.clamp(v);
            assert!(r.lo <= c && c <= r.hi);
        }
    }

    #[test]
    fn test_apply_clamps_only_constrained_axes() {
        let limits = JointLimits::default();
        let raw = JointAngles {
            s0: 3.0,
            s1: -3.0,
            e0: 9.0,
            e1: 0.0,
            w0: -1.57,
            w1: 0.0,
            w2: -0.30,
        };
        let out = limits.apply(raw);
        assert_relative_eq!(out.s0, 1.60);
        assert_relative_eq!(out.s1, -2.00);
        assert_relative_eq!(out.e1, 0.10);
        // Unconstrained axes pass through.
        assert_relative_eq!(out.e0, 9.0);
        assert_relative_eq!(out.w0, -1.57);
        assert_relative_eq!(out.w2, -0.30);
    }
}
