//! Joint-angle retargeting engine (primary path).
//!
//! Converts the six tracked points of a skeleton frame into a clamped
//! dual-arm joint command plus a binary gripper command:
//!
//! 1. **s0** — project the upper arm onto the horizontal plane and
//!    measure its angle against the forward axis, minus a fixed π/4
//!    frame-alignment offset (the tracker's and the arm's zero
//!    references differ by that much).
//! 2. **s1** — angle between the upper arm and its horizontal
//!    projection, signed by whether the elbow sits above the shoulder
//!    (the raw angle is always unsigned, the physical joint is not).
//! 3. **e0** — angle between the hand's perpendicular to the upper-arm
//!    line and the fixed up axis.
//! 4. **e1** — angle between upper arm and forearm, the natural elbow
//!    bend; unsigned at both extremes, so no sign correction.
//! 5. Wrist axes are held at fixed constants.
//! 6. s0/s1/e1 are saturated into their safe ranges; e0 passes through.
//! 7. The second limb's bend angle drives the gripper: strictly greater
//!    than the threshold closes it.
//!
//! The engine is stateless: it holds only constant configuration, so a
//! single instance may be shared freely and every frame is an
//! independent computation.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::math::{
    angle_between, project_onto_plane, shortest_vector_to_line, vector_from_points, GeometryError,
};
use crate::core::types::{
    ArmSide, DualArmCommand, GripperCommand, JointAngles, LimbPoints, SkeletonFrame, Vector3,
};
use crate::engine::limits::JointLimits;

/// Fixed "down" axis of the tracker frame; normal of the horizontal
/// (x-z) plane.
const DOWN: Vector3 = Vector3::new(0.0, -1.0, 0.0);
/// Fixed "forward" axis of the tracker frame, in the horizontal plane.
const FORWARD: Vector3 = Vector3::new(-1.0, 0.0, 0.0);
/// Fixed "up" reference for the elbow-rotation axis.
const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Retargeting failures.
///
/// A failed frame is not fatal: callers log it, skip commanding for
/// that frame (or reuse the previous valid command) and continue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetError {
    /// A limb segment collapsed to zero length (coincident tracked
    /// points, typically a tracking glitch).
    #[error("degenerate limb geometry: {0}")]
    Geometry(#[from] GeometryError),
}

/// Configuration for the retargeting engine.
///
/// All fields are constant for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Which arm mimics the tracked limb.
    pub mimic_side: ArmSide,

    /// Safe ranges for the clamped axes.
    pub limits: JointLimits,

    /// Frame-alignment offset subtracted from the raw shoulder-rotation
    /// angle (radians). The tracker's and the arm's zero references
    /// differ by a quarter turn.
    pub shoulder_offset: f32,

    /// Fixed wrist rotation (w0), radians.
    pub wrist_w0: f32,
    /// Fixed wrist flexion (w1), radians.
    pub wrist_w1: f32,
    /// Fixed wrist twist (w2), radians.
    pub wrist_w2: f32,

    /// Second-limb bend angle above which the gripper closes (radians).
    /// The comparison is strict: a bend exactly at the threshold keeps
    /// the gripper open.
    pub gripper_close_threshold: f32,

    /// Constant pose for the non-mimicked arm.
    pub fixed_pose: JointAngles,

    /// Neutral reset pose for the mimicked arm. Not used in the frame
    /// path; exposed for the actuation collaborator's reset command.
    pub neutral_pose: JointAngles,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            mimic_side: ArmSide::Right,
            limits: JointLimits::default(),
            shoulder_offset: FRAC_PI_4,
            wrist_w0: -1.57,
            wrist_w1: 0.00,
            wrist_w2: -0.30,
            gripper_close_threshold: 0.8,
            fixed_pose: JointAngles {
                s0: 0.35,
                s1: 0.00,
                e0: 0.00,
                e1: 1.57,
                w0: 0.00,
                w1: 0.00,
                w2: 0.00,
            },
            neutral_pose: JointAngles {
                s0: 0.00,
                s1: 0.00,
                e0: 1.57,
                e1: 0.00,
                w0: 0.00,
                w1: 0.00,
                w2: 0.00,
            },
        }
    }
}

/// Stateless skeleton-to-arm retargeting engine.
///
/// Holds only constant configuration; safe to share across callers
/// without locking. Serializing the resulting actuation calls is the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct RetargetingEngine {
    config: RetargetConfig,
}

impl RetargetingEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: RetargetConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    /// Neutral reset pose for the mimicked arm, as a named-angle map
    /// for the actuation collaborator.
    pub fn neutral_named_angles(&self) -> std::collections::HashMap<String, f32> {
        self.config.neutral_pose.named(self.config.mimic_side)
    }

    /// Compute the dual-arm and gripper commands for one frame.
    ///
    /// The left limb drives the mimicked arm, the right limb drives the
    /// gripper. Fails on degenerate limb geometry; the frame should
    /// then be skipped.
    pub fn compute_joint_command(
        &self,
        frame: &SkeletonFrame,
    ) -> Result<(DualArmCommand, GripperCommand), RetargetError> {
        let mimic = self.mimic_angles(&frame.left)?;
        let gripper = self.gripper_command(&frame.right)?;
        Ok((
            DualArmCommand {
                mimic_side: self.config.mimic_side,
                mimic,
                fixed: self.config.fixed_pose,
            },
            gripper,
        ))
    }

    /// Derive and clamp the mimicked arm's angles from the tracked limb.
    fn mimic_angles(&self, limb: &LimbPoints) -> Result<JointAngles, RetargetError> {
        let upper_arm = vector_from_points(&limb.shoulder, &limb.elbow);
        let forearm = vector_from_points(&limb.elbow, &limb.hand);

        // s0: horizontal direction of the upper arm against the forward
        // axis, minus the frame-alignment offset.
        let horizontal = project_onto_plane(&upper_arm, &DOWN, &FORWARD)?;
        let s0 = angle_between(&horizontal, &FORWARD)? - self.config.shoulder_offset;

        // s1: elevation out of the horizontal plane. The raw angle is
        // unsigned; the elbow sitting below the shoulder selects the
        // lowered (negative) half of the joint's range.
        let elevation = angle_between(&upper_arm, &horizontal)?;
        let s1 = if limb.elbow.y > limb.shoulder.y {
            elevation
        } else {
            -elevation
        };

        // e0: upper-arm twist approximated by the hand's perpendicular
        // to the upper-arm line, measured against the fixed up axis.
        // Twist about an axis is not fully observable from three
        // positions alone; this heuristic matches the deployed behavior
        // and should not be assumed to generalize.
        let twist_axis =
            shortest_vector_to_line(&limb.hand, &upper_arm, &forearm, &limb.shoulder)?;
        let e0 = angle_between(&twist_axis, &UP)?;

        // e1: natural elbow bend, unsigned at both extremes.
        let e1 = angle_between(&upper_arm, &forearm)?;

        let raw = JointAngles {
            s0,
            s1,
            e0,
            e1,
            w0: self.config.wrist_w0,
            w1: self.config.wrist_w1,
            w2: self.config.wrist_w2,
        };
        let clamped = self.config.limits.apply(raw);
        if clamped != raw {
            log::debug!(
                "clamped mimic angles: raw s0={:.3} s1={:.3} e1={:.3} -> s0={:.3} s1={:.3} e1={:.3}",
                raw.s0,
                raw.s1,
                raw.e1,
                clamped.s0,
                clamped.s1,
                clamped.e1
            );
        }
        Ok(clamped)
    }

    /// Derive the gripper command from the second limb's bend angle.
    pub fn gripper_command(&self, limb: &LimbPoints) -> Result<GripperCommand, RetargetError> {
        let upper_arm = vector_from_points(&limb.shoulder, &limb.elbow);
        let forearm = vector_from_points(&limb.elbow, &limb.hand);
        let bend = angle_between(&upper_arm, &forearm)?;
        if bend > self.config.gripper_close_threshold {
            Ok(GripperCommand::Close)
        } else {
            Ok(GripperCommand::Open)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn engine() -> RetargetingEngine {
        RetargetingEngine::new(RetargetConfig::default())
    }

    /// Right limb bent at 90°, comfortably past the close threshold.
    fn bent_right_limb() -> LimbPoints {
        LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        )
    }

    /// Left limb held forward and bent down at the elbow; every angle
    /// derivation is non-degenerate.
    fn bent_left_limb() -> LimbPoints {
        LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        )
    }

    fn frame() -> SkeletonFrame {
        SkeletonFrame {
            left: bent_left_limb(),
            right: bent_right_limb(),
            torso: Point3::new(0.0, 0.5, 0.0),
        }
    }

    #[test]
    fn test_bent_limb_angles() {
        let (cmd, gripper) = engine().compute_joint_command(&frame()).unwrap();
        // Upper arm along the forward axis: raw s0 = 0 − π/4, clamped
        // to the s0 floor.
        assert_relative_eq!(cmd.mimic.s0, -0.25);
        // Upper arm lies in the horizontal plane and the elbow is level
        // with the shoulder, so elevation is zero on the lowered branch.
        assert_relative_eq!(cmd.mimic.s1, 0.0, epsilon = 1e-6);
        // Elbow bent 90°.
        assert_relative_eq!(cmd.mimic.e1, FRAC_PI_2, epsilon = 1e-6);
        // Hand hangs straight below the upper-arm line: the
        // perpendicular points back up at the line, 0 against the up
        // axis.
        assert_relative_eq!(cmd.mimic.e0, 0.0, epsilon = 1e-6);
        assert_eq!(gripper, GripperCommand::Close);
    }

    #[test]
    fn test_elevation_sign_follows_elbow_height() {
        let eng = engine();
        // Elbow raised 45° above the shoulder.
        let raised = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, -1.0),
        );
        let up = eng.mimic_angles(&raised).unwrap();
        assert_relative_eq!(up.s1, FRAC_PI_4, epsilon = 1e-6);

        // Elbow lowered 45° below the shoulder.
        let lowered = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(-1.0, -1.0, -1.0),
        );
        let down = eng.mimic_angles(&lowered).unwrap();
        assert_relative_eq!(down.s1, -FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn test_wrist_axes_are_constants() {
        let (cmd, _) = engine().compute_joint_command(&frame()).unwrap();
        assert_relative_eq!(cmd.mimic.w0, -1.57);
        assert_relative_eq!(cmd.mimic.w1, 0.00);
        assert_relative_eq!(cmd.mimic.w2, -0.30);
    }

    #[test]
    fn test_gripper_threshold_is_strict() {
        // A 90° bend against a 90° threshold must stay open; acos(0)
        // is exact, so no tolerance games are needed.
        let config = RetargetConfig {
            gripper_close_threshold: FRAC_PI_2,
            ..RetargetConfig::default()
        };
        let eng = RetargetingEngine::new(config);
        assert_eq!(
            eng.gripper_command(&bent_right_limb()).unwrap(),
            GripperCommand::Open
        );

        let just_below = RetargetConfig {
            gripper_close_threshold: FRAC_PI_2 - 1e-4,
            ..RetargetConfig::default()
        };
        let eng = RetargetingEngine::new(just_below);
        assert_eq!(
            eng.gripper_command(&bent_right_limb()).unwrap(),
            GripperCommand::Close
        );
    }

    #[test]
    fn test_extended_limb_opens_gripper() {
        let extended = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(
            engine().gripper_command(&extended).unwrap(),
            GripperCommand::Open
        );
    }

    #[test]
    fn test_coincident_points_are_rejected() {
        let mut f = frame();
        f.left.elbow = f.left.shoulder;
        assert_eq!(
            engine().compute_joint_command(&f),
            Err(RetargetError::Geometry(GeometryError::ZeroLengthVector))
        );
    }

    #[test]
    fn test_straight_hanging_arm_is_degenerate() {
        // Arm hanging straight down: the horizontal projection
        // vanishes (and the hand sits on the upper-arm line), so the
        // frame must be skipped, not commanded with a NaN.
        let mut f = frame();
        f.left = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, -2.0, 0.0),
        );
        assert!(engine().compute_joint_command(&f).is_err());
    }

    #[test]
    fn test_fixed_arm_ignores_tracking_input() {
        let eng = engine();
        let (a, _) = eng.compute_joint_command(&frame()).unwrap();
        let mut other = frame();
        other.left.hand = Point3::new(-2.0, 0.3, 0.4);
        other.right.hand = Point3::new(2.0, 0.0, 0.0);
        let (b, _) = eng.compute_joint_command(&other).unwrap();
        assert_eq!(a.fixed, b.fixed);
        assert_eq!(a.fixed, eng.config().fixed_pose);
    }

    #[test]
    fn test_neutral_named_angles_targets_mimic_side() {
        let named = engine().neutral_named_angles();
        assert_eq!(named.len(), 7);
        assert_relative_eq!(named["right_e0"], 1.57);
        assert!(named.keys().all(|k| k.starts_with("right_")));
    }

    #[test]
    fn test_clamp_regression_on_s0_edges() {
        let limits = JointLimits::default();
        for v in [-0.25, -0.26, -10.0] {
            assert_relative_eq!(limits.s0.clamp(v), -0.25);
        }
        for v in [1.60, 1.61, 10.0] {
            assert_relative_eq!(limits.s0.clamp(v), 1.60);
        }
    }
}
