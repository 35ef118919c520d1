//! Cartesian pose retargeting (secondary path).
//!
//! Instead of deriving joint angles, maps the tracked hand position to
//! an end-effector target pose relative to the torso, with a fixed
//! downward-facing orientation. Kept as an alternate output mode; the
//! joint-angle path in [`crate::engine::retarget`] tracks noticeably
//! better and is the primary contract.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::math::{angle_between, vector_from_points};
use crate::core::types::{GripperCommand, SkeletonFrame};
use crate::engine::retarget::RetargetError;

/// Target arm segment length used by [`PoseMode::anatomical_scale`]:
/// 41 inches in meters.
const ROBOT_ARM_LENGTH_M: f32 = 41.0 * 2.54 / 100.0;

/// An end-effector target pose: position in meters, orientation in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Configuration for the Cartesian pose mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseModeConfig {
    /// Tracker-to-robot displacement scale. The deployed system ran
    /// with 1.0 even though an anatomical scale was available; kept
    /// configurable so callers can opt in via
    /// [`PoseMode::anatomical_scale`].
    pub scale: f32,
    /// Forward offset added to the x target (meters).
    pub x_offset: f32,
    /// Vertical offset added to the z target (meters).
    pub z_offset: f32,
    /// Second-limb bend angle above which the gripper closes (radians),
    /// strict comparison as in the joint path.
    pub gripper_close_threshold: f32,
}

impl Default for PoseModeConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x_offset: 0.2,
            z_offset: -0.3,
            gripper_close_threshold: 0.8,
        }
    }
}

/// Cartesian pose retargeter.
///
/// Stateless like the joint-angle engine: holds only configuration.
#[derive(Debug, Clone)]
pub struct PoseMode {
    config: PoseModeConfig,
}

impl PoseMode {
    /// Create a pose-mode retargeter with the given configuration.
    pub fn new(config: PoseModeConfig) -> Self {
        Self { config }
    }

    /// The retargeter's configuration.
    pub fn config(&self) -> &PoseModeConfig {
        &self.config
    }

    /// Compute the end-effector pose and gripper command for one frame.
    ///
    /// Tracker axes map to robot axes as: robot x (out) from tracker
    /// depth, robot y (left) from tracker x, robot z (up) from tracker
    /// height. Orientation is fixed facing down (roll 0, pitch π,
    /// yaw 0).
    pub fn compute_pose_command(
        &self,
        frame: &SkeletonFrame,
    ) -> Result<(CartesianPose, GripperCommand), RetargetError> {
        let hand = frame.left.hand;
        let torso = frame.torso;
        let pose = CartesianPose {
            x: (torso.z - hand.z) * self.config.scale + self.config.x_offset,
            y: (hand.x - torso.x) * self.config.scale,
            z: (torso.y - hand.y) * self.config.scale + self.config.z_offset,
            roll: 0.0,
            pitch: PI,
            yaw: 0.0,
        };

        let upper_arm = vector_from_points(&frame.right.shoulder, &frame.right.elbow);
        let forearm = vector_from_points(&frame.right.elbow, &frame.right.hand);
        let bend = angle_between(&upper_arm, &forearm)?;
        let gripper = if bend > self.config.gripper_close_threshold {
            GripperCommand::Close
        } else {
            GripperCommand::Open
        };
        Ok((pose, gripper))
    }

    /// Scale factor that maps the operator's arm length onto the target
    /// arm's reach. Computed from the tracked limb's segment lengths;
    /// assign it to [`PoseModeConfig::scale`] to enable anatomical
    /// scaling.
    pub fn anatomical_scale(frame: &SkeletonFrame) -> f32 {
        let arm_length = frame.left.shoulder.distance(&frame.left.elbow)
            + frame.left.elbow.distance(&frame.left.hand);
        ROBOT_ARM_LENGTH_M / arm_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LimbPoints, Point3};
    use approx::assert_relative_eq;

    fn test_frame() -> SkeletonFrame {
        SkeletonFrame {
            left: LimbPoints::new(
                Point3::new(0.2, 0.5, 0.1),
                Point3::new(0.2, 0.2, 0.3),
                Point3::new(0.4, 0.1, 0.6),
            ),
            right: LimbPoints::new(
                Point3::new(-0.2, 0.5, 0.1),
                Point3::new(-0.3, 0.2, 0.2),
                Point3::new(-0.3, 0.0, 0.5),
            ),
            torso: Point3::new(0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn test_pose_follows_hand_relative_to_torso() {
        let mode = PoseMode::new(PoseModeConfig::default());
        let (pose, _) = mode.compute_pose_command(&test_frame()).unwrap();
        assert_relative_eq!(pose.x, (1.0 - 0.6) + 0.2, epsilon = 1e-6);
        assert_relative_eq!(pose.y, 0.4 - 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.z, (0.0 - 0.1) - 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_orientation_is_fixed_facing_down() {
        let mode = PoseMode::new(PoseModeConfig::default());
        let (pose, _) = mode.compute_pose_command(&test_frame()).unwrap();
        assert_relative_eq!(pose.roll, 0.0);
        assert_relative_eq!(pose.pitch, PI);
        assert_relative_eq!(pose.yaw, 0.0);
    }

    #[test]
    fn test_scale_applies_to_displacements_only() {
        let config = PoseModeConfig {
            scale: 2.0,
            ..PoseModeConfig::default()
        };
        let mode = PoseMode::new(config);
        let (pose, _) = mode.compute_pose_command(&test_frame()).unwrap();
        // Offsets are added after scaling.
        assert_relative_eq!(pose.x, 0.4 * 2.0 + 0.2, epsilon = 1e-6);
        assert_relative_eq!(pose.z, -0.1 * 2.0 - 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_anatomical_scale_uses_limb_segments() {
        let mut frame = test_frame();
        // 0.3m upper arm + 0.4m forearm.
        frame.left = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.3, 0.0, 0.0),
            Point3::new(0.3, 0.4, 0.0),
        );
        let scale = PoseMode::anatomical_scale(&frame);
        assert_relative_eq!(scale, ROBOT_ARM_LENGTH_M / 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_gripper_matches_joint_path_threshold() {
        let mode = PoseMode::new(PoseModeConfig::default());
        let mut frame = test_frame();
        // Extended second limb: open.
        frame.right = LimbPoints::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        let (_, gripper) = mode.compute_pose_command(&frame).unwrap();
        assert_eq!(gripper, GripperCommand::Open);

        // Right-angle bend: close.
        frame.right.hand = Point3::new(1.0, 1.0, 0.0);
        let (_, gripper) = mode.compute_pose_command(&frame).unwrap();
        assert_eq!(gripper, GripperCommand::Close);
    }
}
