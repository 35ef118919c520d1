//! Joint identifiers and commanded-angle records.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One degree of freedom of a 7-DoF arm, in command order.
///
/// The short names follow the target arm's joint naming: two shoulder
/// axes (s0 rotation about vertical, s1 elevation), two elbow axes
/// (e0 rotation about the upper arm, e1 flexion), and three wrist axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmJoint {
    /// s0: shoulder rotation in the horizontal plane
    ShoulderRotation,
    /// s1: shoulder elevation (signed; arm raised vs. lowered)
    ShoulderElevation,
    /// e0: rotation of the upper arm about its own length
    ElbowRotation,
    /// e1: elbow flexion (0 = full extension, π = full flexion)
    ElbowFlexion,
    /// w0: wrist rotation
    WristRotation,
    /// w1: wrist flexion
    WristFlexion,
    /// w2: wrist twist
    WristTwist,
}

impl ArmJoint {
    /// All seven joints in command order.
    pub const ALL: [ArmJoint; 7] = [
        ArmJoint::ShoulderRotation,
        ArmJoint::ShoulderElevation,
        ArmJoint::ElbowRotation,
        ArmJoint::ElbowFlexion,
        ArmJoint::WristRotation,
        ArmJoint::WristFlexion,
        ArmJoint::WristTwist,
    ];

    /// Short joint name as used in named-angle commands.
    pub fn short_name(&self) -> &'static str {
        match self {
            ArmJoint::ShoulderRotation => "s0",
            ArmJoint::ShoulderElevation => "s1",
            ArmJoint::ElbowRotation => "e0",
            ArmJoint::ElbowFlexion => "e1",
            ArmJoint::WristRotation => "w0",
            ArmJoint::WristFlexion => "w1",
            ArmJoint::WristTwist => "w2",
        }
    }
}

/// Which of the robot's two arms a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmSide {
    Left,
    Right,
}

impl ArmSide {
    /// The other arm.
    #[inline]
    pub fn opposite(&self) -> ArmSide {
        match self {
            ArmSide::Left => ArmSide::Right,
            ArmSide::Right => ArmSide::Left,
        }
    }

    /// Name prefix as used in named-angle commands ("left"/"right").
    pub fn prefix(&self) -> &'static str {
        match self {
            ArmSide::Left => "left",
            ArmSide::Right => "right",
        }
    }

    /// Full joint key, e.g. `right_s0`.
    pub fn joint_key(&self, joint: ArmJoint) -> String {
        format!("{}_{}", self.prefix(), joint.short_name())
    }
}

impl fmt::Display for ArmSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One arm's seven joint angles in radians, as a typed record.
///
/// Each degree of freedom is a named field; there is no positional list
/// to keep in sync with a separate name sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Shoulder rotation (s0), radians
    pub s0: f32,
    /// Shoulder elevation (s1), radians
    pub s1: f32,
    /// Elbow rotation (e0), radians
    pub e0: f32,
    /// Elbow flexion (e1), radians
    pub e1: f32,
    /// Wrist rotation (w0), radians
    pub w0: f32,
    /// Wrist flexion (w1), radians
    pub w1: f32,
    /// Wrist twist (w2), radians
    pub w2: f32,
}

impl JointAngles {
    /// All joints at zero.
    pub const ZERO: JointAngles = JointAngles {
        s0: 0.0,
        s1: 0.0,
        e0: 0.0,
        e1: 0.0,
        w0: 0.0,
        w1: 0.0,
        w2: 0.0,
    };

    /// Angle for one joint.
    pub fn get(&self, joint: ArmJoint) -> f32 {
        match joint {
            ArmJoint::ShoulderRotation => self.s0,
            ArmJoint::ShoulderElevation => self.s1,
            ArmJoint::ElbowRotation => self.e0,
            ArmJoint::ElbowFlexion => self.e1,
            ArmJoint::WristRotation => self.w0,
            ArmJoint::WristFlexion => self.w1,
            ArmJoint::WristTwist => self.w2,
        }
    }

    /// Named-angle map for one side, e.g. `right_s0 → angle`.
    pub fn named(&self, side: ArmSide) -> HashMap<String, f32> {
        ArmJoint::ALL
            .iter()
            .map(|&j| (side.joint_key(j), self.get(j)))
            .collect()
    }
}

impl Default for JointAngles {
    fn default() -> Self {
        JointAngles::ZERO
    }
}

/// A full commanded pose for both arms, produced once per frame.
///
/// The mimicked arm carries the retargeted (clamped) angles; the other
/// arm always carries the engine's constant fixed pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualArmCommand {
    /// Which arm mimics the tracked limb
    pub mimic_side: ArmSide,
    /// Retargeted angles for the mimicked arm
    pub mimic: JointAngles,
    /// Constant pose for the non-mimicked arm
    pub fixed: JointAngles,
}

impl DualArmCommand {
    /// The 14-entry named-angle map consumed by the arm actuator.
    ///
    /// The two sides' key sets are disjoint, so merge order is
    /// irrelevant.
    pub fn named_angles(&self) -> HashMap<String, f32> {
        let mut all = self.mimic.named(self.mimic_side);
        all.extend(self.fixed.named(self.mimic_side.opposite()));
        all
    }
}

/// Binary end-effector command.
///
/// Derived independently each frame from the second limb's bend angle;
/// there is no hysteresis, a threshold crossing flips the command that
/// same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GripperCommand {
    Open,
    Close,
}

impl fmt::Display for GripperCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GripperCommand::Open => f.write_str("open"),
            GripperCommand::Close => f.write_str("close"),
        }
    }
}
