//! Per-frame tracking input records.

use serde::{Deserialize, Serialize};

use crate::core::types::Point3;

/// One tracked limb: shoulder, elbow and hand positions for a single
/// frame, all in the tracker's reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbPoints {
    pub shoulder: Point3,
    pub elbow: Point3,
    pub hand: Point3,
}

impl LimbPoints {
    pub fn new(shoulder: Point3, elbow: Point3, hand: Point3) -> Self {
        Self {
            shoulder,
            elbow,
            hand,
        }
    }
}

/// One skeleton tracking frame.
///
/// The left limb drives the mimicked arm; the right limb's bend angle
/// drives the gripper; the torso anchors the Cartesian pose mode.
/// Frames carry no identity: the engine computes on whatever points it
/// is given and assumes the caller preserves arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    /// Tracked limb driving the mimicked arm
    pub left: LimbPoints,
    /// Tracked limb driving the gripper command
    pub right: LimbPoints,
    /// Torso position (pose-mode reference)
    pub torso: Point3,
}
