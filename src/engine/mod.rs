//! Retargeting engine layer.
//!
//! Converts per-frame skeleton points into arm and gripper commands.
//!
//! # Contents
//!
//! - [`limits`]: Per-joint safe ranges and the saturation clamp
//! - [`retarget`]: Joint-angle retargeting (primary path)
//! - [`pose_mode`]: Cartesian pose retargeting (secondary path)

pub mod limits;
pub mod pose_mode;
pub mod retarget;

pub use limits::{JointLimits, JointRange};
pub use pose_mode::{CartesianPose, PoseMode, PoseModeConfig};
pub use retarget::{RetargetConfig, RetargetError, RetargetingEngine};
