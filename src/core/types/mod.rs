//! Core data types for retargeting operations.
//!
//! - [`Point3`]: 3-D position in the tracker's reference frame
//! - [`Vector3`]: 3-D displacement between two points
//! - [`ArmJoint`] / [`ArmSide`]: joint and arm identifiers
//! - [`JointAngles`]: one arm's seven joint angles as a typed record
//! - [`DualArmCommand`]: full 14-joint commanded pose
//! - [`GripperCommand`]: binary open/close command
//! - [`LimbPoints`] / [`SkeletonFrame`]: per-frame tracking input

mod frame;
mod joints;
mod point;

pub use frame::{LimbPoints, SkeletonFrame};
pub use joints::{ArmJoint, ArmSide, DualArmCommand, GripperCommand, JointAngles};
pub use point::{Point3, Vector3};
