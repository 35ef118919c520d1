//! chhaya-retarget - Skeleton-to-arm retargeting for dual-arm teleoperation
//!
//! Maps a tracked human operator's skeletal joint positions onto the joint
//! commands of a 7-DoF robot arm with a different kinematic structure. One
//! tracked limb (shoulder/elbow/hand) drives the mimicked arm frame by frame;
//! the second limb's bend angle drives a binary gripper command; the robot's
//! other arm is held at a constant pose.
//!
//! # Architecture
//!
//! The crate is organized into 3 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Infrastructure
//! │          (actuation seams, frame logs)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Retargeting
//! │        (joint limits, angle derivation,             │
//! │              Cartesian pose mode)                   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Control flow
//!
//! Each tracking frame delivers six 3-D points (two limbs × three joints)
//! plus the torso. [`RetargetingEngine::compute_joint_command`] converts
//! them into a clamped [`DualArmCommand`] and a [`GripperCommand`], which
//! the caller hands to its actuation collaborators. The engine is stateless:
//! every frame is an independent, bounded computation.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Retargeting engine (depends on core)
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 3: I/O infrastructure (depends on core, engine)
// ============================================================================
pub mod io;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::math::GeometryError;
pub use crate::core::types::{ArmJoint, ArmSide, DualArmCommand, GripperCommand, JointAngles};
pub use crate::core::types::{LimbPoints, Point3, SkeletonFrame, Vector3};

// Engine
pub use crate::engine::limits::{JointLimits, JointRange};
pub use crate::engine::pose_mode::{CartesianPose, PoseMode, PoseModeConfig};
pub use crate::engine::retarget::{RetargetConfig, RetargetError, RetargetingEngine};

// I/O
pub use crate::io::actuation::{ArmActuator, GripperActuator, LoggingActuator};
pub use crate::io::frame_log::{FrameLogPlayer, FrameLogRecorder, FrameRecord};
