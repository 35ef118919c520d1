//! I/O and infrastructure layer.
//!
//! This layer holds the outbound collaborator seams and frame-log
//! persistence. The retargeting core itself has no wire protocol; its
//! boundary is the two narrow actuation contracts plus a recorded-frame
//! format for offline replay.
//!
//! # Contents
//!
//! - [`actuation`]: Arm and gripper actuator traits + logging sink
//! - [`frame_log`]: Skeleton-frame recording and playback

pub mod actuation;
pub mod frame_log;

pub use actuation::{ArmActuator, GripperActuator, LoggingActuator};
pub use frame_log::{FrameLogPlayer, FrameLogRecorder, FrameRecord};
