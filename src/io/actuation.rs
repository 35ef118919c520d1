//! Outbound actuation seams.
//!
//! The retargeting core never talks to hardware directly; it hands each
//! frame's result to an [`ArmActuator`] and a [`GripperActuator`].
//! Real drivers live outside this crate. The [`LoggingActuator`]
//! implementation here is the sink used by the replay node and by
//! tests: it logs every command and remembers the most recent one.
//!
//! Gripper commands are idempotent on the robot side; implementations
//! may be invoked with the same state on every frame.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::types::GripperCommand;
use crate::engine::pose_mode::CartesianPose;

/// Actuation errors.
#[derive(Error, Debug)]
pub enum ActuationError {
    /// The actuator refused the command (driver-level validation).
    #[error("actuator rejected command: {0}")]
    Rejected(String),

    /// Transport failure talking to the driver.
    #[error("actuation transport failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ActuationError>;

/// An arm that accepts named joint-angle targets.
///
/// `named` maps joint keys (e.g. `right_s0`) to target angles in
/// radians, applied as a single simultaneous commanded pose.
pub trait ArmActuator {
    /// Command a set of joint angles.
    fn command_joints(&mut self, named: &HashMap<String, f32>) -> Result<()>;

    /// Command a Cartesian end-effector pose (pose-mode path).
    fn command_pose(&mut self, pose: &CartesianPose) -> Result<()>;

    /// Move the mimicked arm to its neutral reset pose.
    fn move_to_neutral(&mut self, neutral: &HashMap<String, f32>) -> Result<()>;
}

/// An end effector that accepts idempotent open/close commands.
pub trait GripperActuator {
    /// Command the gripper state.
    fn command_gripper(&mut self, cmd: GripperCommand) -> Result<()>;
}

/// Command sink that logs instead of actuating.
///
/// Stands in for the robot driver during replay and testing. Repeated
/// gripper states are forwarded every frame (the contract is
/// idempotent) but only logged on transitions to keep the output
/// readable.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    /// Most recent joint command, if any
    last_joints: Option<HashMap<String, f32>>,
    /// Most recent pose command, if any
    last_pose: Option<CartesianPose>,
    /// Most recent gripper state, if any
    last_gripper: Option<GripperCommand>,
    /// Total joint/pose commands accepted
    commands: u64,
    /// Gripper state transitions observed
    gripper_transitions: u64,
}

impl LoggingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent joint command.
    pub fn last_joints(&self) -> Option<&HashMap<String, f32>> {
        self.last_joints.as_ref()
    }

    /// Most recent pose command.
    pub fn last_pose(&self) -> Option<&CartesianPose> {
        self.last_pose.as_ref()
    }

    /// Most recent gripper state.
    pub fn last_gripper(&self) -> Option<GripperCommand> {
        self.last_gripper
    }

    /// Total arm commands accepted.
    pub fn commands(&self) -> u64 {
        self.commands
    }

    /// Gripper open/close transitions observed.
    pub fn gripper_transitions(&self) -> u64 {
        self.gripper_transitions
    }
}

impl ArmActuator for LoggingActuator {
    fn command_joints(&mut self, named: &HashMap<String, f32>) -> Result<()> {
        log::debug!("joint command: {} joints", named.len());
        self.last_joints = Some(named.clone());
        self.commands += 1;
        Ok(())
    }

    fn command_pose(&mut self, pose: &CartesianPose) -> Result<()> {
        log::debug!(
            "pose command: x={:.3} y={:.3} z={:.3}",
            pose.x,
            pose.y,
            pose.z
        );
        self.last_pose = Some(*pose);
        self.commands += 1;
        Ok(())
    }

    fn move_to_neutral(&mut self, neutral: &HashMap<String, f32>) -> Result<()> {
        log::info!("moving to neutral ({} joints)", neutral.len());
        self.last_joints = Some(neutral.clone());
        self.commands += 1;
        Ok(())
    }
}

impl GripperActuator for LoggingActuator {
    fn command_gripper(&mut self, cmd: GripperCommand) -> Result<()> {
        if self.last_gripper != Some(cmd) {
            log::info!("gripper: {}", cmd);
            if self.last_gripper.is_some() {
                self.gripper_transitions += 1;
            }
        }
        self.last_gripper = Some(cmd);
        Ok(())
    }
}
