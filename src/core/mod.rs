//! Core foundation layer.
//!
//! This is the bottom layer of the retargeting stack with no internal
//! dependencies. All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (points, joints, frames, commands)
//! - [`math`]: Vector geometry primitives (angles, projections)

pub mod math;
pub mod types;
