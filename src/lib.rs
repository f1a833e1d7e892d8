//! Rust implementation of closed-form inverse and forward kinematics for a 3-link planar arm
//! (shoulder, elbow, wrist), with the servo and motor glue needed to drive a small hobby arm.
//!
//! The tip target is given as a position plus the direction of the last link (psi). The solver
//! first subtracts the last link to find the wrist point, then solves the remaining 2-link
//! problem with the law of cosines. Each reachable target has two solutions, elbow down and
//! elbow up, which coincide at full extension or full fold.
//!
//! # Features
//!
//! - Deterministic, non-iterative solver. Unreachable targets, invalid link lengths, and
//!   non-finite input are reported as errors and never produce NaN joint angles.
//! - Forward kinematics returning the positions of all joints, for drawing or cross-checking.
//! - Joint angles can be checked against constraints, so only compliant solutions are returned.
//! - Parallel reachability map over a grid of targets.
//! - SVG diagram of the solved configuration with joint angle arcs.
//! - Angle to servo pulse width and PWM duty cycle conversion, H-bridge motor direction, and
//!   the keyboard manual control of the arm, all behind driver traits so no hardware is needed
//!   for testing.
//! - Link lengths and the arm layout can be read from YAML files.
//!
//! # Conventions
//!
//! All angles are in degrees. θ1 is measured from the world +x axis, θ2 relative to link 1,
//! θ3 relative to link 2, so θ1 + θ2 + θ3 is the direction of the last link.
//!
//! ## Examples
//!
//! - **basic.rs**: Inverse and forward kinematics, both elbow configurations, constraints.
//! - **manual_control.rs**: Replaying operator key presses on the simulated arm.

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;
pub mod kinematics_error;

pub mod constraints;

pub mod workspace;

pub mod diagram;

pub mod actuator_error;
pub mod servo;
pub mod motor;
pub mod arm_state;
pub mod simulation;

#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

#[cfg(test)]
#[cfg(feature = "allow_filesystem")]
mod tests;
