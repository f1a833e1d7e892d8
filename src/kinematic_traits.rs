//! Core types and the kinematics trait for the 3-link planar arm

extern crate nalgebra as na;

use std::fmt;
use std::str::FromStr;
use na::Point2;
use crate::kinematics_error::KinematicsError;

/// Point in the plane of the arm. The base of the arm is at the origin.
pub type Point = Point2<f64>;

/// Joint angles (θ1, θ2, θ3) in degrees. θ1 is measured from the world +x axis,
/// θ2 relative to the direction of link 1 and θ3 relative to the direction of link 2.
pub type Joints = [f64; 3];

/// Positions of the base, the end of link 1, the wrist (end of link 2) and the tip
/// (end of link 3), in that order.
pub type JointPositions = [Point; 4];

/// Inverse kinematics may return up to 2 solutions, one per elbow configuration.
pub type Solutions = Vec<Solution>;

/// All joints at zero, the arm fully stretched along +x.
pub const JOINTS_AT_ZERO: Joints = [0.0, 0.0, 0.0];

/// Desired pose of the tip: position plus direction of the last link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPose {
    /// Tip position
    pub position: Point,

    /// Direction of the final link in degrees, 0 is aligned with +x, 90 points up.
    /// Any finite value is accepted, it does not need to be normalized.
    pub psi: f64,
}

impl TargetPose {
    pub fn new(x: f64, y: f64, psi: f64) -> Self {
        TargetPose {
            position: Point::new(x, y),
            psi,
        }
    }

    /// Tip pose with the last link aligned with the +x axis.
    pub fn flat(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }
}

/// Selects one of the two geometric solutions of the 2-link sub-chain.
/// `Down` produces the non-negative θ2, `Up` its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "allow_filesystem", derive(clap::ValueEnum, serde::Deserialize))]
#[cfg_attr(feature = "allow_filesystem", serde(rename_all = "lowercase"))]
pub enum ElbowConfiguration {
    #[default]
    Down,
    Up,
}

impl ElbowConfiguration {
    pub const BOTH: [ElbowConfiguration; 2] = [ElbowConfiguration::Down, ElbowConfiguration::Up];
}

impl fmt::Display for ElbowConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElbowConfiguration::Down => write!(f, "down"),
            ElbowConfiguration::Up => write!(f, "up"),
        }
    }
}

impl FromStr for ElbowConfiguration {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(ElbowConfiguration::Down),
            "up" => Ok(ElbowConfiguration::Up),
            _ => Err(KinematicsError::UnknownElbow(s.to_string())),
        }
    }
}

/// Result of a successful inverse kinematics call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Joint angles in degrees
    pub joints: Joints,

    /// The wrist point the 2-link sub-chain has been solved for (end of link 2).
    pub wrist: Point,

    /// The branch this solution belongs to.
    pub elbow: ElbowConfiguration,
}

pub trait Kinematics {
    /// Solve joint angles for the given tip pose and elbow configuration.
    fn inverse(&self, target: &TargetPose, elbow: ElbowConfiguration) -> Result<Solution, KinematicsError>;

    /// All valid solutions for the given tip pose, elbow down first. Returns
    /// a single solution if both branches coincide and an empty vector if the pose
    /// cannot be reached.
    fn inverse_all(&self, target: &TargetPose) -> Solutions;

    /// Positions of all joints for the given joint angles (degrees).
    fn forward(&self, joints: &Joints) -> JointPositions;

    /// Position of the tip only.
    fn forward_tip(&self, joints: &Joints) -> Point {
        self.forward(joints)[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elbow_from_str() {
        assert_eq!("Up".parse::<ElbowConfiguration>(), Ok(ElbowConfiguration::Up));
        assert_eq!(" down ".parse::<ElbowConfiguration>(), Ok(ElbowConfiguration::Down));
        assert_eq!("DOWN".parse::<ElbowConfiguration>(), Ok(ElbowConfiguration::Down));
        assert_eq!(
            "sideways".parse::<ElbowConfiguration>(),
            Err(KinematicsError::UnknownElbow("sideways".to_string()))
        );
        assert!("".parse::<ElbowConfiguration>().is_err());

        for elbow in ElbowConfiguration::BOTH {
            assert_eq!(elbow.to_string().parse::<ElbowConfiguration>(), Ok(elbow));
        }
    }
}
