//! Errors reported by the kinematics solver

/// Failure of an inverse kinematics request. Forward kinematics never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// Link 1 and 2 must be finite and positive, link 3 finite and not negative.
    #[error("Invalid length of link {link}: {length}")]
    InvalidLinkLength { link: usize, length: f64 },

    #[error("Input '{name}' must be finite (got {value})")]
    NonFiniteInput { name: &'static str, value: f64 },

    /// The wrist point is further than l1 + l2 or closer than |l1 - l2| to the base.
    #[error("Target is unreachable: wrist distance {distance:.4} is outside [{min_reach:.4}, {max_reach:.4}]")]
    Unreachable { distance: f64, min_reach: f64, max_reach: f64 },

    /// Joint index is 0-based.
    #[error("Joint {joint} angle {angle:.2} deg is outside of its limits")]
    JointLimits { joint: usize, angle: f64 },

    #[error("Unknown elbow configuration '{0}', expected 'down' or 'up'")]
    UnknownElbow(String),
}

impl KinematicsError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, KinematicsError::Unreachable { .. })
    }
}
