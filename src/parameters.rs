//! Defines the link length data structure

use crate::kinematics_error::KinematicsError;

/// Rigid lengths of the three serial links of the planar arm. Any consistent length unit
/// can be used, the solver output is in the same unit.
/// See [parameters_robots.rs](parameters_robots.rs) for concrete arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkLengths {
    /// Base joint to elbow.
    pub l1: f64,

    /// Elbow to wrist.
    pub l2: f64,

    /// Wrist to the tip of the end effector. Can be zero, in which case the arm
    /// behaves as 2-link arm and the orientation of the tip is ignored for position.
    pub l3: f64,
}

impl LinkLengths {
    /// Creates validated link lengths. l1 and l2 must be finite and positive,
    /// l3 finite and not negative.
    pub fn new(l1: f64, l2: f64, l3: f64) -> Result<Self, KinematicsError> {
        let links = LinkLengths { l1, l2, l3 };
        links.validate()?;
        Ok(links)
    }

    /// Checks the lengths. Needed for values constructed directly through public fields.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        for (link, length) in [(1, self.l1), (2, self.l2)] {
            if !length.is_finite() || length <= 0.0 {
                return Err(KinematicsError::InvalidLinkLength { link, length });
            }
        }
        if !self.l3.is_finite() || self.l3 < 0.0 {
            return Err(KinematicsError::InvalidLinkLength { link: 3, length: self.l3 });
        }
        Ok(())
    }

    /// Largest distance from the base the wrist can be placed at.
    pub fn max_reach(&self) -> f64 {
        self.l1 + self.l2
    }

    /// Smallest distance from the base the wrist can be placed at.
    pub fn min_reach(&self) -> f64 {
        (self.l1 - self.l2).abs()
    }

    /// Convert to string yaml representation (quick viewing, etc).
    pub fn to_yaml(&self) -> String {
        format!(
            "links:\n  \
              l1: {}\n  \
              l2: {}\n  \
              l3: {}\n",
            self.l1, self.l2, self.l3
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_lengths() {
        let links = LinkLengths::new(18.0, 16.5, 7.0).expect("valid lengths");
        assert_eq!(links.max_reach(), 34.5);
        assert_eq!(links.min_reach(), 1.5);
    }

    #[test]
    fn test_zero_length_tool_is_allowed() {
        assert!(LinkLengths::new(5.0, 5.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_lengths() {
        assert_eq!(
            LinkLengths::new(0.0, 1.0, 1.0),
            Err(KinematicsError::InvalidLinkLength { link: 1, length: 0.0 })
        );
        assert_eq!(
            LinkLengths::new(1.0, -2.0, 1.0),
            Err(KinematicsError::InvalidLinkLength { link: 2, length: -2.0 })
        );
        assert!(LinkLengths::new(1.0, 1.0, -0.5).is_err());
        assert!(LinkLengths::new(f64::NAN, 1.0, 1.0).is_err());
        assert!(LinkLengths::new(1.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_to_yaml() {
        let links = LinkLengths { l1: 18.0, l2: 16.5, l3: 7.0 };
        assert_eq!(links.to_yaml(), "links:\n  l1: 18\n  l2: 16.5\n  l3: 7\n");
    }
}
