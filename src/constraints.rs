//! Joint limits, used to drop IK solutions the arm cannot physically take

use crate::kinematic_traits::{Joints, Solution};

#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Normalized lower limit, degrees in [0, 360). If more than upper limit,
    /// the range wraps-around through 0
    pub from: [f64; 3],

    /// Normalized upper limit, degrees in [0, 360). If less than lower limit,
    /// the range wraps-around through 0
    pub to: [f64; 3],
}

fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

impl Constraints {
    /// Limits in degrees, any representation of the angle is accepted
    /// (-90 and 270 are the same). Joints with from == to are not constrained.
    pub fn new(from: [f64; 3], to: [f64; 3]) -> Self {
        Constraints {
            from: from.map(normalize),
            to: to.map(normalize),
        }
    }

    /// Index of the first joint outside its limits, if any.
    pub fn violation(&self, angles: &Joints) -> Option<usize> {
        for i in 0..3 {
            if self.from[i] == self.to[i] {
                continue; // Joint without constraints, from == to
            }
            let angle = normalize(angles[i]);
            let inside = if self.from[i] <= self.to[i] {
                angle >= self.from[i] && angle <= self.to[i]
            } else {
                angle >= self.from[i] || angle <= self.to[i]
            };
            if !inside {
                return Some(i);
            }
        }
        None
    }

    pub fn compliant(&self, angles: &Joints) -> bool {
        self.violation(angles).is_none()
    }

    pub fn filter(&self, solutions: &[Solution]) -> Vec<Solution> {
        solutions
            .iter()
            .filter(|solution| self.compliant(&solution.joints))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematic_traits::{ElbowConfiguration, Point};

    #[test]
    fn test_no_wrap_around() {
        let angles = [20.0, 40.0, 60.0];
        let limits = Constraints::new([0.0, 30.0, 50.0], [40.0, 50.0, 70.0]);
        assert!(limits.compliant(&angles));
    }

    #[test]
    fn test_with_wrap_around() {
        // -30 is 330 after normalization, inside [300, 20] that wraps through 0
        let angles = [-30.0, 10.0, 350.0];
        let limits = Constraints::new([300.0, -60.0, 340.0], [20.0, 20.0, 10.0]);
        assert!(limits.compliant(&angles));
    }

    #[test]
    fn test_unconstrained_joint() {
        let limits = Constraints::new([0.0, 0.0, 0.0], [0.0, 360.0, 90.0]);
        assert!(limits.compliant(&[123.0, 271.0, 45.0]));
    }

    #[test]
    fn test_violation_reports_joint() {
        let limits = Constraints::new([-90.0, -150.0, -90.0], [90.0, 150.0, 90.0]);
        assert_eq!(limits.violation(&[0.0, 0.0, 0.0]), None);
        assert_eq!(limits.violation(&[0.0, 170.0, 0.0]), Some(1));
        assert_eq!(limits.violation(&[100.0, 170.0, 0.0]), Some(0));
    }

    #[test]
    fn test_filter_solutions() {
        let limits = Constraints::new([0.0, 0.0, 0.0], [90.0, 90.0, 90.0]);
        let keep = Solution {
            joints: [30.0, 45.0, 60.0],
            wrist: Point::origin(),
            elbow: ElbowConfiguration::Down,
        };
        let drop = Solution {
            joints: [30.0, -45.0, 60.0],
            wrist: Point::origin(),
            elbow: ElbowConfiguration::Up,
        };
        let filtered = limits.filter(&[keep, drop]);
        assert_eq!(filtered, vec![keep]);
    }
}
