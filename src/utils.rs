//! Helper functions

use crate::kinematic_traits::{JointPositions, Joints, Solution, Solutions};

/// Checks the solution for validity. This is only internally needed as all returned
/// solutions are already checked.
pub(crate) mod planar_kinematics {
    use crate::kinematic_traits::Joints;

    /// Checks if all elements in the array are finite
    pub fn is_valid(qs: &Joints) -> bool {
        qs.iter().all(|&q| q.is_finite())
    }
}

/// Maps the angle in degrees to (-180, 180]
pub fn normalize_degrees(angle: f64) -> f64 {
    let x = angle.rem_euclid(360.0);
    if x > 180.0 { x - 360.0 } else { x }
}

/// Smallest signed difference a - b between two angles in degrees, in (-180, 180]
pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_degrees(a - b)
}

/// Direction of the last link in degrees, normalized to (-180, 180]
pub fn tip_direction(joints: &Joints) -> f64 {
    normalize_degrees(joints[0] + joints[1] + joints[2])
}

pub fn format_joints(joints: &Joints) -> String {
    let mut row_str = String::new();
    for joint in joints {
        row_str.push_str(&format!("{:7.2} ", joint));
    }
    format!("[{}]", row_str.trim_end())
}

/// Print joint values for all solutions, in degrees.
pub fn dump_solutions(solutions: &Solutions) {
    if solutions.is_empty() {
        println!("No solutions");
    }
    for solution in solutions {
        dump_solution(solution);
    }
}

/// Print joint values of the solution with its elbow configuration and wrist.
pub fn dump_solution(solution: &Solution) {
    println!(
        "{:>4}: {} wrist ({:.2}, {:.2})",
        solution.elbow,
        format_joints(&solution.joints),
        solution.wrist.x,
        solution.wrist.y
    );
}

/// Print joint values, in degrees.
pub fn dump_joints(joints: &Joints) {
    println!("{}", format_joints(joints));
}

/// Print positions of all joints, base first.
pub fn dump_positions(positions: &JointPositions) {
    const NAMES: [&str; 4] = ["base", "elbow", "wrist", "tip"];
    for (name, p) in NAMES.iter().zip(positions.iter()) {
        println!("{:>5}: ({:8.3}, {:8.3})", name, p.x, p.y);
    }
}

#[cfg(test)]
mod tests {
    use super::planar_kinematics::*;
    use super::*;

    #[test]
    fn test_is_valid_with_all_finite() {
        let qs = [0.0, 1.0, -180.0];
        assert!(is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_nan() {
        let qs = [0.0, f64::NAN, 1.0];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_infinity() {
        let qs = [0.0, f64::INFINITY, 1.0];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-450.0), -90.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert_eq!(angle_difference(350.0, 10.0), -20.0);
        assert_eq!(angle_difference(10.0, 350.0), 20.0);
    }

    #[test]
    fn test_dumps_accept_any_solution_set() {
        use crate::kinematic_traits::{ElbowConfiguration, Point};
        let solution = Solution {
            joints: [10.0, 20.0, -30.0],
            wrist: Point::new(1.0, 2.0),
            elbow: ElbowConfiguration::Up,
        };
        dump_solutions(&vec![]);
        dump_solutions(&vec![solution]);
        dump_joints(&solution.joints);
        dump_positions(&[Point::origin(); 4]);
    }

    #[test]
    fn test_format_joints() {
        assert_eq!(format_joints(&[1.0, -2.5, 180.0]), "[   1.00   -2.50  180.00]");
    }
}
