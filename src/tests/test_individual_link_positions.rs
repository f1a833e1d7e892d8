#[cfg(test)]
mod tests {
    use crate::kinematic_traits::{Kinematics, Point, TargetPose, ElbowConfiguration};
    use crate::kinematics_impl::{PlanarKinematics, forward};
    use crate::parameters::LinkLengths;
    use crate::tests::test_utils::points_approx_equal;

    const TOLERANCE: f64 = 1e-9;

    fn check(actual: &[Point; 4], expected: [(f64, f64); 4]) {
        for (i, (a, (x, y))) in actual.iter().zip(expected).enumerate() {
            assert!(
                points_approx_equal(a, &Point::new(x, y), TOLERANCE),
                "Joint {}: expected ({}, {}), got {:?}", i, x, y, a
            );
        }
    }

    #[test]
    fn test_stretched_along_x() {
        let positions = forward(18.0, 16.5, 7.0, 0.0, 0.0, 0.0);
        check(&positions, [(0.0, 0.0), (18.0, 0.0), (34.5, 0.0), (41.5, 0.0)]);
    }

    #[test]
    fn test_pointing_up() {
        let positions = forward(18.0, 16.5, 7.0, 90.0, 0.0, 0.0);
        check(&positions, [(0.0, 0.0), (0.0, 18.0), (0.0, 34.5), (0.0, 41.5)]);
    }

    #[test]
    fn test_each_joint_is_relative() {
        // Square corner at every joint
        let positions = forward(2.0, 3.0, 4.0, 90.0, -90.0, -90.0);
        check(&positions, [(0.0, 0.0), (0.0, 2.0), (3.0, 2.0), (3.0, -2.0)]);

        let positions = forward(1.0, 1.0, 1.0, 0.0, 180.0, 0.0);
        check(&positions, [(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (-1.0, 0.0)]);
    }

    #[test]
    fn test_link_lengths_preserved() {
        let links = LinkLengths::bench_arm();
        let kinematics = PlanarKinematics::new(links).expect("Valid links");
        let positions = kinematics.forward(&[33.0, -71.5, 140.25]);

        let lengths = [links.l1, links.l2, links.l3];
        for i in 0..3 {
            let length = (positions[i + 1] - positions[i]).norm();
            assert!((length - lengths[i]).abs() < TOLERANCE, "Link {} has length {}", i + 1, length);
        }
    }

    #[test]
    fn test_solved_positions() {
        let links = LinkLengths::bench_arm();
        let kinematics = PlanarKinematics::new(links).expect("Valid links");
        let solution = kinematics
            .inverse(&TargetPose::flat(20.0, 3.0), ElbowConfiguration::Down)
            .expect("Reachable");
        let positions = kinematics.forward(&solution.joints);

        assert!(points_approx_equal(&positions[0], &Point::origin(), TOLERANCE));
        assert!((positions[1].coords.norm() - 18.0).abs() < TOLERANCE);
        assert!(points_approx_equal(&positions[2], &Point::new(13.0, 3.0), 1e-9));
        assert!(points_approx_equal(&positions[3], &Point::new(20.0, 3.0), 1e-9));
        // Elbow down: the elbow is below the base to wrist line
        assert!(positions[1].y < 0.0);
    }
}
