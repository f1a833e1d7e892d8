#[cfg(test)]
mod tests {
    use crate::constraints::Constraints;
    use crate::kinematic_traits::{ElbowConfiguration, Kinematics, TargetPose};
    use crate::kinematics_error::KinematicsError;
    use crate::kinematics_impl::PlanarKinematics;
    use crate::parameters::LinkLengths;
    use crate::parameters_from_file::load_links_and_constraints;
    use crate::utils::dump_solutions;

    fn limited() -> PlanarKinematics {
        let (links, constraints) = load_links_and_constraints("src/tests/data/links/bench_arm_limited.yaml")
            .expect("Failed to load parameters from file");
        PlanarKinematics::new_with_constraints(links, constraints.expect("Constraints present"))
            .expect("Valid links")
    }

    #[test]
    fn test_only_compliant_branch_returned() {
        let robot = limited();
        let target = TargetPose::flat(20.0, 3.0);

        let solutions = robot.inverse_all(&target);
        dump_solutions(&solutions);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].elbow, ElbowConfiguration::Down);

        match robot.inverse(&target, ElbowConfiguration::Up) {
            Err(KinematicsError::JointLimits { joint, .. }) => assert_eq!(joint, 1),
            other => panic!("Expected joint limits error, got {:?}", other),
        }
    }

    #[test]
    fn test_unconstrained_returns_both() {
        let robot = PlanarKinematics::new(LinkLengths::bench_arm()).expect("Valid links");
        assert_eq!(robot.inverse_all(&TargetPose::flat(20.0, 3.0)).len(), 2);
    }

    #[test]
    fn test_unreachable_not_masked_by_limits() {
        let robot = limited();
        let result = robot.inverse(&TargetPose::flat(100.0, 0.0), ElbowConfiguration::Down);
        assert!(result.expect_err("Far target").is_unreachable());
    }

    #[test]
    fn test_base_limit_wraps_around() {
        // Base joint limited to [-90, 180] through 0. Elbow down at (20, 3) needs about -48.
        let robot = limited();
        let solution = robot
            .inverse(&TargetPose::flat(20.0, 3.0), ElbowConfiguration::Down)
            .expect("Within limits");
        assert!(solution.joints[0] < 0.0);

        let narrow = PlanarKinematics::new_with_constraints(
            LinkLengths::bench_arm(),
            Constraints::new([0.0, 0.0, 0.0], [180.0, 0.0, 0.0]),
        )
        .expect("Valid links");
        // Down needs negative θ1, up has θ1 of about 74
        let solutions = narrow.inverse_all(&TargetPose::flat(20.0, 3.0));
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].elbow, ElbowConfiguration::Up);
    }
}
