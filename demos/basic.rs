use planar_arm_kinematics::constraints::Constraints;
use planar_arm_kinematics::kinematic_traits::{ElbowConfiguration, Kinematics, TargetPose, JOINTS_AT_ZERO};
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::parameters::LinkLengths;
use planar_arm_kinematics::utils::{dump_joints, dump_positions, dump_solution, dump_solutions};

/// Usage example.
fn main() {
    let robot = PlanarKinematics::new(LinkLengths::bench_arm()).expect("Bench arm links are valid");
    println!("Joint positions with all joints at zero (arm stretched along +x):");
    dump_positions(&robot.forward(&JOINTS_AT_ZERO));

    let target = TargetPose::flat(20.0, 3.0);
    println!("Both elbow configurations for the tip at (20, 3), last link along +x:");
    let solutions = robot.inverse_all(&target);
    dump_solutions(&solutions);

    for solution in &solutions {
        println!("Forward kinematics of the {} solution:", solution.elbow);
        dump_positions(&robot.forward(&solution.joints));
    }

    println!("The last link pointing up reaches further above the base:");
    match robot.inverse(&TargetPose::new(-10.0, 25.0, 90.0), ElbowConfiguration::Up) {
        Ok(solution) => dump_solution(&solution),
        Err(e) => println!("{}", e),
    }

    println!("Targets out of reach are reported, not approximated:");
    if let Err(e) = robot.inverse(&TargetPose::flat(45.0, 0.0), ElbowConfiguration::Down) {
        println!("{}", e);
    }

    // Elbow only bends one way
    let robot = PlanarKinematics::new_with_constraints(
        LinkLengths::bench_arm(),
        Constraints::new([-90.0, 0.0, 0.0], [180.0, 170.0, 0.0]),
    )
    .expect("Bench arm links are valid");
    println!("With constraints, only the compliant solution remains:");
    let solutions = robot.inverse_all(&target);
    dump_solutions(&solutions);
    if let Some(solution) = solutions.first() {
        dump_joints(&solution.joints);
    }

    #[cfg(feature = "allow_filesystem")]
    {
        println!("Reading:\n{}", LinkLengths::bench_arm().to_yaml());
    }
}
