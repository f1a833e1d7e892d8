//! Closed-form inverse and forward kinematics of the 3-link planar arm

use tracing::{debug, warn};
use crate::constraints::Constraints;
use crate::kinematic_traits::{
    ElbowConfiguration, JointPositions, Joints, Kinematics, Point, Solution, Solutions, TargetPose,
};
use crate::kinematics_error::KinematicsError;
use crate::parameters::LinkLengths;
use crate::utils::angle_difference;
use crate::utils::planar_kinematics::is_valid;

/// Tolerance on cos θ2 beyond [-1, 1] that is still taken as reachable (rounding at the
/// boundary of the workspace). Anything further out is unreachable.
pub const REACH_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct PlanarKinematics {
    links: LinkLengths,
    constraints: Option<Constraints>,
}

impl PlanarKinematics {
    /// Creates a new `PlanarKinematics` instance with the given link lengths.
    pub fn new(links: LinkLengths) -> Result<Self, KinematicsError> {
        links.validate()?;
        Ok(PlanarKinematics {
            links,
            constraints: None,
        })
    }

    /// Creates a new instance that only returns solutions within the joint limits.
    pub fn new_with_constraints(links: LinkLengths, constraints: Constraints) -> Result<Self, KinematicsError> {
        links.validate()?;
        Ok(PlanarKinematics {
            links,
            constraints: Some(constraints),
        })
    }

    pub fn links(&self) -> &LinkLengths {
        &self.links
    }

    pub fn constraints(&self) -> Option<&Constraints> {
        self.constraints.as_ref()
    }
}

impl Kinematics for PlanarKinematics {
    fn inverse(&self, target: &TargetPose, elbow: ElbowConfiguration) -> Result<Solution, KinematicsError> {
        let solution = inverse_unchecked(&self.links, target, elbow)?;
        if let Some(constraints) = &self.constraints {
            if let Some(joint) = constraints.violation(&solution.joints) {
                warn!(joint, angle = solution.joints[joint], %elbow, "IK solution violates joint limits");
                return Err(KinematicsError::JointLimits {
                    joint,
                    angle: solution.joints[joint],
                });
            }
        }
        Ok(solution)
    }

    fn inverse_all(&self, target: &TargetPose) -> Solutions {
        let mut solutions: Solutions = Vec::with_capacity(2);
        for elbow in ElbowConfiguration::BOTH {
            let Ok(solution) = self.inverse(target, elbow) else {
                continue;
            };
            // At full extension or full fold both branches are the same pose
            let duplicate = solutions.iter().any(|s| {
                s.joints
                    .iter()
                    .zip(solution.joints.iter())
                    .all(|(a, b)| angle_difference(*a, *b).abs() < 1e-9)
            });
            if !duplicate {
                solutions.push(solution);
            }
        }
        solutions
    }

    fn forward(&self, joints: &Joints) -> JointPositions {
        forward_links(&self.links, joints)
    }
}

/// Inverse kinematics without checking joint limits.
fn inverse_unchecked(
    links: &LinkLengths,
    target: &TargetPose,
    elbow: ElbowConfiguration,
) -> Result<Solution, KinematicsError> {
    links.validate()?;
    for (name, value) in [
        ("x", target.position.x),
        ("y", target.position.y),
        ("psi", target.psi),
    ] {
        if !value.is_finite() {
            return Err(KinematicsError::NonFiniteInput { name, value });
        }
    }

    let LinkLengths { l1, l2, l3 } = *links;
    let psi = target.psi.to_radians();

    // Wrist is where the last link starts, this leaves a 2-link problem
    let xw = target.position.x - l3 * psi.cos();
    let yw = target.position.y - l3 * psi.sin();

    // Squares are taken in units of the longer link so that large lengths do not overflow
    let scale = l1.max(l2);
    let (a, b) = (l1 / scale, l2 / scale);
    let (xs, ys) = (xw / scale, yw / scale);
    let cos_t2 = (xs * xs + ys * ys - a * a - b * b) / (2.0 * a * b);

    // Check first, then clamp: the clamp only absorbs rounding at the boundary
    if !(-1.0 - REACH_TOLERANCE..=1.0 + REACH_TOLERANCE).contains(&cos_t2) {
        let distance = xw.hypot(yw);
        warn!(
            x = target.position.x,
            y = target.position.y,
            psi = target.psi,
            distance,
            "Target is unreachable"
        );
        return Err(KinematicsError::Unreachable {
            distance,
            min_reach: links.min_reach(),
            max_reach: links.max_reach(),
        });
    }
    let cos_t2 = cos_t2.clamp(-1.0, 1.0);

    let mut t2 = cos_t2.acos();
    if elbow == ElbowConfiguration::Up {
        t2 = -t2;
    }

    let t1 = yw.atan2(xw) - (b * t2.sin()).atan2(a + b * t2.cos());

    // Wrist angle to achieve psi
    let t3 = psi - t1 - t2;

    let solution = Solution {
        joints: [t1.to_degrees(), t2.to_degrees(), t3.to_degrees()],
        wrist: Point::new(xw, yw),
        elbow,
    };
    debug_assert!(is_valid(&solution.joints), "Finite input must give finite joints");
    debug!(?target, %elbow, joints = ?solution.joints, "IK solved");
    Ok(solution)
}

fn forward_links(links: &LinkLengths, joints: &Joints) -> JointPositions {
    let t1 = joints[0].to_radians();
    let t12 = t1 + joints[1].to_radians();
    let t123 = t12 + joints[2].to_radians();

    let p0 = Point::origin();
    let p1 = Point::new(p0.x + links.l1 * t1.cos(), p0.y + links.l1 * t1.sin());
    let p2 = Point::new(p1.x + links.l2 * t12.cos(), p1.y + links.l2 * t12.sin());
    let p3 = Point::new(p2.x + links.l3 * t123.cos(), p2.y + links.l3 * t123.sin());

    [p0, p1, p2, p3]
}

/// Solves the joint angles (degrees) for the tip at (x, y) with the last link pointing
/// at `psi_deg`. Fails if any length is invalid, any input is not finite or the target
/// is out of reach. Joint limits are not checked, use [`PlanarKinematics`] for that.
/// ```
/// use planar_arm_kinematics::kinematic_traits::ElbowConfiguration;
/// use planar_arm_kinematics::kinematics_impl::{forward, solve};
///
/// let solution = solve(18.0, 16.5, 7.0, 20.0, 3.0, 0.0, ElbowConfiguration::Down).unwrap();
/// let [t1, t2, t3] = solution.joints;
/// let tip = forward(18.0, 16.5, 7.0, t1, t2, t3)[3];
/// assert!((tip.x - 20.0).abs() < 1e-6 && (tip.y - 3.0).abs() < 1e-6);
/// ```
pub fn solve(
    l1: f64,
    l2: f64,
    l3: f64,
    x: f64,
    y: f64,
    psi_deg: f64,
    elbow: ElbowConfiguration,
) -> Result<Solution, KinematicsError> {
    inverse_unchecked(&LinkLengths { l1, l2, l3 }, &TargetPose::new(x, y, psi_deg), elbow)
}

/// Positions of the base, elbow, wrist and tip for the given joint angles (degrees).
pub fn forward(l1: f64, l2: f64, l3: f64, t1_deg: f64, t2_deg: f64, t3_deg: f64) -> JointPositions {
    forward_links(&LinkLengths { l1, l2, l3 }, &[t1_deg, t2_deg, t3_deg])
}
