//! Hardcoded link lengths for a few arms

use crate::parameters::LinkLengths;

impl LinkLengths {
    /// The desktop bench arm, lengths in centimeters.
    pub fn bench_arm() -> Self {
        LinkLengths {
            l1: 18.0,
            l2: 16.5,
            l3: 7.0,
        }
    }

    /// Same arm with the gripper removed, the wrist becomes the tip.
    pub fn bench_arm_no_gripper() -> Self {
        LinkLengths {
            l3: 0.0,
            ..Self::bench_arm()
        }
    }

    /// Symmetric arm with unit links, convenient for checking the math by hand.
    pub fn unit() -> Self {
        LinkLengths {
            l1: 1.0,
            l2: 1.0,
            l3: 1.0,
        }
    }
}
