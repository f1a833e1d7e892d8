//! Manual control of the arm without hardware: operator keys are replayed on the simulated
//! driver, each actuation is printed. Set RUST_LOG=debug to see every output written.

use planar_arm_kinematics::arm_state::{ArmConfig, ArmState, ManualCommand};
use planar_arm_kinematics::simulation::SimulatedDriver;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = ArmConfig::bench_arm();
    let mut state = ArmState::new(&config)?;
    let mut driver = SimulatedDriver::default();

    println!("Homing");
    for actuation in state.home(&mut driver)? {
        println!("  {:?}", actuation);
    }

    // Hold Right for a moment, raise the arm, flex the wrist and grab
    let session = [
        ("Right", true),
        ("Right", false),
        ("w", true),
        ("w", true),
        ("d", true),
        ("e", true),
        ("c", true),
        ("c", true),
        ("Up", true),
        ("Up", false),
        ("Escape", true),
    ];
    for (key, pressed) in session {
        let Some(command) = ManualCommand::from_key(key) else {
            continue;
        };
        let actuations = if pressed {
            println!("{} ({})", command.description(), key);
            state.press(&mut driver, command)?
        } else {
            println!("Released {}", key);
            state.release(&mut driver, command)?
        };
        for actuation in actuations {
            println!("  {:?}", actuation);
        }
    }

    println!("{} outputs written", driver.writes);
    Ok(())
}
