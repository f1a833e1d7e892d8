use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use planar_arm_kinematics::arm_state::{ArmConfig, ArmState, ManualCommand};
use planar_arm_kinematics::diagram::plot_diagram;
use planar_arm_kinematics::kinematic_traits::{ElbowConfiguration, Kinematics, TargetPose};
use planar_arm_kinematics::kinematics_impl::PlanarKinematics;
use planar_arm_kinematics::parameters::LinkLengths;
use planar_arm_kinematics::parameters_from_file::load_links_and_constraints;
use planar_arm_kinematics::servo::{PulseProfile, ServoRange, angle_to_duty_cycle, pulse_width_us};
use planar_arm_kinematics::simulation::SimulatedDriver;
use planar_arm_kinematics::utils::{dump_positions, dump_solution, dump_solutions, tip_direction};
use planar_arm_kinematics::workspace::{Grid, ReachMap};

/// Inverse and forward kinematics of the 3-link planar arm.
#[derive(Parser)]
#[command(name = "planar-arm", version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Link lengths, from a YAML file or given directly. Missing values are taken from the
/// bench arm.
#[derive(Args)]
struct LinkArgs {
    /// YAML file with `links` and optional `constraints`.
    #[arg(long, conflicts_with_all = ["l1", "l2", "l3"])]
    links: Option<PathBuf>,

    #[arg(long)]
    l1: Option<f64>,

    #[arg(long)]
    l2: Option<f64>,

    #[arg(long)]
    l3: Option<f64>,
}

#[derive(Args)]
struct PoseArgs {
    #[arg(allow_hyphen_values = true)]
    x: f64,

    #[arg(allow_hyphen_values = true)]
    y: f64,

    /// Direction of the last link, degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    psi: f64,

    #[arg(long, value_enum, default_value_t = ElbowConfiguration::Down)]
    elbow: ElbowConfiguration,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve joint angles for the tip target.
    Solve {
        #[command(flatten)]
        pose: PoseArgs,

        /// Print both elbow configurations.
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        links: LinkArgs,
    },

    /// Positions of all joints for the given joint angles (degrees).
    Forward {
        #[arg(allow_hyphen_values = true)]
        t1: f64,

        #[arg(allow_hyphen_values = true)]
        t2: f64,

        #[arg(allow_hyphen_values = true)]
        t3: f64,

        #[command(flatten)]
        links: LinkArgs,
    },

    /// Solve the tip target and write the SVG diagram.
    Diagram {
        #[command(flatten)]
        pose: PoseArgs,

        #[arg(short, long, default_value = "arm.svg")]
        output: PathBuf,

        #[command(flatten)]
        links: LinkArgs,
    },

    /// Print the map of reachable tip positions.
    Reach {
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        psi: f64,

        #[arg(long, value_enum, default_value_t = ElbowConfiguration::Down)]
        elbow: ElbowConfiguration,

        /// Grid spacing, in link length units.
        #[arg(long, default_value_t = 2.0)]
        step: f64,

        #[command(flatten)]
        links: LinkArgs,
    },

    /// Pulse width and duty cycle for a servo angle.
    Servo {
        #[arg(allow_hyphen_values = true)]
        angle: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        min: f64,

        #[arg(long, default_value_t = 180.0, allow_hyphen_values = true)]
        max: f64,
    },

    /// Replay operator keys on the simulated arm, e.g. `manual w w c Right`. A key
    /// prefixed with '-' is released instead of pressed (`-Right`).
    Manual {
        #[arg(allow_hyphen_values = true, required = true)]
        keys: Vec<String>,

        /// YAML file with the servo and motor layout.
        #[arg(long)]
        arm: Option<PathBuf>,
    },
}

impl LinkArgs {
    fn kinematics(&self) -> Result<PlanarKinematics> {
        if let Some(path) = &self.links {
            let (links, constraints) = load_links_and_constraints(path)
                .with_context(|| format!("Failed to read link lengths from {}", path.display()))?;
            info!("Link lengths:\n{}", links.to_yaml());
            return Ok(match constraints {
                Some(constraints) => PlanarKinematics::new_with_constraints(links, constraints)?,
                None => PlanarKinematics::new(links)?,
            });
        }
        let bench = LinkLengths::bench_arm();
        let links = LinkLengths::new(
            self.l1.unwrap_or(bench.l1),
            self.l2.unwrap_or(bench.l2),
            self.l3.unwrap_or(bench.l3),
        )?;
        Ok(PlanarKinematics::new(links)?)
    }
}

impl PoseArgs {
    fn target(&self) -> TargetPose {
        TargetPose::new(self.x, self.y, self.psi)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false if the request was valid but could not be satisfied (unreachable target).
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Solve { pose, all, links } => {
            let robot = links.kinematics()?;
            let target = pose.target();
            if all {
                let solutions = robot.inverse_all(&target);
                dump_solutions(&solutions);
                return Ok(!solutions.is_empty());
            }
            match robot.inverse(&target, pose.elbow) {
                Ok(solution) => {
                    dump_solution(&solution);
                    let tip = robot.forward_tip(&solution.joints);
                    println!(
                        "  tip: ({:.4}, {:.4}) direction {:.2}",
                        tip.x,
                        tip.y,
                        tip_direction(&solution.joints)
                    );
                    Ok(true)
                }
                Err(e) => {
                    error!("{}", e);
                    Ok(false)
                }
            }
        }

        Commands::Forward { t1, t2, t3, links } => {
            let robot = links.kinematics()?;
            dump_positions(&robot.forward(&[t1, t2, t3]));
            Ok(true)
        }

        Commands::Diagram { pose, output, links } => {
            let robot = links.kinematics()?;
            let Some(svg) = plot_diagram(robot.links(), &pose.target(), pose.elbow) else {
                return Ok(false);
            };
            std::fs::write(&output, svg)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Diagram written to {}", output.display());
            Ok(true)
        }

        Commands::Reach { psi, elbow, step, links } => {
            let robot = links.kinematics()?;
            let reach = robot.links().max_reach() + robot.links().l3;
            let map = ReachMap::compute(&robot, Grid::around_base(reach, step), psi, elbow)?;
            print!("{}", map.to_ascii());
            println!(
                "psi {} elbow {}: {:.1}% of {} cells reachable",
                psi,
                elbow,
                100.0 * map.fraction_reachable(),
                map.reachable.len()
            );
            Ok(true)
        }

        Commands::Servo { angle, min, max } => {
            let range = ServoRange::new(min, max)?;
            let profile = PulseProfile::default();
            println!(
                "angle {:.2} -> pulse {:.1} us, duty cycle {}",
                range.clamp(angle),
                pulse_width_us(angle, &range, &profile),
                angle_to_duty_cycle(angle, &range, &profile)
            );
            Ok(true)
        }

        Commands::Manual { keys, arm } => {
            let config = match arm {
                Some(path) => ArmConfig::from_yaml_file(&path)
                    .with_context(|| format!("Failed to read arm layout from {}", path.display()))?,
                None => ArmConfig::bench_arm(),
            };
            let mut state = ArmState::new(&config)?;
            let mut driver = SimulatedDriver::default();
            state.home(&mut driver)?;

            for key in keys {
                let (released, name) = match key.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, key.as_str()),
                };
                let Some(command) = ManualCommand::from_key(name) else {
                    bail!("Unknown key '{}'", name);
                };
                let actuations = if released {
                    state.release(&mut driver, command)?
                } else {
                    info!("{}", command.description());
                    state.press(&mut driver, command)?
                };
                for actuation in actuations {
                    println!("{:?}", actuation);
                }
            }
            println!("{} outputs written", driver.writes);
            Ok(true)
        }
    }
}
