//! # Manual control state
//!
//! [`ArmState`] owns the current angle of every servo joint and the two H-bridge motors.
//! Operator key presses are mapped to [`ManualCommand`]s, each producing incremental
//! angle changes (clamped to the joint range) or motor direction changes, forwarded to
//! the driver.

use std::collections::BTreeMap;
use tracing::debug;
use crate::actuator_error::ActuatorError;
use crate::motor::{HBridgeMotor, MotorDirection, MotorDriver, MotorPins};
use crate::servo::{PulseProfile, Servo, ServoDriver, ServoRange};

/// Shoulder servo channel (arm up / down)
pub const SHOULDER_CHANNEL: u8 = 2;
/// Wrist flex servo channel
pub const WRIST_CHANNEL: u8 = 3;
/// Gripper rotation servo channel
pub const GRIPPER_ROTATION_CHANNEL: u8 = 4;
/// Gripper open / close servo channel
pub const GRIPPER_CHANNEL: u8 = 5;

const SHOULDER_STEP: f64 = 5.0;
const WRIST_STEP: f64 = 10.0;
const GRIPPER_ROTATION_STEP: f64 = 10.0;

/// Closed gripper is this many degrees below fully open.
const GRIPPER_CLOSE_TRAVEL: f64 = 45.0;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorId {
    /// Turns the whole arm
    Base,
    /// Extends the arm in and out
    Extension,
}

/// Operator command of the manual control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManualCommand {
    TurnRight,
    TurnLeft,
    ExtendOut,
    ExtendIn,
    ArmUp,
    ArmDown,
    WristUp,
    WristDown,
    RotateGripperLeft,
    RotateGripperRight,
    ToggleGripper,
    Home,
}

/// What happened to the hardware as result of a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Actuation {
    Servo { channel: u8, angle: f64, duty_cycle: u16 },
    Motor { motor: MotorId, direction: MotorDirection, pwm: u16 },
}

impl ManualCommand {
    /// Maps a key name to the command. Arrow keys drive the motors, letters the servos.
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            "Right" => ManualCommand::TurnRight,
            "Left" => ManualCommand::TurnLeft,
            "Up" => ManualCommand::ExtendOut,
            "Down" => ManualCommand::ExtendIn,
            "w" | "W" => ManualCommand::ArmUp,
            "s" | "S" => ManualCommand::ArmDown,
            "a" | "A" => ManualCommand::WristUp,
            "d" | "D" => ManualCommand::WristDown,
            "e" | "E" => ManualCommand::RotateGripperLeft,
            "r" | "R" => ManualCommand::RotateGripperRight,
            "c" | "C" => ManualCommand::ToggleGripper,
            "Escape" => ManualCommand::Home,
            _ => return None,
        };
        Some(command)
    }

    /// Help text shown to the operator.
    pub fn description(&self) -> &'static str {
        match self {
            ManualCommand::TurnRight => "Turn Arm RIGHT",
            ManualCommand::TurnLeft => "Turn Arm LEFT",
            ManualCommand::ExtendOut => "Extend Arm OUT",
            ManualCommand::ExtendIn => "Extend Arm IN",
            ManualCommand::ArmUp => "Extend Arm UP",
            ManualCommand::ArmDown => "Extend Arm DOWN",
            ManualCommand::WristUp => "Flex Wrist UP",
            ManualCommand::WristDown => "Flex Wrist DOWN",
            ManualCommand::RotateGripperLeft => "Rotate Gripper LEFT",
            ManualCommand::RotateGripperRight => "Rotate Gripper RIGHT",
            ManualCommand::ToggleGripper => "Toggle Gripper OPEN/CLOSE",
            ManualCommand::Home => "Move all servos HOME",
        }
    }

    /// Motor and direction for the commands that drive a motor while the key is held.
    fn motor(&self) -> Option<(MotorId, MotorDirection)> {
        match self {
            ManualCommand::TurnRight => Some((MotorId::Base, MotorDirection::Forward)),
            ManualCommand::TurnLeft => Some((MotorId::Base, MotorDirection::Reverse)),
            ManualCommand::ExtendOut => Some((MotorId::Extension, MotorDirection::Forward)),
            ManualCommand::ExtendIn => Some((MotorId::Extension, MotorDirection::Reverse)),
            _ => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// CONFIG
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ServoSpec {
    pub channel: u8,
    pub range: ServoRange,

    /// Angle taken on [`ManualCommand::Home`], defaults to the range minimum
    pub home: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotorSpec {
    pub pins: MotorPins,
    pub speed: f64,
}

/// Hardware layout of the arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmConfig {
    pub pulse: PulseProfile,
    pub servos: Vec<ServoSpec>,
    pub base_motor: MotorSpec,
    pub extension_motor: MotorSpec,
}

impl ArmConfig {
    /// Layout of the bench arm: 4 servos on the PCA9685 and 2 motors on GPIO.
    pub fn bench_arm() -> Self {
        let spec = |channel, min, max, home| ServoSpec {
            channel,
            range: ServoRange { min, max },
            home,
        };
        ArmConfig {
            pulse: PulseProfile::default(),
            servos: vec![
                spec(SHOULDER_CHANNEL, 0.0, 120.0, Some(25.0)),
                spec(WRIST_CHANNEL, 0.0, 95.0, None),
                spec(GRIPPER_ROTATION_CHANNEL, 0.0, 320.0, None),
                spec(GRIPPER_CHANNEL, 0.0, 60.0, None),
            ],
            base_motor: MotorSpec {
                pins: MotorPins { forward: 13, reverse: 12, pwm: 14 },
                speed: 0.5,
            },
            extension_motor: MotorSpec {
                pins: MotorPins { forward: 19, reverse: 16, pwm: 15 },
                speed: 1.0,
            },
        }
    }
}

// ------------------------------------------------------------------------------------------------
// STATE
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ServoJoint {
    servo: Servo,
    home: f64,
    angle: f64,
}

/// Current state of all actuators. Created from [`ArmConfig`], owned by the caller.
#[derive(Debug, Clone)]
pub struct ArmState {
    servos: BTreeMap<u8, ServoJoint>,
    base_motor: HBridgeMotor,
    extension_motor: HBridgeMotor,
}

impl ArmState {
    /// Builds the state with every servo at its range minimum. Nothing is sent to the
    /// hardware until [`ArmState::home`] or a command is issued.
    pub fn new(config: &ArmConfig) -> Result<Self, ActuatorError> {
        let mut servos = BTreeMap::new();
        for spec in &config.servos {
            let servo = Servo::new(spec.channel, spec.range, config.pulse)?;
            let home = spec.home.unwrap_or(servo.range.min);
            if !servo.range.contains(home) {
                return Err(ActuatorError::HomeOutOfRange { channel: spec.channel, home });
            }
            let joint = ServoJoint {
                home,
                angle: servo.range.min,
                servo,
            };
            if servos.insert(spec.channel, joint).is_some() {
                return Err(ActuatorError::DuplicateChannel(spec.channel));
            }
        }

        Ok(ArmState {
            servos,
            base_motor: HBridgeMotor::new(config.base_motor.pins, config.base_motor.speed),
            extension_motor: HBridgeMotor::new(config.extension_motor.pins, config.extension_motor.speed),
        })
    }

    /// Current angle of the servo on the channel.
    pub fn angle(&self, channel: u8) -> Option<f64> {
        self.servos.get(&channel).map(|joint| joint.angle)
    }

    pub fn motor_direction(&self, motor: MotorId) -> MotorDirection {
        match motor {
            MotorId::Base => self.base_motor.direction(),
            MotorId::Extension => self.extension_motor.direction(),
        }
    }

    /// Moves the servo to the angle, clamped to its range.
    pub fn set_angle<D: ServoDriver>(&mut self, driver: &mut D, channel: u8, angle: f64) -> Result<Actuation, ActuatorError> {
        let joint = self
            .servos
            .get_mut(&channel)
            .ok_or(ActuatorError::UnknownChannel(channel))?;
        let duty_cycle = joint.servo.move_angle(driver, angle)?;
        joint.angle = joint.servo.range.clamp(angle);
        debug!(channel, angle = joint.angle, "Servo joint moved");
        Ok(Actuation::Servo {
            channel,
            angle: joint.angle,
            duty_cycle,
        })
    }

    /// Changes the servo angle by the delta, clamped to its range.
    pub fn nudge<D: ServoDriver>(&mut self, driver: &mut D, channel: u8, delta: f64) -> Result<Actuation, ActuatorError> {
        let current = self.angle(channel).ok_or(ActuatorError::UnknownChannel(channel))?;
        self.set_angle(driver, channel, current + delta)
    }

    /// Moves every servo to its home angle and stops both motors.
    pub fn home<D: ServoDriver + MotorDriver>(&mut self, driver: &mut D) -> Result<Vec<Actuation>, ActuatorError> {
        let homes: Vec<(u8, f64)> = self.servos.iter().map(|(c, j)| (*c, j.home)).collect();
        let mut actuations = Vec::with_capacity(homes.len() + 2);
        for (channel, home) in homes {
            actuations.push(self.set_angle(driver, channel, home)?);
        }
        actuations.push(self.drive(driver, MotorId::Base, MotorDirection::Stop)?);
        actuations.push(self.drive(driver, MotorId::Extension, MotorDirection::Stop)?);
        Ok(actuations)
    }

    fn drive<D: MotorDriver>(&mut self, driver: &mut D, motor: MotorId, direction: MotorDirection) -> Result<Actuation, ActuatorError> {
        let pwm = match motor {
            MotorId::Base => self.base_motor.drive(driver, direction)?,
            MotorId::Extension => self.extension_motor.drive(driver, direction)?,
        };
        Ok(Actuation::Motor { motor, direction, pwm })
    }

    fn toggle_gripper<D: ServoDriver>(&mut self, driver: &mut D) -> Result<Actuation, ActuatorError> {
        let joint = self
            .servos
            .get(&GRIPPER_CHANNEL)
            .ok_or(ActuatorError::UnknownChannel(GRIPPER_CHANNEL))?;
        let open = joint.servo.range.max;
        let target = if joint.angle < open {
            open
        } else {
            open - GRIPPER_CLOSE_TRAVEL
        };
        self.set_angle(driver, GRIPPER_CHANNEL, target)
    }

    /// Handles the key press of a command.
    pub fn press<D: ServoDriver + MotorDriver>(&mut self, driver: &mut D, command: ManualCommand) -> Result<Vec<Actuation>, ActuatorError> {
        debug!(?command, "Key pressed");
        if let Some((motor, direction)) = command.motor() {
            return Ok(vec![self.drive(driver, motor, direction)?]);
        }
        let actuation = match command {
            ManualCommand::ArmUp => self.nudge(driver, SHOULDER_CHANNEL, SHOULDER_STEP)?,
            ManualCommand::ArmDown => self.nudge(driver, SHOULDER_CHANNEL, -SHOULDER_STEP)?,
            ManualCommand::WristUp => self.nudge(driver, WRIST_CHANNEL, -WRIST_STEP)?,
            ManualCommand::WristDown => self.nudge(driver, WRIST_CHANNEL, WRIST_STEP)?,
            ManualCommand::RotateGripperLeft => self.nudge(driver, GRIPPER_ROTATION_CHANNEL, -GRIPPER_ROTATION_STEP)?,
            ManualCommand::RotateGripperRight => self.nudge(driver, GRIPPER_ROTATION_CHANNEL, GRIPPER_ROTATION_STEP)?,
            ManualCommand::ToggleGripper => self.toggle_gripper(driver)?,
            ManualCommand::Home => return self.home(driver),
            // Motor commands are handled above
            _ => return Ok(Vec::new()),
        };
        Ok(vec![actuation])
    }

    /// Handles the key release of a command. Motors stop, servos keep their position.
    pub fn release<D: MotorDriver>(&mut self, driver: &mut D, command: ManualCommand) -> Result<Vec<Actuation>, ActuatorError> {
        match command.motor() {
            Some((motor, _)) => Ok(vec![self.drive(driver, motor, MotorDirection::Stop)?]),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedDriver;

    fn bench() -> (ArmState, SimulatedDriver) {
        (ArmState::new(&ArmConfig::bench_arm()).unwrap(), SimulatedDriver::default())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(ManualCommand::from_key("Right"), Some(ManualCommand::TurnRight));
        assert_eq!(ManualCommand::from_key("w"), Some(ManualCommand::ArmUp));
        assert_eq!(ManualCommand::from_key("Escape"), Some(ManualCommand::Home));
        assert_eq!(ManualCommand::from_key("q"), None);
    }

    #[test]
    fn test_initial_angles_at_minimum() {
        let (state, _) = bench();
        for channel in [SHOULDER_CHANNEL, WRIST_CHANNEL, GRIPPER_ROTATION_CHANNEL, GRIPPER_CHANNEL] {
            assert_eq!(state.angle(channel), Some(0.0));
        }
        assert_eq!(state.angle(0), None);
    }

    #[test]
    fn test_nudge_is_clamped() {
        let (mut state, mut driver) = bench();
        state.press(&mut driver, ManualCommand::ArmDown).unwrap();
        assert_eq!(state.angle(SHOULDER_CHANNEL), Some(0.0));

        for _ in 0..30 {
            state.press(&mut driver, ManualCommand::ArmUp).unwrap();
        }
        assert_eq!(state.angle(SHOULDER_CHANNEL), Some(120.0));
        assert_eq!(driver.duty_cycle(SHOULDER_CHANNEL), Some(6553));
    }

    #[test]
    fn test_wrist_and_rotation_steps() {
        let (mut state, mut driver) = bench();
        state.press(&mut driver, ManualCommand::WristDown).unwrap();
        state.press(&mut driver, ManualCommand::WristDown).unwrap();
        state.press(&mut driver, ManualCommand::WristUp).unwrap();
        assert_eq!(state.angle(WRIST_CHANNEL), Some(10.0));

        state.press(&mut driver, ManualCommand::RotateGripperRight).unwrap();
        assert_eq!(state.angle(GRIPPER_ROTATION_CHANNEL), Some(10.0));
        state.press(&mut driver, ManualCommand::RotateGripperLeft).unwrap();
        assert_eq!(state.angle(GRIPPER_ROTATION_CHANNEL), Some(0.0));
    }

    #[test]
    fn test_gripper_toggle() {
        let (mut state, mut driver) = bench();
        state.press(&mut driver, ManualCommand::ToggleGripper).unwrap();
        assert_eq!(state.angle(GRIPPER_CHANNEL), Some(60.0));
        state.press(&mut driver, ManualCommand::ToggleGripper).unwrap();
        assert_eq!(state.angle(GRIPPER_CHANNEL), Some(15.0));
        state.press(&mut driver, ManualCommand::ToggleGripper).unwrap();
        assert_eq!(state.angle(GRIPPER_CHANNEL), Some(60.0));
    }

    #[test]
    fn test_motor_runs_while_key_held() {
        let (mut state, mut driver) = bench();
        let actuations = state.press(&mut driver, ManualCommand::TurnLeft).unwrap();
        assert_eq!(
            actuations,
            vec![Actuation::Motor { motor: MotorId::Base, direction: MotorDirection::Reverse, pwm: 2048 }]
        );
        assert_eq!(state.motor_direction(MotorId::Base), MotorDirection::Reverse);
        assert_eq!(driver.motor_outputs(14), Some((false, true, 2048)));

        state.release(&mut driver, ManualCommand::TurnLeft).unwrap();
        assert_eq!(state.motor_direction(MotorId::Base), MotorDirection::Stop);
        assert_eq!(driver.motor_outputs(14), Some((false, false, 0)));
    }

    #[test]
    fn test_release_of_servo_key_does_nothing() {
        let (mut state, mut driver) = bench();
        state.press(&mut driver, ManualCommand::ArmUp).unwrap();
        let writes = driver.writes;
        assert!(state.release(&mut driver, ManualCommand::ArmUp).unwrap().is_empty());
        assert_eq!(driver.writes, writes);
        assert_eq!(state.angle(SHOULDER_CHANNEL), Some(5.0));
    }

    #[test]
    fn test_home() {
        let (mut state, mut driver) = bench();
        state.press(&mut driver, ManualCommand::ToggleGripper).unwrap();
        state.press(&mut driver, ManualCommand::ExtendOut).unwrap();

        let actuations = state.press(&mut driver, ManualCommand::Home).unwrap();
        assert_eq!(actuations.len(), 6);
        assert_eq!(state.angle(SHOULDER_CHANNEL), Some(25.0));
        assert_eq!(state.angle(GRIPPER_CHANNEL), Some(0.0));
        assert_eq!(state.motor_direction(MotorId::Extension), MotorDirection::Stop);
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let mut config = ArmConfig::bench_arm();
        config.servos.push(config.servos[0].clone());
        assert_eq!(
            ArmState::new(&config).unwrap_err(),
            ActuatorError::DuplicateChannel(SHOULDER_CHANNEL)
        );
    }

    #[test]
    fn test_home_outside_range_rejected() {
        let mut config = ArmConfig::bench_arm();
        config.servos[0].home = Some(130.0);
        assert_eq!(
            ArmState::new(&config).unwrap_err(),
            ActuatorError::HomeOutOfRange { channel: SHOULDER_CHANNEL, home: 130.0 }
        );
    }

    #[test]
    fn test_unknown_channel() {
        let (mut state, mut driver) = bench();
        assert_eq!(
            state.nudge(&mut driver, 9, 1.0).unwrap_err(),
            ActuatorError::UnknownChannel(9)
        );
    }
}
