//! # H-bridge DC motor layer
//!
//! A DC motor is driven by two direction inputs of an H-bridge and a PWM enable input
//! for the speed. Pin access goes through the [`MotorDriver`] trait.

use tracing::debug;
use crate::actuator_error::ActuatorError;

/// Full scale of the 12 bit motor PWM.
pub const MOTOR_PWM_RESOLUTION: u16 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotorDirection {
    Forward,
    Reverse,
    #[default]
    Stop,
}

impl MotorDirection {
    /// Levels of the (forward, reverse) H-bridge inputs.
    pub fn pin_levels(self) -> (bool, bool) {
        match self {
            MotorDirection::Forward => (true, false),
            MotorDirection::Reverse => (false, true),
            MotorDirection::Stop => (false, false),
        }
    }
}

/// Trait to provide a unified API for H-bridge pin outputs.
pub trait MotorDriver {
    /// Sets the forward and reverse inputs and the PWM value of the enable pin.
    fn set_outputs(&mut self, pins: &MotorPins, forward: bool, reverse: bool, pwm: u16) -> Result<(), ActuatorError>;
}

/// GPIO pins of one H-bridge channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPins {
    pub forward: u8,
    pub reverse: u8,
    pub pwm: u8,
}

/// PWM value for a proportion of the full speed, clamped to 0..1.
pub fn speed_to_pwm(speed: f64) -> u16 {
    if !speed.is_finite() {
        return 0;
    }
    (speed.clamp(0.0, 1.0) * MOTOR_PWM_RESOLUTION as f64) as u16
}

#[derive(Debug, Clone)]
pub struct HBridgeMotor {
    pub pins: MotorPins,

    /// Proportion of the full speed used when moving
    pub speed: f64,
    direction: MotorDirection,
}

impl HBridgeMotor {
    pub fn new(pins: MotorPins, speed: f64) -> Self {
        HBridgeMotor {
            pins,
            speed,
            direction: MotorDirection::Stop,
        }
    }

    pub fn direction(&self) -> MotorDirection {
        self.direction
    }

    /// Starts moving in the given direction until stopped. Returns the PWM value set.
    pub fn drive(&mut self, driver: &mut impl MotorDriver, direction: MotorDirection) -> Result<u16, ActuatorError> {
        let (forward, reverse) = direction.pin_levels();
        let pwm = match direction {
            MotorDirection::Stop => 0,
            _ => speed_to_pwm(self.speed),
        };
        driver.set_outputs(&self.pins, forward, reverse, pwm)?;
        debug!(pwm_pin = self.pins.pwm, ?direction, pwm, "Motor output set");
        self.direction = direction;
        Ok(pwm)
    }

    pub fn stop(&mut self, driver: &mut impl MotorDriver) -> Result<u16, ActuatorError> {
        self.drive(driver, MotorDirection::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedDriver;

    #[test]
    fn test_pin_levels() {
        assert_eq!(MotorDirection::Forward.pin_levels(), (true, false));
        assert_eq!(MotorDirection::Reverse.pin_levels(), (false, true));
        assert_eq!(MotorDirection::Stop.pin_levels(), (false, false));
    }

    #[test]
    fn test_speed_to_pwm() {
        assert_eq!(speed_to_pwm(0.0), 0);
        assert_eq!(speed_to_pwm(0.5), 2048);
        assert_eq!(speed_to_pwm(1.0), 4096);
        assert_eq!(speed_to_pwm(3.0), 4096);
        assert_eq!(speed_to_pwm(-1.0), 0);
        assert_eq!(speed_to_pwm(f64::NAN), 0);
    }

    #[test]
    fn test_drive_and_stop() {
        let mut driver = SimulatedDriver::default();
        let pins = MotorPins { forward: 13, reverse: 12, pwm: 14 };
        let mut motor = HBridgeMotor::new(pins, 0.5);

        assert_eq!(motor.drive(&mut driver, MotorDirection::Reverse).unwrap(), 2048);
        assert_eq!(motor.direction(), MotorDirection::Reverse);
        assert_eq!(driver.motor_outputs(14), Some((false, true, 2048)));

        assert_eq!(motor.stop(&mut driver).unwrap(), 0);
        assert_eq!(motor.direction(), MotorDirection::Stop);
        assert_eq!(driver.motor_outputs(14), Some((false, false, 0)));
    }
}
