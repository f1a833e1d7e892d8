//! Driver that only records and logs outputs, for running the manual control without
//! hardware attached.

use std::collections::BTreeMap;
use tracing::info;
use crate::actuator_error::ActuatorError;
use crate::motor::{MotorDriver, MotorPins};
use crate::servo::ServoDriver;

#[derive(Debug, Default, Clone)]
pub struct SimulatedDriver {
    duty_cycles: BTreeMap<u8, u16>,

    /// (forward, reverse, pwm) by PWM pin
    motor_outputs: BTreeMap<u8, (bool, bool, u16)>,

    /// Number of outputs written so far
    pub writes: usize,
}

impl SimulatedDriver {
    /// Last duty cycle set on the servo channel.
    pub fn duty_cycle(&self, channel: u8) -> Option<u16> {
        self.duty_cycles.get(&channel).copied()
    }

    /// Last (forward, reverse, pwm) outputs of the motor with the given PWM pin.
    pub fn motor_outputs(&self, pwm_pin: u8) -> Option<(bool, bool, u16)> {
        self.motor_outputs.get(&pwm_pin).copied()
    }
}

impl ServoDriver for SimulatedDriver {
    fn set_duty_cycle(&mut self, channel: u8, duty_cycle: u16) -> Result<(), ActuatorError> {
        info!(channel, duty_cycle, "Servo channel set");
        self.duty_cycles.insert(channel, duty_cycle);
        self.writes += 1;
        Ok(())
    }
}

impl MotorDriver for SimulatedDriver {
    fn set_outputs(&mut self, pins: &MotorPins, forward: bool, reverse: bool, pwm: u16) -> Result<(), ActuatorError> {
        info!(forward_pin = pins.forward, reverse_pin = pins.reverse, forward, reverse, pwm, "Motor outputs set");
        self.motor_outputs.insert(pins.pwm, (forward, reverse, pwm));
        self.writes += 1;
        Ok(())
    }
}
