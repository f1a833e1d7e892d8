//! # Servo layer
//!
//! Converts joint angles in degrees into servo pulse widths and 16 bit PWM duty cycles,
//! as used by PCA9685 style servo driver boards. The hardware itself is behind the
//! [`ServoDriver`] trait.

use tracing::debug;
use crate::actuator_error::ActuatorError;

/// Full scale of the 16 bit duty cycle register.
pub const DUTY_CYCLE_MAX: u16 = u16::MAX;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for accessing servo driver boards.
pub trait ServoDriver {
    /// Set the 16 bit duty cycle of a channel.
    fn set_duty_cycle(&mut self, channel: u8, duty_cycle: u16) -> Result<(), ActuatorError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Angle range the servo is allowed to move in, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoRange {
    pub min: f64,
    pub max: f64,
}

/// Pulse widths the servo maps to its min and max angle, and the PWM frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseProfile {
    pub min_us: f64,
    pub max_us: f64,
    pub frequency_hz: f64,
}

/// Positional servo on one channel of the driver board.
#[derive(Debug, Clone)]
pub struct Servo {
    pub channel: u8,
    pub range: ServoRange,
    pub profile: PulseProfile,
    last_angle: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ServoRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ActuatorError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(ActuatorError::InvalidRange { min, max });
        }
        Ok(ServoRange { min, max })
    }

    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min, self.max)
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }

    /// Position of the (clamped) angle within the range, 0 at min and 1 at max.
    pub fn proportion(&self, angle: f64) -> f64 {
        (self.clamp(angle) - self.min) / (self.max - self.min)
    }
}

impl Default for PulseProfile {
    /// 1 to 2 ms pulses at 50 Hz, suitable for most hobby servos.
    fn default() -> Self {
        PulseProfile {
            min_us: 1000.0,
            max_us: 2000.0,
            frequency_hz: 50.0,
        }
    }
}

impl PulseProfile {
    pub fn validate(&self) -> Result<(), ActuatorError> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ActuatorError::InvalidPulse(format!(
                "frequency must be positive (got {})", self.frequency_hz
            )));
        }
        if !(self.min_us.is_finite() && self.max_us.is_finite() && self.min_us > 0.0 && self.max_us > self.min_us) {
            return Err(ActuatorError::InvalidPulse(format!(
                "pulse widths must satisfy 0 < min < max (got {}, {})", self.min_us, self.max_us
            )));
        }
        if self.max_us > self.period_us() {
            return Err(ActuatorError::InvalidPulse(format!(
                "max pulse {} us does not fit into the period of {} us", self.max_us, self.period_us()
            )));
        }
        Ok(())
    }

    /// PWM period in microseconds.
    pub fn period_us(&self) -> f64 {
        1e6 / self.frequency_hz
    }

    /// Duty cycle for the given pulse width, truncated to the 16 bit register.
    pub fn duty_cycle(&self, pulse_us: f64) -> u16 {
        let duty = pulse_us / self.period_us() * DUTY_CYCLE_MAX as f64;
        duty.clamp(0.0, DUTY_CYCLE_MAX as f64) as u16
    }
}

/// Pulse width in microseconds for the angle. The angle is clamped to the range first.
pub fn pulse_width_us(angle: f64, range: &ServoRange, profile: &PulseProfile) -> f64 {
    profile.min_us + range.proportion(angle) * (profile.max_us - profile.min_us)
}

/// 16 bit duty cycle for the angle. The angle is clamped to the range first.
/// ```
/// use planar_arm_kinematics::servo::{angle_to_duty_cycle, PulseProfile, ServoRange};
/// let range = ServoRange::new(0.0, 95.0).unwrap();
/// // 2 ms pulse in the 20 ms period
/// assert_eq!(angle_to_duty_cycle(95.0, &range, &PulseProfile::default()), 6553);
/// ```
pub fn angle_to_duty_cycle(angle: f64, range: &ServoRange, profile: &PulseProfile) -> u16 {
    profile.duty_cycle(pulse_width_us(angle, range, profile))
}

impl Servo {
    pub fn new(channel: u8, range: ServoRange, profile: PulseProfile) -> Result<Self, ActuatorError> {
        profile.validate()?;
        // Range may have been built directly through its public fields
        let range = ServoRange::new(range.min, range.max)?;
        Ok(Servo {
            channel,
            range,
            profile,
            last_angle: None,
        })
    }

    /// Moves the servo to the given angle, clamped to its range. Returns the duty cycle sent.
    pub fn move_angle(&mut self, driver: &mut impl ServoDriver, angle: f64) -> Result<u16, ActuatorError> {
        if !angle.is_finite() {
            return Err(ActuatorError::NonFiniteAngle(angle));
        }
        let angle = self.range.clamp(angle);
        let duty_cycle = angle_to_duty_cycle(angle, &self.range, &self.profile);
        driver.set_duty_cycle(self.channel, duty_cycle)?;
        debug!(channel = self.channel, angle, duty_cycle, "Servo moved");
        self.last_angle = Some(angle);
        Ok(duty_cycle)
    }

    /// Moves the servo to the position that is the given proportion (0..1) through its
    /// range.
    pub fn move_proportion(&mut self, driver: &mut impl ServoDriver, proportion: f64) -> Result<u16, ActuatorError> {
        if !proportion.is_finite() {
            return Err(ActuatorError::NonFiniteAngle(proportion));
        }
        let proportion = proportion.clamp(0.0, 1.0);
        self.move_angle(driver, self.range.min + proportion * (self.range.max - self.range.min))
    }

    /// Last angle this servo was commanded to, `None` before the first move.
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }
}
