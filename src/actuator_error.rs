//! Errors of the servo and motor layer

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActuatorError {
    #[error("Invalid angle range [{min}, {max}], max must be above min")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid pulse profile: {0}")]
    InvalidPulse(String),

    #[error("Angle must be finite (got {0})")]
    NonFiniteAngle(f64),

    #[error("No servo configured on channel {0}")]
    UnknownChannel(u8),

    #[error("Channel {0} is configured more than once")]
    DuplicateChannel(u8),

    #[error("Home angle {home} of channel {channel} is outside its range")]
    HomeOutOfRange { channel: u8, home: f64 },

    #[error("Driver error on channel {channel}: {message}")]
    Driver { channel: u8, message: String },
}
