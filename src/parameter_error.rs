//! Error handling for configuration file readers

use std::io;

/// Unified error to report failures while reading link lengths or arm configuration.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Invalid Length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Invalid Range: {0}")]
    InvalidRange(String),

    #[error("Kinematics Configuration Error: {0}")]
    KinematicsConfigurationError(#[from] crate::kinematics_error::KinematicsError),
}
