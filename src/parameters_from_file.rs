//! Supports extracting link lengths and the arm hardware layout from YAML files (optional)

use std::path::Path;
use serde::Deserialize;

use crate::arm_state::{ArmConfig, MotorSpec, ServoSpec};
use crate::constraints::Constraints;
use crate::motor::MotorPins;
use crate::parameter_error::ParameterError;
use crate::parameters::LinkLengths;
use crate::servo::{PulseProfile, ServoRange};

#[derive(Deserialize)]
struct Links {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

#[derive(Deserialize)]
struct LinksRoot {
    pub links: Links,
    /// Optional [from, to] pair per joint, degrees
    #[serde(default)]
    pub constraints: Option<Vec<[f64; 2]>>,
}

#[derive(Deserialize)]
struct Pulse {
    pub min_us: f64,
    pub max_us: f64,
    pub frequency_hz: f64,
}

#[derive(Deserialize)]
struct ServoEntry {
    pub channel: u8,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub home: Option<f64>,
}

#[derive(Deserialize)]
struct MotorEntry {
    pub forward: u8,
    pub reverse: u8,
    pub pwm: u8,
    pub speed: f64,
}

#[derive(Deserialize)]
struct ArmRoot {
    #[serde(default)]
    pub pulse: Option<Pulse>,
    pub servos: Vec<ServoEntry>,
    #[serde(default)]
    pub base_motor: Option<MotorEntry>,
    #[serde(default)]
    pub extension_motor: Option<MotorEntry>,
}

fn parse<T: serde::de::DeserializeOwned>(contents: &str) -> Result<T, ParameterError> {
    serde_saphyr::from_str(contents).map_err(|e| ParameterError::ParseError(format!("{}", e)))
}

impl LinkLengths {
    /// Read the link lengths from YAML file. YAML file like this is supported:
    /// ```yaml
    /// links:
    ///   l1: 18.0
    ///   l2: 16.5
    ///   l3: 7.0
    /// ```
    /// The optional `constraints` section is ignored here, see [load_links_and_constraints].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let root: LinksRoot = parse(contents)?;
        links_from(&root.links)
    }
}

fn links_from(links: &Links) -> Result<LinkLengths, ParameterError> {
    Ok(LinkLengths::new(links.l1, links.l2, links.l3)?)
}

/// Reads link lengths and the optional joint limits:
/// ```yaml
/// links: { l1: 18.0, l2: 16.5, l3: 7.0 }
/// constraints:
///   - [-180, 180]
///   - [-150, 150]
///   - [-180, 180]
/// ```
pub fn load_links_and_constraints<P: AsRef<Path>>(
    path: P,
) -> Result<(LinkLengths, Option<Constraints>), ParameterError> {
    let contents = std::fs::read_to_string(path)?;
    links_and_constraints_from_str(&contents)
}

pub fn links_and_constraints_from_str(
    contents: &str,
) -> Result<(LinkLengths, Option<Constraints>), ParameterError> {
    let root: LinksRoot = parse(contents)?;
    let links = links_from(&root.links)?;
    let constraints = match root.constraints {
        None => None,
        Some(pairs) => {
            let pairs = vec_to_three(pairs, "constraints")?;
            for (i, [from, to]) in pairs.iter().enumerate() {
                if !from.is_finite() || !to.is_finite() {
                    return Err(ParameterError::InvalidRange(format!(
                        "constraints[{}] must be finite (got [{}, {}])", i, from, to
                    )));
                }
            }
            Some(Constraints::new(pairs.map(|p| p[0]), pairs.map(|p| p[1])))
        }
    };
    Ok((links, constraints))
}

impl ArmConfig {
    /// Read the servo and motor layout from YAML file:
    /// ```yaml
    /// pulse: { min_us: 1000, max_us: 2000, frequency_hz: 50 }
    /// servos:
    ///   - { channel: 2, min: 0, max: 120, home: 25 }
    ///   - { channel: 3, min: 0, max: 95 }
    /// base_motor: { forward: 13, reverse: 12, pwm: 14, speed: 0.5 }
    /// ```
    /// `pulse` and the motors are optional, the bench arm values are used when missing.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let root: ArmRoot = parse(contents)?;
        let defaults = ArmConfig::bench_arm();

        let pulse = match root.pulse {
            Some(p) => PulseProfile {
                min_us: p.min_us,
                max_us: p.max_us,
                frequency_hz: p.frequency_hz,
            },
            None => defaults.pulse,
        };
        pulse
            .validate()
            .map_err(|e| ParameterError::InvalidRange(e.to_string()))?;

        if root.servos.is_empty() {
            return Err(ParameterError::ParseError("at least one servo is required".into()));
        }
        let mut servos: Vec<ServoSpec> = Vec::with_capacity(root.servos.len());
        for entry in root.servos {
            if servos.iter().any(|s| s.channel == entry.channel) {
                return Err(ParameterError::InvalidRange(format!(
                    "servo channel {} is configured more than once", entry.channel
                )));
            }
            let range = ServoRange::new(entry.min, entry.max)
                .map_err(|e| ParameterError::InvalidRange(format!("servo {}: {}", entry.channel, e)))?;
            if let Some(home) = entry.home {
                if !range.contains(home) {
                    return Err(ParameterError::InvalidRange(format!(
                        "servo {}: home {} outside [{}, {}]", entry.channel, home, range.min, range.max
                    )));
                }
            }
            servos.push(ServoSpec {
                channel: entry.channel,
                range,
                home: entry.home,
            });
        }

        Ok(ArmConfig {
            pulse,
            servos,
            base_motor: motor_from(root.base_motor, defaults.base_motor, "base_motor")?,
            extension_motor: motor_from(root.extension_motor, defaults.extension_motor, "extension_motor")?,
        })
    }
}

fn motor_from(entry: Option<MotorEntry>, default: MotorSpec, label: &str) -> Result<MotorSpec, ParameterError> {
    let Some(m) = entry else {
        return Ok(default);
    };
    if !m.speed.is_finite() || !(0.0..=1.0).contains(&m.speed) {
        return Err(ParameterError::InvalidRange(format!(
            "{}: speed must be in [0, 1] (got {})", label, m.speed
        )));
    }
    Ok(MotorSpec {
        pins: MotorPins {
            forward: m.forward,
            reverse: m.reverse,
            pwm: m.pwm,
        },
        speed: m.speed,
    })
}

/// Convert a vector to a 3-element array, one entry per joint.
fn vec_to_three<T: Copy>(v: Vec<T>, label: &str) -> Result<[T; 3], ParameterError> {
    <[T; 3]>::try_from(v).map_err(|v: Vec<T>| {
        tracing::warn!(label, found = v.len(), "Expected one value per joint");
        ParameterError::InvalidLength { expected: 3, found: v.len() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_inline() {
        let links = LinkLengths::from_yaml_str("links: { l1: 18.0, l2: 16.5, l3: 7.0 }\n").unwrap();
        assert_eq!(links, LinkLengths { l1: 18.0, l2: 16.5, l3: 7.0 });
    }

    #[test]
    fn test_to_yaml_reads_back() {
        let links = LinkLengths::new(10.0, 8.25, 0.0).unwrap();
        assert_eq!(LinkLengths::from_yaml_str(&links.to_yaml()).unwrap(), links);
    }

    #[test]
    fn test_negative_link_rejected() {
        let err = LinkLengths::from_yaml_str("links: { l1: -1.0, l2: 5.0, l3: 1.0 }\n").unwrap_err();
        assert!(matches!(err, ParameterError::KinematicsConfigurationError(_)));
    }

    #[test]
    fn test_missing_link_is_parse_error() {
        let err = LinkLengths::from_yaml_str("links: { l1: 1.0, l2: 5.0 }\n").unwrap_err();
        assert!(matches!(err, ParameterError::ParseError(_)));
    }

    #[test]
    fn test_constraints_wrong_count() {
        let yaml = "links: { l1: 1, l2: 1, l3: 0 }\nconstraints:\n  - [0, 90]\n  - [0, 90]\n";
        let err = links_and_constraints_from_str(yaml).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidLength { expected: 3, found: 2 }));
    }

    #[test]
    fn test_arm_defaults() {
        let yaml = "servos:\n  - { channel: 2, min: 0, max: 120, home: 25 }\n";
        let config = ArmConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.pulse, PulseProfile::default());
        assert_eq!(config.servos.len(), 1);
        assert_eq!(config.base_motor, ArmConfig::bench_arm().base_motor);
    }

    #[test]
    fn test_arm_invalid_values() {
        for yaml in [
            "servos:\n  - { channel: 2, min: 10, max: 5 }\n",
            "servos:\n  - { channel: 2, min: 0, max: 5, home: 6 }\n",
            "servos:\n  - { channel: 2, min: 0, max: 5 }\n  - { channel: 2, min: 0, max: 9 }\n",
            "pulse: { min_us: 2000, max_us: 1000, frequency_hz: 50 }\nservos:\n  - { channel: 2, min: 0, max: 5 }\n",
            "servos:\n  - { channel: 2, min: 0, max: 5 }\nbase_motor: { forward: 1, reverse: 2, pwm: 3, speed: 2.0 }\n",
        ] {
            assert!(
                matches!(ArmConfig::from_yaml_str(yaml), Err(ParameterError::InvalidRange(_))),
                "Accepted invalid config:\n{}", yaml
            );
        }
    }
}
