//! Configuration loading from files.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info};

use crate::error::{Error, Result, SchemaErrors};

use super::units::UnitRegistry;
use super::validation::Validator;
use super::FirmwareConfig;

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or fails
/// validation. Validation failures carry every violation found.
///
/// # Example
///
/// ```rust,ignore
/// use bbsxtra_programmer::{load_config, UnitRegistry};
///
/// let units = UnitRegistry::new();
/// let config = load_config("bbshd.yaml", &units)?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P, units: &UnitRegistry) -> Result<FirmwareConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "configuration read");

    let config = parse_config(&content, units)?;
    info!(path = %path.display(), "configuration validated");
    Ok(config)
}

/// Parse configuration from a YAML string.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or fails validation.
pub fn parse_config(content: &str, units: &UnitRegistry) -> Result<FirmwareConfig> {
    let document: Value = serde_yaml::from_str(content)?;
    validate_document(&document, units).map_err(Error::Schema)
}

/// Validate an already parsed YAML document.
pub fn validate_document(
    document: &Value,
    units: &UnitRegistry,
) -> core::result::Result<FirmwareConfig, SchemaErrors> {
    Validator::new(units).validate_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaErrorKind;

    const MINIMAL: &str = r#"
motor_type: BBSHD
max_current: 30A
global_max_speed: 25km/h
wheel_circumference: 2230mm
battery:
  nominal_voltage: 48V
  soc_offset_percent: {}
speed_sensor: {}
shift_sensor: {}
temperature_sensor:
  use_sensor: motor
walk_mode: {}
pretension: {}
lights:
  mode: default
pedal_assist_levels:
  standard:
    levels:
      - target_current_percent: 10
  sport:
    levels:
      - target_current_percent: 20
"#;

    #[test]
    fn test_parse_minimal_config() {
        let units = UnitRegistry::new();
        let config = parse_config(MINIMAL, &units).unwrap();
        assert_eq!(config.max_current.value(), 30.0);
        assert_eq!(config.battery.minimum_voltage.value(), 36.0);
        assert_eq!(config.battery.soc_offset_percent.empty, 8);
        assert_eq!(config.shift_sensor.interrupt_duration.value(), 600.0);
        assert_eq!(config.battery.no_load_delay.value(), 2.0);
        assert!(config.speed_sensor.enabled);
        assert!(!config.pretension.enabled);
    }

    #[test]
    fn test_root_must_be_mapping() {
        let units = UnitRegistry::new();
        let errors = match parse_config("- just\n- a list\n", &units) {
            Err(Error::Schema(errors)) => errors,
            other => panic!("expected schema errors, got {:?}", other),
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().kind, SchemaErrorKind::NotARecord);
    }

    #[test]
    fn test_yaml_syntax_error() {
        let units = UnitRegistry::new();
        let err = parse_config("motor_type: [BBSHD\n", &units).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let units = UnitRegistry::new();
        let err = load_config("/nonexistent/bbsxtra.yaml", &units).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
