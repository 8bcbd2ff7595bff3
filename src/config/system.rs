//! Firmware configuration - root configuration structure.

use crate::error::Result;
use crate::header::{record_fields, ConstantPath, ConstantSet, ToConstants};

use super::assist::PedalAssistLevels;
use super::battery::Battery;
use super::features::{Lights, Pretension, WalkMode};
use super::sensors::{ShiftSensor, SpeedSensor, TemperatureSensor};
use super::units::{Amperes, KilometersPerHour, Millimeters};
use super::validation::{config_enum, FromRecord, Record, Validator};

config_enum! {
    /// Motor/controller variant the firmware is built for.
    pub enum MotorType {
        /// Bafang BBSHD (1000 W)
        Bbshd => "BBSHD",
        /// Bafang BBS02, 750 W controller
        Bbs02At750W => "BBS02_750W",
        /// Bafang BBS02, 500 W controller
        Bbs02At500W => "BBS02_500W",
    }
}

/// Root configuration structure from YAML.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareConfig {
    /// Target motor variant.
    pub motor_type: MotorType,

    /// Maximum battery current.
    pub max_current: Amperes,

    /// Speed limit applied regardless of assist level.
    pub global_max_speed: KilometersPerHour,

    /// Wheel circumference used for speed computation.
    pub wheel_circumference: Millimeters,

    /// Battery voltage curve and low-voltage behavior.
    pub battery: Battery,

    /// Wheel speed sensor.
    pub speed_sensor: SpeedSensor,

    /// Gear shift sensor.
    pub shift_sensor: ShiftSensor,

    /// Thermal protection.
    pub temperature_sensor: TemperatureSensor,

    /// Push walk assistance.
    pub walk_mode: WalkMode,

    /// Chain pretension at low speed.
    pub pretension: Pretension,

    /// Light output.
    pub lights: Lights,

    /// Assist level tables, emitted separately from the generic walk.
    pub pedal_assist_levels: PedalAssistLevels,
}

record_fields!(FirmwareConfig {
    motor_type,
    max_current,
    global_max_speed,
    wheel_circumference,
    battery,
    speed_sensor,
    shift_sensor,
    temperature_sensor,
    walk_mode,
    pretension,
    lights,
    pedal_assist_levels,
});

impl FromRecord for FirmwareConfig {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let motor_type = v.required_choice(r, "motor_type");
        let max_current = v.required_quantity(r, "max_current");
        let global_max_speed = v.required_quantity(r, "global_max_speed");
        let wheel_circumference = v.required_quantity(r, "wheel_circumference");
        let battery = v.record(r, "battery");
        let speed_sensor = v.record(r, "speed_sensor");
        let shift_sensor = v.record(r, "shift_sensor");
        let temperature_sensor = v.record(r, "temperature_sensor");
        let walk_mode = v.record(r, "walk_mode");
        let pretension = v.record(r, "pretension");
        let lights = v.record(r, "lights");
        let pedal_assist_levels = v.record(r, "pedal_assist_levels");

        Some(Self {
            motor_type: motor_type?,
            max_current: max_current?,
            global_max_speed: global_max_speed?,
            wheel_circumference: wheel_circumference?,
            battery: battery?,
            speed_sensor: speed_sensor?,
            shift_sensor: shift_sensor?,
            temperature_sensor: temperature_sensor?,
            walk_mode: walk_mode?,
            pretension: pretension?,
            lights: lights?,
            pedal_assist_levels: pedal_assist_levels?,
        })
    }
}

// Generic walk: every field except `pedal_assist_levels`, which gets its own
// indexed naming scheme.
impl ToConstants for FirmwareConfig {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        self.motor_type.to_constants(&path.key("motor_type"), out)?;
        self.max_current.to_constants(&path.key("max_current"), out)?;
        self.global_max_speed
            .to_constants(&path.key("global_max_speed"), out)?;
        self.wheel_circumference
            .to_constants(&path.key("wheel_circumference"), out)?;
        self.battery.to_constants(&path.key("battery"), out)?;
        self.speed_sensor.to_constants(&path.key("speed_sensor"), out)?;
        self.shift_sensor.to_constants(&path.key("shift_sensor"), out)?;
        self.temperature_sensor
            .to_constants(&path.key("temperature_sensor"), out)?;
        self.walk_mode.to_constants(&path.key("walk_mode"), out)?;
        self.pretension.to_constants(&path.key("pretension"), out)?;
        self.lights.to_constants(&path.key("lights"), out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::ConfigEnum;

    #[test]
    fn test_motor_type_literals_round_trip() {
        for literal in MotorType::VARIANTS {
            let value = serde_yaml::Value::String((*literal).to_string());
            let motor: MotorType = serde_yaml::from_value(value).unwrap();
            assert_eq!(motor.literal(), *literal);
        }
    }

    #[test]
    fn test_motor_type_rejects_lowercase() {
        let value = serde_yaml::Value::String("bbshd".to_string());
        assert!(serde_yaml::from_value::<MotorType>(value).is_err());
    }
}
