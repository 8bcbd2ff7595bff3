//! Sensor configuration: wheel speed, gear shift and temperature.

use crate::header::record_constants;

use super::units::{Celsius, Milliseconds};
use super::validation::{config_enum, FromRecord, Record, Validator};

/// Wheel speed sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSensor {
    /// Sensor installed and used for speed limiting.
    pub enabled: bool,
    /// Magnet pulses per wheel revolution.
    pub signals_per_revolution: u32,
}

record_constants!(SpeedSensor {
    enabled,
    signals_per_revolution,
});

impl FromRecord for SpeedSensor {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", true);
        let signals_per_revolution = v.count(r, "signals_per_revolution", 1);
        Some(Self {
            enabled: enabled?,
            signals_per_revolution: signals_per_revolution?,
        })
    }
}

/// Gear shift sensor, cuts power briefly while shifting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftSensor {
    /// Sensor installed.
    pub enabled: bool,
    /// How long power stays reduced after a shift.
    pub interrupt_duration: Milliseconds,
    /// Current allowed during the interruption.
    pub interrupt_current_percent: u8,
}

record_constants!(ShiftSensor {
    enabled,
    interrupt_duration,
    interrupt_current_percent,
});

impl FromRecord for ShiftSensor {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", true);
        let interrupt_duration = v.quantity(r, "interrupt_duration", "600ms");
        let interrupt_current_percent = v.percent(r, "interrupt_current_percent", 10);
        Some(Self {
            enabled: enabled?,
            interrupt_duration: interrupt_duration?,
            interrupt_current_percent: interrupt_current_percent?,
        })
    }
}

config_enum! {
    /// Which temperature sensor drives thermal limiting.
    pub enum TemperatureSource {
        /// Controller board sensor.
        Controller => "controller",
        /// Motor winding sensor (BBSHD only).
        Motor => "motor",
    }
}

/// Thermal protection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSensor {
    /// Thermal limiting active.
    pub enabled: bool,
    /// Sensor used for limiting.
    pub use_sensor: TemperatureSource,
    /// Temperature where power is cut to the low current level.
    pub max_temperature: Celsius,
    /// Distance below the maximum where ramp down begins.
    pub max_temperature_ramp_down_start: Celsius,
    /// Current allowed at maximum temperature.
    pub max_temperature_low_current_percent: u8,
}

record_constants!(TemperatureSensor {
    enabled,
    use_sensor,
    max_temperature,
    max_temperature_ramp_down_start,
    max_temperature_low_current_percent,
});

impl FromRecord for TemperatureSensor {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", true);
        let use_sensor = v.required_choice(r, "use_sensor");
        let max_temperature = v.quantity(r, "max_temperature", "85 degC");
        let max_temperature_ramp_down_start =
            v.quantity(r, "max_temperature_ramp_down_start", "5 degC");
        let max_temperature_low_current_percent =
            v.percent(r, "max_temperature_low_current_percent", 20);

        Some(Self {
            enabled: enabled?,
            use_sensor: use_sensor?,
            max_temperature: max_temperature?,
            max_temperature_ramp_down_start: max_temperature_ramp_down_start?,
            max_temperature_low_current_percent: max_temperature_low_current_percent?,
        })
    }
}
