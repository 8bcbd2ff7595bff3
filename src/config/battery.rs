//! Battery configuration.

use crate::header::record_constants;

use super::units::{Seconds, Volts};
use super::validation::{config_enum, FromRecord, Record, Validator};

config_enum! {
    /// State-of-charge mapping applied before reporting to the display.
    #[derive(Default)]
    pub enum SocMap {
        /// Linear percentage.
        #[default]
        None => "none",
        /// Linearized for the 5-bar indicator of the SW102 display.
        Sw102 => "SW102",
    }
}

/// Voltage padding at both ends of the usable battery range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocOffsetPercent {
    /// Share of the range treated as 0% (0-100).
    pub empty: u8,
    /// Share of the range treated as 100% (0-100).
    pub full: u8,
}

record_constants!(SocOffsetPercent { empty, full });

impl FromRecord for SocOffsetPercent {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let empty = v.percent(r, "empty", 8);
        let full = v.percent(r, "full", 8);
        Some(Self {
            empty: empty?,
            full: full?,
        })
    }
}

/// Battery configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Nominal pack voltage.
    pub nominal_voltage: Volts,

    /// Low voltage cutoff.
    pub minimum_voltage: Volts,

    /// Correction added to the measured voltage.
    pub voltage_calibration_offset: Volts,

    /// Padding of the state-of-charge range.
    pub soc_offset_percent: SocOffsetPercent,

    /// Time without load before the voltage is considered settled.
    pub no_load_delay: Seconds,

    /// Battery percentage where current ramp down towards cutoff starts.
    pub low_voltage_ramp_down_percent: u8,

    /// Current allowed at the end of the ramp down.
    pub low_voltage_current_percent: u8,

    /// Display state-of-charge mapping.
    pub soc_map: SocMap,
}

record_constants!(Battery {
    nominal_voltage,
    minimum_voltage,
    voltage_calibration_offset,
    soc_offset_percent,
    no_load_delay,
    low_voltage_ramp_down_percent,
    low_voltage_current_percent,
    soc_map,
});

impl FromRecord for Battery {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let nominal_voltage = v.required_quantity(r, "nominal_voltage");
        let minimum_voltage = v.quantity(r, "minimum_voltage", "36V");
        let voltage_calibration_offset = v.quantity(r, "voltage_calibration_offset", "0V");
        let soc_offset_percent = v.record(r, "soc_offset_percent");
        let no_load_delay = v.quantity(r, "no_load_delay", "2s");
        let low_voltage_ramp_down_percent = v.percent(r, "low_voltage_ramp_down_percent", 10);
        let low_voltage_current_percent = v.percent(r, "low_voltage_current_percent", 20);
        let soc_map = v.choice(r, "soc_map", SocMap::default());

        Some(Self {
            nominal_voltage: nominal_voltage?,
            minimum_voltage: minimum_voltage?,
            voltage_calibration_offset: voltage_calibration_offset?,
            soc_offset_percent: soc_offset_percent?,
            no_load_delay: no_load_delay?,
            low_voltage_ramp_down_percent: low_voltage_ramp_down_percent?,
            low_voltage_current_percent: low_voltage_current_percent?,
            soc_map: soc_map?,
        })
    }
}
