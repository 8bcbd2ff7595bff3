//! Configuration module for bbsxtra-programmer.
//!
//! Provides the typed firmware configuration, its validation from a YAML
//! document, and normalization of unit-bearing fields.

mod assist;
mod battery;
mod features;
mod loader;
mod sensors;
mod system;
pub mod units;
pub mod validation;

pub use assist::{
    PedalAssistLevel, PedalAssistLevelType, PedalAssistLevels, DEFAULT_ASSIST_FLAGS,
    MAX_ASSIST_LEVELS,
};
pub use battery::{Battery, SocMap, SocOffsetPercent};
pub use features::{Lights, LightsMode, Pretension, WalkMode};
pub use loader::{load_config, parse_config, validate_document};
pub use sensors::{ShiftSensor, SpeedSensor, TemperatureSensor, TemperatureSource};
pub use system::{FirmwareConfig, MotorType};

// Re-export unit types at config level
pub use units::{
    Amperes, Celsius, KilometersPerHour, Millimeters, Milliseconds, Seconds, UnitRegistry, Volts,
};
