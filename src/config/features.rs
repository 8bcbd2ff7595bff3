//! Rider-facing features: walk mode, pretension and lights.

use crate::header::record_constants;

use super::units::KilometersPerHour;
use super::validation::{config_enum, FromRecord, Record, Validator};

/// Push walk assistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkMode {
    /// Walk mode available.
    pub enabled: bool,
    /// Target walking speed.
    pub speed: KilometersPerHour,
}

record_constants!(WalkMode { enabled, speed });

impl FromRecord for WalkMode {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", true);
        let speed = v.quantity(r, "speed", "4km/h");
        Some(Self {
            enabled: enabled?,
            speed: speed?,
        })
    }
}

/// Keeps the chain tensioned below a cutoff speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pretension {
    /// Pretension active. Off unless requested.
    pub enabled: bool,
    /// Speed above which pretension is released.
    pub speed_cutoff: KilometersPerHour,
}

record_constants!(Pretension {
    enabled,
    speed_cutoff,
});

impl FromRecord for Pretension {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", false);
        let speed_cutoff = v.quantity(r, "speed_cutoff", "16km/h");
        Some(Self {
            enabled: enabled?,
            speed_cutoff: speed_cutoff?,
        })
    }
}

config_enum! {
    /// Light output behavior.
    pub enum LightsMode {
        /// Switched from the display.
        Default => "default",
        /// Always on while powered.
        AlwaysOn => "always_on",
        /// Used as a brake light.
        BrakeLight => "brake_light",
    }
}

/// Light output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lights {
    /// Light output available.
    pub enabled: bool,
    /// How the output is driven.
    pub mode: LightsMode,
}

record_constants!(Lights { enabled, mode });

impl FromRecord for Lights {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let enabled = v.flag(r, "enabled", true);
        let mode = v.required_choice(r, "mode");
        Some(Self {
            enabled: enabled?,
            mode: mode?,
        })
    }
}
