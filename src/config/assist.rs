//! Pedal assist level tables.
//!
//! The firmware stores the levels as `assist_levels[2][10]`: one row for the
//! standard operation mode and one for sport, ten levels each. Levels are
//! emitted with their own indexed names (`ASSIST_LEVEL_SPORT_3_FLAGS`), see
//! [`crate::generate`].

use crate::header::{record_constants, record_fields};

use super::validation::{FromRecord, Record, Validator};

/// Number of levels the firmware table holds per level type.
pub const MAX_ASSIST_LEVELS: usize = 10;

/// Flags used when a level does not set any.
pub const DEFAULT_ASSIST_FLAGS: &str = "ASSIST_FLAG_PAS | ASSIST_FLAG_THROTTLE";

/// One step of the assistance curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedalAssistLevel {
    /// Firmware bit-flag expression, copied verbatim into the header.
    pub flags: String,
    /// Cadence limit as a share of the motor's maximum.
    pub max_cadence_percent: u8,
    /// Speed limit as a share of the global maximum.
    pub max_speed_percent: u8,
    /// Throttle current limit as a share of the maximum current.
    pub max_throttle_current_percent: u8,
    /// Pedal assist target current as a share of the maximum current.
    pub target_current_percent: u8,
}

record_constants!(PedalAssistLevel {
    flags,
    max_cadence_percent,
    max_speed_percent,
    max_throttle_current_percent,
    target_current_percent,
});

impl FromRecord for PedalAssistLevel {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let flags = v.text(r, "flags", DEFAULT_ASSIST_FLAGS);
        let max_cadence_percent = v.percent(r, "max_cadence_percent", 0);
        let max_speed_percent = v.percent(r, "max_speed_percent", 0);
        let max_throttle_current_percent = v.percent(r, "max_throttle_current_percent", 0);
        let target_current_percent = v.percent(r, "target_current_percent", 0);

        Some(Self {
            flags: flags?,
            max_cadence_percent: max_cadence_percent?,
            max_speed_percent: max_speed_percent?,
            max_throttle_current_percent: max_throttle_current_percent?,
            target_current_percent: target_current_percent?,
        })
    }
}

/// Ordered levels of one operation mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedalAssistLevelType {
    /// Levels in document order, at least one.
    pub levels: heapless::Vec<PedalAssistLevel, MAX_ASSIST_LEVELS>,
}

record_fields!(PedalAssistLevelType { levels });

impl FromRecord for PedalAssistLevelType {
    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let levels = v.sequence(r, "levels")?;
        Some(Self { levels })
    }
}

/// Standard and sport level tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedalAssistLevels {
    /// Levels of the default operation mode.
    pub standard: PedalAssistLevelType,
    /// Levels of the sport operation mode.
    pub sport: PedalAssistLevelType,
}

record_fields!(PedalAssistLevels { standard, sport });

impl FromRecord for PedalAssistLevels {
    const CLOSED: bool = true;

    fn from_record(r: &Record<'_>, v: &mut Validator<'_>) -> Option<Self> {
        let standard = v.record(r, "standard");
        let sport = v.record(r, "sport");
        Some(Self {
            standard: standard?,
            sport: sport?,
        })
    }
}

impl PedalAssistLevels {
    /// Level types in emission order, with their names.
    pub fn types(&self) -> [(&'static str, &PedalAssistLevelType); 2] {
        [("standard", &self.standard), ("sport", &self.sport)]
    }

    /// Total number of levels across both types.
    pub fn level_count(&self) -> usize {
        self.standard.levels.len() + self.sport.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::UnitRegistry;
    use crate::error::SchemaErrorKind;

    fn read(yaml: &str) -> (Option<PedalAssistLevels>, Vec<(String, SchemaErrorKind)>) {
        let units = UnitRegistry::new();
        let mut v = Validator::new(&units);
        let map: serde_yaml::Mapping = serde_yaml::from_str(yaml).unwrap();
        let levels = PedalAssistLevels::from_record(&Record::new("pedal_assist_levels", &map), &mut v);
        let errors = v.errors().iter().map(|e| (e.path.clone(), e.kind.clone())).collect();
        (levels, errors)
    }

    #[test]
    fn test_level_defaults() {
        let (levels, errors) = read(
            r#"
standard:
  levels:
    - target_current_percent: 30
sport:
  levels:
    - {}
"#,
        );
        assert!(errors.is_empty(), "{:?}", errors);
        let levels = levels.unwrap();
        let level = &levels.standard.levels[0];
        assert_eq!(level.flags, DEFAULT_ASSIST_FLAGS);
        assert_eq!(level.target_current_percent, 30);
        assert_eq!(level.max_cadence_percent, 0);
        assert_eq!(levels.level_count(), 2);
    }

    #[test]
    fn test_empty_levels_rejected() {
        let (levels, errors) = read("standard:\n  levels: []\nsport:\n  levels: [{}]\n");
        assert!(levels.is_none());
        assert_eq!(
            errors,
            vec![(
                "pedal_assist_levels.standard.levels".to_string(),
                SchemaErrorKind::EmptySequence
            )]
        );
    }

    #[test]
    fn test_too_many_levels_rejected() {
        let eleven = vec!["{}"; MAX_ASSIST_LEVELS + 1].join(", ");
        let yaml = format!("standard:\n  levels: [{}]\nsport:\n  levels: [{{}}]\n", eleven);
        let (levels, errors) = read(&yaml);
        assert!(levels.is_none());
        assert_eq!(
            errors[0].1,
            SchemaErrorKind::TooManyItems {
                max: MAX_ASSIST_LEVELS,
                found: MAX_ASSIST_LEVELS + 1
            }
        );
    }

    #[test]
    fn test_level_errors_carry_index() {
        let (_, errors) = read(
            "standard:\n  levels:\n    - {}\n    - max_speed_percent: 101\nsport:\n  levels: [{}]\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "pedal_assist_levels.standard.levels[1].max_speed_percent");
    }

    #[test]
    fn test_missing_group_reported() {
        let (levels, errors) = read("standard:\n  levels: [{}]\n");
        assert!(levels.is_none());
        assert_eq!(errors[0].0, "pedal_assist_levels.sport");
        assert_eq!(errors[0].1, SchemaErrorKind::Missing);
    }
}
