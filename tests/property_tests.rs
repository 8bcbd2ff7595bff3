//! Property tests for unit normalization and constant generation.

use std::collections::HashSet;
use std::fmt::Write;

use proptest::prelude::*;

use bbsxtra_programmer::config::units::UnitRegistry;
use bbsxtra_programmer::config::parse_config;
use bbsxtra_programmer::{generate_constants, render_header, Error};

/// Number of scalar leaves outside the assist level tables.
const NON_ASSIST_LEAVES: usize = 29;

const TARGET_UNITS: [&str; 7] = ["V", "A", "km/h", "degC", "s", "ms", "mm"];

#[derive(Debug, Clone)]
struct Level {
    flags: &'static str,
    percents: [u8; 4],
}

fn level_strategy() -> impl Strategy<Value = Level> {
    (
        prop_oneof![
            Just("0"),
            Just("ASSIST_FLAG_PAS"),
            Just("ASSIST_FLAG_PAS | ASSIST_FLAG_THROTTLE"),
            Just("ASSIST_FLAG_PAS | ASSIST_FLAG_CRUISE | ASSIST_FLAG_OVERRIDE_CADENCE"),
        ],
        prop::array::uniform4(0u8..=100),
    )
        .prop_map(|(flags, percents)| Level { flags, percents })
}

fn levels_yaml(levels: &[Level]) -> String {
    let mut out = String::new();
    for level in levels {
        let [cadence, speed, throttle, target] = level.percents;
        let _ = write!(
            out,
            "      - flags: \"{}\"\n        max_cadence_percent: {}\n        max_speed_percent: {}\n        max_throttle_current_percent: {}\n        target_current_percent: {}\n",
            level.flags, cadence, speed, throttle, target
        );
    }
    out
}

fn config_yaml(standard: &[Level], sport: &[Level], empty_percent: i64) -> String {
    format!(
        r#"motor_type: BBS02_500W
max_current: 18A
global_max_speed: 32km/h
wheel_circumference: 2100mm
battery:
  nominal_voltage: 36V
  minimum_voltage: 30V
  soc_offset_percent:
    empty: {empty_percent}
speed_sensor: {{}}
shift_sensor: {{}}
temperature_sensor:
  use_sensor: controller
walk_mode: {{}}
pretension: {{}}
lights:
  mode: always_on
pedal_assist_levels:
  standard:
    levels:
{standard}  sport:
    levels:
{sport}"#,
        empty_percent = empty_percent,
        standard = levels_yaml(standard),
        sport = levels_yaml(sport),
    )
}

proptest! {
    #[test]
    fn conversion_into_own_unit_is_identity(
        magnitude in -1.0e6f64..1.0e6,
        unit in prop::sample::select(TARGET_UNITS.to_vec()),
        spaced in any::<bool>(),
    ) {
        let units = UnitRegistry::new();
        let text = if spaced {
            format!("{} {}", magnitude, unit)
        } else {
            format!("{}{}", magnitude, unit)
        };
        prop_assert_eq!(units.normalize(&text, unit).unwrap(), magnitude);
    }

    #[test]
    fn one_unique_constant_per_leaf(
        standard in prop::collection::vec(level_strategy(), 1..=10),
        sport in prop::collection::vec(level_strategy(), 1..=10),
    ) {
        let units = UnitRegistry::new();
        let config = parse_config(&config_yaml(&standard, &sport, 8), &units).unwrap();
        let constants = generate_constants(&config).unwrap();

        prop_assert_eq!(
            constants.len(),
            5 * (standard.len() + sport.len()) + NON_ASSIST_LEAVES
        );
        let names: HashSet<&str> = constants.as_slice().iter().map(|c| c.name.as_str()).collect();
        prop_assert_eq!(names.len(), constants.len());

        let last = standard.len() - 1;
        let name = format!("ASSIST_LEVEL_STANDARD_{}_MAX_SPEED_PERCENT", last);
        prop_assert!(constants.contains(&name));
    }

    #[test]
    fn rendering_is_deterministic(
        standard in prop::collection::vec(level_strategy(), 1..=4),
        sport in prop::collection::vec(level_strategy(), 1..=4),
    ) {
        let units = UnitRegistry::new();
        let yaml = config_yaml(&standard, &sport, 8);

        let first = render_header(generate_constants(&parse_config(&yaml, &units).unwrap()).unwrap().as_slice());
        let second = render_header(generate_constants(&parse_config(&yaml, &units).unwrap()).unwrap().as_slice());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_percent_is_rejected(
        empty in prop_oneof![-1000i64..0, 101i64..1000],
        standard in prop::collection::vec(level_strategy(), 1..=2),
    ) {
        let units = UnitRegistry::new();
        let result = parse_config(&config_yaml(&standard, &standard, empty), &units);
        match result {
            Err(Error::Schema(errors)) => {
                prop_assert!(errors.contains_path("battery.soc_offset_percent.empty"));
            }
            other => prop_assert!(false, "expected schema errors, got {:?}", other),
        }
    }
}
