//! Unit types for physical quantities.
//!
//! Quantity fields are written as strings such as `"36V"`, `"4km/h"` or
//! `"85 degC"`. A [`UnitRegistry`] parses them and converts the magnitude
//! into the unit the firmware expects for that field. The registry is an
//! ordinary value: build it once per run and pass it to every parse.
//!
//! Validated configuration fields hold typed newtypes ([`Volts`],
//! [`KilometersPerHour`], ...) carrying only the normalized magnitude, so a
//! voltage can never end up in a speed field.

use std::collections::HashMap;
use std::fmt;

use crate::error::QuantityError;

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Dimension {
    /// Electric potential
    Voltage,
    /// Electric current
    Current,
    /// Linear speed
    Speed,
    /// Temperature
    Temperature,
    /// Duration
    Time,
    /// Distance
    Length,
}

/// Affine mapping of a unit onto its dimension's base unit:
/// `base = magnitude * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UnitDef {
    dimension: Dimension,
    scale: f64,
    offset: f64,
}

impl UnitDef {
    const fn linear(dimension: Dimension, scale: f64) -> Self {
        Self {
            dimension,
            scale,
            offset: 0.0,
        }
    }

    const fn affine(dimension: Dimension, scale: f64, offset: f64) -> Self {
        Self {
            dimension,
            scale,
            offset,
        }
    }
}

const KELVIN_AT_ZERO_CELSIUS: f64 = 273.15;

/// Built-in unit table. Base units: V, A, m/s, K, s, m.
fn builtin_units() -> Vec<(&'static str, UnitDef)> {
    use Dimension::*;

    let volt = UnitDef::linear(Voltage, 1.0);
    let millivolt = UnitDef::linear(Voltage, 1e-3);
    let kilovolt = UnitDef::linear(Voltage, 1e3);
    let ampere = UnitDef::linear(Current, 1.0);
    let milliampere = UnitDef::linear(Current, 1e-3);
    let kph = UnitDef::linear(Speed, 1000.0 / 3600.0);
    let mps = UnitDef::linear(Speed, 1.0);
    let mph = UnitDef::linear(Speed, 0.44704);
    let celsius = UnitDef::affine(Temperature, 1.0, KELVIN_AT_ZERO_CELSIUS);
    let fahrenheit =
        UnitDef::affine(Temperature, 5.0 / 9.0, KELVIN_AT_ZERO_CELSIUS - 32.0 * 5.0 / 9.0);
    let kelvin = UnitDef::linear(Temperature, 1.0);
    let second = UnitDef::linear(Time, 1.0);
    let millisecond = UnitDef::linear(Time, 1e-3);
    let minute = UnitDef::linear(Time, 60.0);
    let hour = UnitDef::linear(Time, 3600.0);
    let millimeter = UnitDef::linear(Length, 1e-3);
    let centimeter = UnitDef::linear(Length, 1e-2);
    let meter = UnitDef::linear(Length, 1.0);
    let inch = UnitDef::linear(Length, 0.0254);

    vec![
        ("V", volt),
        ("volt", volt),
        ("volts", volt),
        ("mV", millivolt),
        ("millivolt", millivolt),
        ("kV", kilovolt),
        ("kilovolt", kilovolt),
        ("A", ampere),
        ("amp", ampere),
        ("ampere", ampere),
        ("amperes", ampere),
        ("mA", milliampere),
        ("milliampere", milliampere),
        ("km/h", kph),
        ("kph", kph),
        ("kmh", kph),
        ("kilometer_per_hour", kph),
        ("m/s", mps),
        ("mph", mph),
        ("mile_per_hour", mph),
        ("degC", celsius),
        ("°C", celsius),
        ("celsius", celsius),
        ("degree_Celsius", celsius),
        ("degF", fahrenheit),
        ("°F", fahrenheit),
        ("fahrenheit", fahrenheit),
        ("degree_Fahrenheit", fahrenheit),
        ("K", kelvin),
        ("kelvin", kelvin),
        ("s", second),
        ("sec", second),
        ("second", second),
        ("seconds", second),
        ("ms", millisecond),
        ("millisecond", millisecond),
        ("milliseconds", millisecond),
        ("min", minute),
        ("minute", minute),
        ("h", hour),
        ("hour", hour),
        ("mm", millimeter),
        ("millimeter", millimeter),
        ("cm", centimeter),
        ("centimeter", centimeter),
        ("m", meter),
        ("meter", meter),
        ("in", inch),
        ("inch", inch),
    ]
}

/// A parsed `(magnitude, unit)` pair, not yet converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// Numeric magnitude as written.
    pub magnitude: f64,
    /// Unit symbol as written.
    pub unit: String,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Unit lookup and conversion context.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<&'static str, UnitDef>,
}

impl UnitRegistry {
    /// Create a registry holding the built-in unit table.
    pub fn new() -> Self {
        Self {
            units: builtin_units().into_iter().collect(),
        }
    }

    /// Whether `symbol` names a known unit.
    pub fn knows(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol)
    }

    /// Split `<number><optional whitespace><unit>` into a [`Quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Parse`] when the number or the unit is
    /// missing, or the unit is not in the registry.
    pub fn parse(&self, text: &str) -> Result<Quantity, QuantityError> {
        let trimmed = text.trim();
        let split = number_prefix_len(trimmed);
        if split == 0 {
            return Err(parse_error(text, "missing numeric magnitude"));
        }

        let (number, unit) = trimmed.split_at(split);
        let magnitude: f64 = number
            .parse()
            .map_err(|_| parse_error(text, "malformed numeric magnitude"))?;
        if !magnitude.is_finite() {
            return Err(parse_error(text, "magnitude out of range"));
        }
        let unit = unit.trim();
        if unit.is_empty() {
            return Err(parse_error(text, "missing unit"));
        }
        if !self.knows(unit) {
            return Err(parse_error(text, &format!("unknown unit '{}'", unit)));
        }

        Ok(Quantity {
            magnitude,
            unit: unit.to_string(),
        })
    }

    /// Convert a quantity into `target` units and return the magnitude.
    ///
    /// Temperatures convert through their offsets, so `"32 degF"` becomes
    /// `0` in `degC`.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Conversion`] when the dimensions differ and
    /// [`QuantityError::Parse`] when either unit is unknown or the result
    /// does not fit an `f64`.
    pub fn convert(&self, quantity: &Quantity, target: &str) -> Result<f64, QuantityError> {
        let from = self
            .units
            .get(quantity.unit.as_str())
            .ok_or_else(|| parse_error(&quantity.unit, "unknown unit"))?;
        let to = self
            .units
            .get(target)
            .ok_or_else(|| parse_error(target, "unknown target unit"))?;

        if from.dimension != to.dimension {
            return Err(QuantityError::Conversion {
                from: quantity.unit.clone(),
                to: target.to_string(),
            });
        }
        let magnitude = if from == to {
            quantity.magnitude
        } else if from.offset == 0.0 && to.offset == 0.0 {
            quantity.magnitude * (from.scale / to.scale)
        } else {
            let base = quantity.magnitude * from.scale + from.offset;
            (base - to.offset) / to.scale
        };

        if !magnitude.is_finite() {
            return Err(parse_error(
                &quantity.to_string(),
                &format!("out of range once converted to {}", target),
            ));
        }
        Ok(magnitude)
    }

    /// Parse `text` and convert it into `target` units.
    pub fn normalize(&self, text: &str, target: &str) -> Result<f64, QuantityError> {
        let quantity = self.parse(text)?;
        self.convert(&quantity, target)
    }

    /// Parse `text` straight into a typed target unit.
    pub fn normalize_to<U: TargetUnit>(&self, text: &str) -> Result<U, QuantityError> {
        self.normalize(text, U::UNIT).map(U::from_magnitude)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(input: &str, reason: &str) -> QuantityError {
    QuantityError::Parse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Length of the leading `[+-]digits[.digits][(e|E)[+-]digits]` run.
///
/// An exponent marker only counts when digits follow it, so `"5e"` stops
/// before the `e` and `"2 m"` is not mistaken for an exponent.
fn number_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    let mut has_digits = int_end > i;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return 0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}

/// A magnitude already expressed in one fixed unit.
pub trait TargetUnit: Copy {
    /// Registry symbol of the unit.
    const UNIT: &'static str;

    /// Wrap a magnitude expressed in [`Self::UNIT`].
    fn from_magnitude(magnitude: f64) -> Self;

    /// The magnitude in [`Self::UNIT`].
    fn magnitude(self) -> f64;
}

macro_rules! target_unit {
    ($(#[$meta:meta])* $name:ident => $unit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new value.
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw value.
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl TargetUnit for $name {
            const UNIT: &'static str = $unit;

            #[inline]
            fn from_magnitude(magnitude: f64) -> Self {
                Self(magnitude)
            }

            #[inline]
            fn magnitude(self) -> f64 {
                self.0
            }
        }
    };
}

target_unit!(
    /// Electric potential in volts.
    Volts => "V"
);
target_unit!(
    /// Electric current in amperes.
    Amperes => "A"
);
target_unit!(
    /// Speed in kilometers per hour.
    KilometersPerHour => "km/h"
);
target_unit!(
    /// Temperature in degrees Celsius.
    Celsius => "degC"
);
target_unit!(
    /// Duration in seconds.
    Seconds => "s"
);
target_unit!(
    /// Duration in milliseconds.
    Milliseconds => "ms"
);
target_unit!(
    /// Length in millimeters.
    Millimeters => "mm"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_and_spaced() {
        let units = UnitRegistry::new();

        let q = units.parse("36V").unwrap();
        assert_eq!(q.magnitude, 36.0);
        assert_eq!(q.unit, "V");

        let q = units.parse("85 degC").unwrap();
        assert_eq!(q.magnitude, 85.0);
        assert_eq!(q.unit, "degC");

        let q = units.parse("-2.5e1 mm").unwrap();
        assert_eq!(q.magnitude, -25.0);
    }

    #[test]
    fn test_identity_conversions() {
        let units = UnitRegistry::new();
        assert_eq!(units.normalize("36V", "V").unwrap(), 36.0);
        assert_eq!(units.normalize("0 degC", "degC").unwrap(), 0.0);
        assert_eq!(units.normalize("4km/h", "km/h").unwrap(), 4.0);
        assert_eq!(units.normalize("600ms", "ms").unwrap(), 600.0);
        assert_eq!(units.normalize("17 kph", "km/h").unwrap(), 17.0);
    }

    #[test]
    fn test_scaled_conversions() {
        let units = UnitRegistry::new();
        assert!((units.normalize("1.5s", "ms").unwrap() - 1500.0).abs() < 1e-9);
        assert!((units.normalize("2.2 m", "mm").unwrap() - 2200.0).abs() < 1e-9);
        assert!((units.normalize("500mA", "A").unwrap() - 0.5).abs() < 1e-12);
        assert!((units.normalize("10 m/s", "km/h").unwrap() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_conversion_uses_single_factor() {
        let units = UnitRegistry::new();
        assert_eq!(units.normalize("2.28m", "mm").unwrap(), 2280.0);
        assert_eq!(units.normalize("2.23 m", "mm").unwrap(), 2230.0);
        assert_eq!(units.normalize("1.5s", "ms").unwrap(), 1500.0);
    }

    #[test]
    fn test_non_finite_magnitudes_rejected() {
        let units = UnitRegistry::new();
        assert!(matches!(units.parse("1e999A"), Err(QuantityError::Parse { .. })));
        assert!(matches!(units.parse("-1e999 V"), Err(QuantityError::Parse { .. })));

        let err = units.normalize("1e308 kV", "V").unwrap_err();
        assert!(matches!(err, QuantityError::Parse { .. }));
    }

    #[test]
    fn test_temperature_is_affine() {
        let units = UnitRegistry::new();
        assert!(units.normalize("32 degF", "degC").unwrap().abs() < 1e-9);
        assert!((units.normalize("212 degF", "degC").unwrap() - 100.0).abs() < 1e-9);
        assert!((units.normalize("273.15 K", "degC").unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_parse_errors() {
        let units = UnitRegistry::new();
        assert!(matches!(units.parse("V"), Err(QuantityError::Parse { .. })));
        assert!(matches!(units.parse("36"), Err(QuantityError::Parse { .. })));
        assert!(matches!(units.parse("36 furlongs"), Err(QuantityError::Parse { .. })));
        assert!(matches!(units.parse(""), Err(QuantityError::Parse { .. })));
        assert!(matches!(units.parse("."), Err(QuantityError::Parse { .. })));
    }

    #[test]
    fn test_incompatible_dimensions() {
        let units = UnitRegistry::new();
        let err = units.normalize("36V", "km/h").unwrap_err();
        assert_eq!(
            err,
            QuantityError::Conversion {
                from: "V".into(),
                to: "km/h".into()
            }
        );
    }

    #[test]
    fn test_typed_target() {
        let units = UnitRegistry::new();
        let v: Volts = units.normalize_to("48V").unwrap();
        assert_eq!(v.value(), 48.0);
        assert_eq!(Millimeters::UNIT, "mm");
    }
}
