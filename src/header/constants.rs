//! Symbolic constants and the typed tree walk that produces them.

use std::collections::HashSet;
use std::fmt;

use crate::config::units::{
    Amperes, Celsius, KilometersPerHour, Millimeters, Milliseconds, Seconds, TargetUnit, Volts,
};
use crate::config::validation::ConfigEnum;
use crate::config::{LightsMode, MotorType, SocMap, TemperatureSource};
use crate::error::{Error, Result};

use super::naming::ConstantPath;

/// Printable value of a configuration leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// Rendered as `true` / `false`.
    Bool(bool),
    /// Rendered in decimal.
    Integer(i64),
    /// Normalized quantity magnitude.
    Number(f64),
    /// Rendered verbatim (enum literals, flag expressions).
    Text(String),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(b) => write!(f, "{}", b),
            ConstantValue::Integer(n) => write!(f, "{}", n),
            // Whole magnitudes print as integer literals so `36V` stays `36`.
            ConstantValue::Number(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            ConstantValue::Number(x) => write!(f, "{}", x),
            ConstantValue::Text(s) => f.write_str(s),
        }
    }
}

/// A `#define` to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicConstant {
    /// Uppercase constant name.
    pub name: String,
    /// Constant value.
    pub value: ConstantValue,
}

/// Ordered constants with unique names.
#[derive(Debug, Clone, Default)]
pub struct ConstantSet {
    constants: Vec<SymbolicConstant>,
    names: HashSet<String>,
}

impl ConstantSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constant named after `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateConstant`] if the name is already taken.
    pub fn push(&mut self, path: &ConstantPath, value: ConstantValue) -> Result<()> {
        let name = path.name();
        if !self.names.insert(name.clone()) {
            return Err(Error::DuplicateConstant(name));
        }
        self.constants.push(SymbolicConstant { name, value });
        Ok(())
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Constants in emission order.
    pub fn as_slice(&self) -> &[SymbolicConstant] {
        &self.constants
    }

    /// Look up a constant by name.
    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    /// Whether a constant with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Walks a configuration node and appends one constant per scalar leaf.
pub trait ToConstants {
    /// Append the constants of this node, located at `path`.
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()>;
}

impl ToConstants for bool {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        out.push(path, ConstantValue::Bool(*self))
    }
}

impl ToConstants for u8 {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        out.push(path, ConstantValue::Integer((*self).into()))
    }
}

impl ToConstants for u32 {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        out.push(path, ConstantValue::Integer((*self).into()))
    }
}

impl ToConstants for String {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        out.push(path, ConstantValue::Text(self.clone()))
    }
}

// Sequences share the path of their field: members are not numbered.
impl<T: ToConstants> ToConstants for [T] {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        for item in self {
            item.to_constants(path, out)?;
        }
        Ok(())
    }
}

impl<T: ToConstants> ToConstants for Vec<T> {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        self.as_slice().to_constants(path, out)
    }
}

impl<T: ToConstants, const N: usize> ToConstants for heapless::Vec<T, N> {
    fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
        self.as_slice().to_constants(path, out)
    }
}

macro_rules! quantity_constants {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToConstants for $ty {
                fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
                    out.push(path, ConstantValue::Number(self.magnitude()))
                }
            }
        )+
    };
}

quantity_constants!(Volts, Amperes, KilometersPerHour, Celsius, Seconds, Milliseconds, Millimeters);

macro_rules! enum_constants {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToConstants for $ty {
                fn to_constants(&self, path: &ConstantPath, out: &mut ConstantSet) -> Result<()> {
                    out.push(path, ConstantValue::Text(self.literal().to_string()))
                }
            }
        )+
    };
}

enum_constants!(MotorType, SocMap, TemperatureSource, LightsMode);

/// Declares the field list of a record, in traversal order.
macro_rules! record_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::config::validation::Fields for $ty {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
        }
    };
}

/// Declares the field list of a record and walks those fields, in order,
/// when emitting constants.
macro_rules! record_constants {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        $crate::header::record_fields!($ty { $($field),+ });

        impl $crate::header::ToConstants for $ty {
            fn to_constants(
                &self,
                path: &$crate::header::ConstantPath,
                out: &mut $crate::header::ConstantSet,
            ) -> $crate::error::Result<()> {
                $(
                    $crate::header::ToConstants::to_constants(
                        &self.$field,
                        &path.key(stringify!($field)),
                        out,
                    )?;
                )+
                Ok(())
            }
        }
    };
}

pub(crate) use record_constants;
pub(crate) use record_fields;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rendering() {
        assert_eq!(ConstantValue::Bool(true).to_string(), "true");
        assert_eq!(ConstantValue::Integer(50).to_string(), "50");
        assert_eq!(ConstantValue::Number(36.0).to_string(), "36");
        assert_eq!(ConstantValue::Number(-5.0).to_string(), "-5");
        assert_eq!(ConstantValue::Number(0.5).to_string(), "0.5");
        assert_eq!(
            ConstantValue::Text("ASSIST_FLAG_PAS | ASSIST_FLAG_THROTTLE".into()).to_string(),
            "ASSIST_FLAG_PAS | ASSIST_FLAG_THROTTLE"
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut set = ConstantSet::new();
        let path = ConstantPath::root().key("lights").key("enabled");
        set.push(&path, ConstantValue::Bool(true)).unwrap();

        let err = set.push(&path, ConstantValue::Bool(false)).unwrap_err();
        assert!(matches!(err, Error::DuplicateConstant(name) if name == "LIGHTS_ENABLED"));
        assert_eq!(set.len(), 1);
    }

    struct Probe {
        id: u8,
    }

    record_constants!(Probe { id });

    #[test]
    fn test_unindexed_sequences_collide() {
        let probes = vec![Probe { id: 1 }, Probe { id: 2 }];
        let mut set = ConstantSet::new();
        let err = probes
            .to_constants(&ConstantPath::root().key("probes"), &mut set)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateConstant(name) if name == "PROBES_ID"));
    }

    #[test]
    fn test_single_member_sequence_uses_field_path() {
        let probes = vec![Probe { id: 7 }];
        let mut set = ConstantSet::new();
        probes
            .to_constants(&ConstantPath::root().key("probes"), &mut set)
            .unwrap();
        assert_eq!(set.get("PROBES_ID"), Some(&ConstantValue::Integer(7)));
    }
}
