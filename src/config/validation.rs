//! Configuration validation.
//!
//! Walks the generic YAML document and builds the typed configuration,
//! recording every violation instead of stopping at the first one. Each
//! record type implements [`FromRecord`]; the [`Validator`] hands out typed
//! field values, or `None` after recording why the field was rejected.
//!
//! Record readers fetch every field first and only then combine them with
//! `?`, so one bad field never hides the errors of its siblings.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::{SchemaError, SchemaErrorKind, SchemaErrors};

use super::units::{TargetUnit, UnitRegistry};

/// Lower bound shared by every percentage field.
pub const PERCENT_MIN: i64 = 0;
/// Upper bound shared by every percentage field.
pub const PERCENT_MAX: i64 = 100;

/// Declared field names of a record, in traversal order.
pub trait Fields {
    /// Field names, in declaration order.
    const FIELDS: &'static [&'static str];
}

/// A record that can be read out of a YAML mapping.
pub trait FromRecord: Fields + Sized {
    /// Whether undeclared keys are errors (closed group sets) rather than
    /// ignored with a warning.
    const CLOSED: bool = false;

    /// Read every field of the record, recording violations in `v`.
    fn from_record(record: &Record<'_>, v: &mut Validator<'_>) -> Option<Self>;
}

/// Enumerated string field.
pub trait ConfigEnum: DeserializeOwned + Copy {
    /// Accepted literals.
    const VARIANTS: &'static [&'static str];

    /// The literal spelling of this variant.
    fn literal(self) -> &'static str;
}

/// Declare a [`ConfigEnum`] from one `Variant => "literal"` table.
///
/// The table drives the serde rename, [`ConfigEnum::VARIANTS`] and
/// [`ConfigEnum::literal`], so the spellings cannot drift apart.
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $literal:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $crate::config::validation::ConfigEnum for $name {
            const VARIANTS: &'static [&'static str] = &[$($literal),+];

            fn literal(self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }
        }
    };
}

pub(crate) use config_enum;

/// A YAML mapping positioned at a dotted path in the document.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    path: &'a str,
    map: &'a Mapping,
}

impl<'a> Record<'a> {
    /// Wrap `map`, located at `path`.
    pub fn new(path: &'a str, map: &'a Mapping) -> Self {
        Self { path, map }
    }

    /// Dotted path of this record (empty at the root).
    pub fn path(&self) -> &str {
        self.path
    }

    /// Dotted path of a field of this record.
    pub fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Raw value of `key`. `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }
}

/// YAML type name used in wrong-type messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Collects schema violations while the typed configuration is built.
#[derive(Debug)]
pub struct Validator<'u> {
    units: &'u UnitRegistry,
    errors: SchemaErrors,
}

impl<'u> Validator<'u> {
    /// Create a validator converting quantities with `units`.
    pub fn new(units: &'u UnitRegistry) -> Self {
        Self {
            units,
            errors: SchemaErrors::new(),
        }
    }

    /// Record a violation at `path`.
    pub fn report(&mut self, path: impl Into<String>, kind: SchemaErrorKind) {
        self.errors.push(SchemaError::new(path, kind));
    }

    /// Violations recorded so far.
    pub fn errors(&self) -> &SchemaErrors {
        &self.errors
    }

    /// Validate a whole document as a `T` rooted at the document root.
    ///
    /// Fails fast with a single error when the root is not a mapping.
    pub fn validate_document<T: FromRecord>(mut self, document: &Value) -> Result<T, SchemaErrors> {
        let Some(map) = document.as_mapping() else {
            self.report("", SchemaErrorKind::NotARecord);
            return Err(self.errors);
        };

        let root = Record::new("", map);
        let value = self.read_record::<T>(&root);
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }

    fn read_record<T: FromRecord>(&mut self, record: &Record<'_>) -> Option<T> {
        self.check_keys::<T>(record);
        T::from_record(record, self)
    }

    fn check_keys<T: FromRecord>(&mut self, record: &Record<'_>) {
        for key in record.map.keys() {
            let Some(name) = key.as_str() else {
                self.report(
                    record.path(),
                    SchemaErrorKind::WrongType {
                        expected: "string key",
                        found: value_kind(key),
                    },
                );
                continue;
            };
            if T::FIELDS.contains(&name) {
                continue;
            }

            let path = record.child_path(name);
            if T::CLOSED {
                self.report(path, SchemaErrorKind::UnknownGroup);
            } else {
                warn!(field = %path, "ignoring unknown configuration field");
            }
        }
    }

    fn require<'a>(&mut self, record: &Record<'a>, key: &str) -> Option<&'a Value> {
        let value = record.get(key);
        if value.is_none() {
            self.report(record.child_path(key), SchemaErrorKind::Missing);
        }
        value
    }

    fn wrong_type(&mut self, path: String, expected: &'static str, value: &Value) {
        self.report(
            path,
            SchemaErrorKind::WrongType {
                expected,
                found: value_kind(value),
            },
        );
    }

    /// Required nested record.
    pub fn record<T: FromRecord>(&mut self, record: &Record<'_>, key: &str) -> Option<T> {
        let value = self.require(record, key)?;
        let path = record.child_path(key);
        let Some(map) = value.as_mapping() else {
            self.wrong_type(path, "mapping", value);
            return None;
        };
        self.read_record::<T>(&Record::new(&path, map))
    }

    /// Required non-empty sequence of records, at most `N` long.
    pub fn sequence<T: FromRecord, const N: usize>(
        &mut self,
        record: &Record<'_>,
        key: &str,
    ) -> Option<heapless::Vec<T, N>> {
        let value = self.require(record, key)?;
        let path = record.child_path(key);
        let Some(items) = value.as_sequence() else {
            self.wrong_type(path, "sequence", value);
            return None;
        };

        if items.is_empty() {
            self.report(path, SchemaErrorKind::EmptySequence);
            return None;
        }
        if items.len() > N {
            self.report(
                path.clone(),
                SchemaErrorKind::TooManyItems {
                    max: N,
                    found: items.len(),
                },
            );
        }

        let mut out = heapless::Vec::new();
        let mut complete = items.len() <= N;
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            let Some(map) = item.as_mapping() else {
                self.wrong_type(item_path, "mapping", item);
                complete = false;
                continue;
            };
            match self.read_record::<T>(&Record::new(&item_path, map)) {
                Some(parsed) => {
                    // Overflow was already reported; keep validating the rest.
                    let _ = out.push(parsed);
                }
                None => complete = false,
            }
        }

        complete.then_some(out)
    }

    /// Integer in `[min, max]`, `default` when absent.
    pub fn integer(
        &mut self,
        record: &Record<'_>,
        key: &str,
        default: i64,
        min: i64,
        max: Option<i64>,
    ) -> Option<i64> {
        let Some(value) = record.get(key) else {
            return Some(default);
        };
        let path = record.child_path(key);
        let n = match (value.as_i64(), value.as_u64()) {
            (Some(n), _) => i128::from(n),
            // Only integers past i64::MAX land here.
            (None, Some(n)) => i128::from(n),
            (None, None) => {
                self.wrong_type(path, "integer", value);
                return None;
            }
        };

        let above = max.map_or(false, |max| n > i128::from(max));
        if n < i128::from(min) || above {
            self.report(path, SchemaErrorKind::OutOfBounds { value: n, min, max });
            return None;
        }
        i64::try_from(n).ok()
    }

    /// Percentage in `[0, 100]`, `default` when absent.
    pub fn percent(&mut self, record: &Record<'_>, key: &str, default: u8) -> Option<u8> {
        self.integer(record, key, default.into(), PERCENT_MIN, Some(PERCENT_MAX))
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Non-negative count, `default` when absent.
    pub fn count(&mut self, record: &Record<'_>, key: &str, default: u32) -> Option<u32> {
        self.integer(record, key, default.into(), 0, Some(u32::MAX.into()))
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Boolean, `default` when absent.
    pub fn flag(&mut self, record: &Record<'_>, key: &str, default: bool) -> Option<bool> {
        let Some(value) = record.get(key) else {
            return Some(default);
        };
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.wrong_type(record.child_path(key), "boolean", value);
                None
            }
        }
    }

    /// Free text, `default` when absent.
    pub fn text(&mut self, record: &Record<'_>, key: &str, default: &str) -> Option<String> {
        let Some(value) = record.get(key) else {
            return Some(default.to_string());
        };
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.wrong_type(record.child_path(key), "string", value);
                None
            }
        }
    }

    /// Required enumerated string.
    pub fn required_choice<E: ConfigEnum>(&mut self, record: &Record<'_>, key: &str) -> Option<E> {
        let value = self.require(record, key)?;
        self.parse_choice(record.child_path(key), value)
    }

    /// Enumerated string, `default` when absent.
    pub fn choice<E: ConfigEnum>(&mut self, record: &Record<'_>, key: &str, default: E) -> Option<E> {
        match record.get(key) {
            Some(value) => self.parse_choice(record.child_path(key), value),
            None => Some(default),
        }
    }

    fn parse_choice<E: ConfigEnum>(&mut self, path: String, value: &Value) -> Option<E> {
        let Some(literal) = value.as_str() else {
            self.wrong_type(path, "string", value);
            return None;
        };
        match serde_yaml::from_value::<E>(value.clone()) {
            Ok(choice) => Some(choice),
            Err(_) => {
                self.report(
                    path,
                    SchemaErrorKind::InvalidVariant {
                        value: literal.to_string(),
                        allowed: E::VARIANTS,
                    },
                );
                None
            }
        }
    }

    /// Required quantity, normalized into `U`.
    pub fn required_quantity<U: TargetUnit>(&mut self, record: &Record<'_>, key: &str) -> Option<U> {
        let value = self.require(record, key)?;
        self.parse_quantity(record.child_path(key), value)
    }

    /// Quantity normalized into `U`, parsed from `default` when absent.
    pub fn quantity<U: TargetUnit>(
        &mut self,
        record: &Record<'_>,
        key: &str,
        default: &str,
    ) -> Option<U> {
        let path = record.child_path(key);
        match record.get(key) {
            Some(value) => self.parse_quantity(path, value),
            None => self.normalize(path, default),
        }
    }

    fn parse_quantity<U: TargetUnit>(&mut self, path: String, value: &Value) -> Option<U> {
        match value {
            Value::String(text) => self.normalize(path, text),
            // Bare numbers carry no unit; let the parser say so.
            Value::Number(n) => self.normalize(path, &n.to_string()),
            other => {
                self.wrong_type(path, "quantity string", other);
                None
            }
        }
    }

    fn normalize<U: TargetUnit>(&mut self, path: String, text: &str) -> Option<U> {
        match self.units.normalize_to::<U>(text) {
            Ok(quantity) => Some(quantity),
            Err(e) => {
                self.report(path, e.into());
                None
            }
        }
    }
}
