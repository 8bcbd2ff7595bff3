//! Error types for bbsxtra-programmer.
//!
//! Provides unified error handling across configuration loading, schema
//! validation, quantity normalization, and header generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all programmer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more schema violations, collected in a single batch
    #[error("Configuration error: {0}")]
    Schema(SchemaErrors),
    /// The input is not a syntactically valid YAML document
    #[error("YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Reading the configuration or writing the header failed
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },
    /// Two configuration leaves mapped onto the same constant name
    #[error("Duplicate constant name: '{0}'")]
    DuplicateConstant(String),
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Quantity parsing and conversion errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    /// The text has no `<number><unit>` form, or names an unknown unit
    #[error("cannot parse quantity '{input}': {reason}")]
    Parse {
        /// Offending text
        input: String,
        /// What was wrong with it
        reason: String,
    },
    /// The unit belongs to a different physical dimension than the target
    #[error("cannot convert '{from}' to '{to}': incompatible dimensions")]
    Conversion {
        /// Source unit symbol
        from: String,
        /// Target unit symbol
        to: String,
    },
}

/// A single schema violation, located by its dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Dotted path of the offending field (`battery.soc_offset_percent.empty`)
    pub path: String,
    /// What went wrong
    pub kind: SchemaErrorKind,
}

/// Schema violation categories.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaErrorKind {
    /// Required field is absent
    Missing,
    /// Value has the wrong YAML type
    WrongType {
        /// Expected type description
        expected: &'static str,
        /// Actual YAML type found
        found: &'static str,
    },
    /// Integer outside its declared bounds
    OutOfBounds {
        /// Offending value, widened so unsigned YAML integers fit
        value: i128,
        /// Inclusive minimum
        min: i64,
        /// Inclusive maximum, if bounded above
        max: Option<i64>,
    },
    /// Enumerated string not in the allowed set
    InvalidVariant {
        /// Offending literal
        value: String,
        /// Allowed literals
        allowed: &'static [&'static str],
    },
    /// Quantity string could not be parsed or converted
    Quantity(QuantityError),
    /// Sequence that must contain at least one item is empty
    EmptySequence,
    /// Sequence holds more items than the firmware table allows
    TooManyItems {
        /// Capacity of the firmware table
        max: usize,
        /// Number of items supplied
        found: usize,
    },
    /// Group name not part of a closed set of groups
    UnknownGroup,
    /// Document root (or a required record) is not a mapping
    NotARecord,
}

impl SchemaError {
    /// Create a new schema error at `path`.
    pub fn new(path: impl Into<String>, kind: SchemaErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{}: {}", path, self.kind)
    }
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaErrorKind::Missing => write!(f, "field required"),
            SchemaErrorKind::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            SchemaErrorKind::OutOfBounds { value, min, max: Some(max) } => {
                write!(f, "value {} out of bounds, must be in [{}, {}]", value, min, max)
            }
            SchemaErrorKind::OutOfBounds { value, min, max: None } => {
                write!(f, "value {} out of bounds, must be >= {}", value, min)
            }
            SchemaErrorKind::InvalidVariant { value, allowed } => {
                write!(f, "'{}' is not one of: {}", value, allowed.join(", "))
            }
            SchemaErrorKind::Quantity(e) => write!(f, "{}", e),
            SchemaErrorKind::EmptySequence => write!(f, "at least one item is required"),
            SchemaErrorKind::TooManyItems { max, found } => {
                write!(f, "{} items given, the firmware holds at most {}", found, max)
            }
            SchemaErrorKind::UnknownGroup => write!(f, "unknown group"),
            SchemaErrorKind::NotARecord => write!(f, "expected a mapping of fields"),
        }
    }
}

/// Every schema violation found in one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaErrors(Vec<SchemaError>);

impl SchemaErrors {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation.
    pub fn push(&mut self, error: SchemaError) {
        self.0.push(error);
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the violations in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Whether any violation was recorded at exactly `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Conversion impls
impl From<SchemaErrors> for Error {
    fn from(e: SchemaErrors) -> Self {
        Error::Schema(e)
    }
}

impl From<QuantityError> for SchemaErrorKind {
    fn from(e: QuantityError) -> Self {
        SchemaErrorKind::Quantity(e)
    }
}
