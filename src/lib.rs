//! # bbsxtra-programmer
//!
//! Compiles a YAML motor-controller configuration into the `fwconfig.h`
//! header consumed by the BBS02/BBSHD firmware.
//!
//! ## Features
//!
//! - **Typed schema**: every field is checked for presence, type, bounds and
//!   allowed values, and all violations are reported together
//! - **Unit-aware**: quantities such as `"36V"`, `"4km/h"` or `"85 degC"` are
//!   normalized into the unit the firmware expects
//! - **Deterministic output**: the same input always yields the same header,
//!   byte for byte
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bbsxtra_programmer::{generate_constants, load_config, write_header, UnitRegistry};
//!
//! let units = UnitRegistry::new();
//! let config = load_config("bbshd.yaml", &units)?;
//! let constants = generate_constants(&config)?;
//! write_header("fwconfig.h", constants.as_slice())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod generate;
pub mod header;

// Re-exports for ergonomic API
pub use config::{load_config, parse_config, FirmwareConfig, UnitRegistry};
pub use error::{Error, QuantityError, Result, SchemaError, SchemaErrorKind, SchemaErrors};
pub use generate::{assist_level_constants, generate_constants, run};
pub use header::{
    render_header, write_header, ConstantSet, ConstantValue, SymbolicConstant, HEADER_FILE_NAME,
};
