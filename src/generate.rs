//! Configuration to header pipeline.
//!
//! Constants are produced in two walks over the validated configuration:
//!
//! 1. the assist level tables, `standard` then `sport`, each level numbered
//!    by its position: `ASSIST_LEVEL_<TYPE>_<INDEX>_<FIELD>`;
//! 2. every other field, named by its uppercase record path:
//!    `BATTERY_SOC_OFFSET_PERCENT_EMPTY`.

use std::path::Path;

use tracing::{debug, info};

use crate::config::{load_config, FirmwareConfig, PedalAssistLevels, UnitRegistry};
use crate::error::Result;
use crate::header::{write_header, ConstantPath, ConstantSet, ToConstants};

/// Name prefix of the assist level constants.
pub const ASSIST_LEVEL_PREFIX: &str = "assist_level";

/// Append one constant per field of every assist level.
pub fn assist_level_constants(levels: &PedalAssistLevels, out: &mut ConstantSet) -> Result<()> {
    let prefix = ConstantPath::root().key(ASSIST_LEVEL_PREFIX);
    for (level_type, table) in levels.types() {
        let type_path = prefix.key(level_type);
        for (index, level) in table.levels.iter().enumerate() {
            level.to_constants(&type_path.index(index), out)?;
        }
    }
    Ok(())
}

/// Build the full, ordered constant set for a configuration.
///
/// # Errors
///
/// Returns [`crate::Error::DuplicateConstant`] if two leaves share a name.
pub fn generate_constants(config: &FirmwareConfig) -> Result<ConstantSet> {
    let mut constants = ConstantSet::new();

    assist_level_constants(&config.pedal_assist_levels, &mut constants)?;
    let assist_count = constants.len();
    debug!(
        levels = config.pedal_assist_levels.level_count(),
        constants = assist_count,
        "assist level constants generated"
    );

    config.to_constants(&ConstantPath::root(), &mut constants)?;
    debug!(
        constants = constants.len() - assist_count,
        "configuration constants generated"
    );

    Ok(constants)
}

/// Read `input`, validate it and write the header to `output`.
///
/// Nothing is written unless validation and constant generation succeed.
/// Returns the number of `#define`s written.
pub fn run<I: AsRef<Path>, O: AsRef<Path>>(
    input: I,
    output: O,
    units: &UnitRegistry,
) -> Result<usize> {
    let config = load_config(input, units)?;
    let constants = generate_constants(&config)?;
    write_header(output.as_ref(), constants.as_slice())?;

    info!(
        output = %output.as_ref().display(),
        defines = constants.len(),
        "firmware header generated"
    );
    Ok(constants.len())
}
