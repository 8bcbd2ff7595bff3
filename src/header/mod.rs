//! Header generation for the firmware build.
//!
//! Maps validated configuration leaves to symbolic constants and writes them
//! as `#define`s into `fwconfig.h`.

mod constants;
mod emitter;
mod naming;

pub use constants::{ConstantSet, ConstantValue, SymbolicConstant, ToConstants};
pub use emitter::{render_header, write_header, HeaderWriter, HEADER_FILE_NAME, INCLUDE_GUARD};
pub use naming::ConstantPath;

pub(crate) use constants::{record_constants, record_fields};
