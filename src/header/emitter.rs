//! `fwconfig.h` writer.
//!
//! Layout, byte for byte:
//!
//! ```text
//! #ifndef _FWCONFIG_H_
//!   #define _FWCONFIG_H_
//!
//!   #define NAME VALUE
//!
//! #endif
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

use super::constants::SymbolicConstant;

/// Include guard symbol.
pub const INCLUDE_GUARD: &str = "_FWCONFIG_H_";

/// Default output file name.
pub const HEADER_FILE_NAME: &str = "fwconfig.h";

const INDENT: &str = "  ";

/// Streams a header with include guard into any writer.
pub struct HeaderWriter<W: Write> {
    inner: W,
}

impl<W: Write> HeaderWriter<W> {
    /// Write the guard opening and return the writer.
    pub fn open(inner: W) -> io::Result<Self> {
        let mut writer = Self { inner };
        writer.write_line(&format!("#ifndef {}", INCLUDE_GUARD), 0)?;
        writer.write_line(&format!("#define {}", INCLUDE_GUARD), 1)?;
        writer.write_line("", 0)?;
        Ok(writer)
    }

    fn write_line(&mut self, line: &str, indentation: usize) -> io::Result<()> {
        writeln!(self.inner, "{}{}", INDENT.repeat(indentation), line)
    }

    /// Write one `#define`.
    pub fn define(&mut self, constant: &SymbolicConstant) -> io::Result<()> {
        self.write_line(&format!("#define {} {}", constant.name, constant.value), 1)
    }

    /// Write the guard closing, flush, and hand back the writer.
    pub fn close(mut self) -> io::Result<W> {
        self.write_line("", 0)?;
        self.write_line("#endif", 0)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn write_all<W: Write>(inner: W, constants: &[SymbolicConstant]) -> io::Result<W> {
    let mut writer = HeaderWriter::open(inner)?;
    for constant in constants {
        writer.define(constant)?;
    }
    writer.close()
}

/// Render the complete header text.
pub fn render_header(constants: &[SymbolicConstant]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_all(&mut buf, constants);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Create or truncate `path` and write the header into it.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn write_header<P: AsRef<Path>>(path: P, constants: &[SymbolicConstant]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_all(BufWriter::new(file), constants).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), defines = constants.len(), "header written");
    Ok(())
}
