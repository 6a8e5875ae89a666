//! Output writers. Every format renders a [`Record`] to a `String`; files
//! are written atomically.

pub mod json;
pub mod lua;
pub mod manifest;
pub mod xml;
pub mod ycl;

use std::io::Write;
use std::path::Path;

use crate::config::OutputFormat;
use crate::error::ExportError;
use crate::record::Record;

pub use xml::{XmlDocument, XmlElement};

pub fn render(record: &Record, format: OutputFormat) -> Result<String, ExportError> {
    match format {
        OutputFormat::Json => json::to_json(&record.data),
        OutputFormat::Xml => xml::to_xml(record),
        OutputFormat::Lua => Ok(lua::to_lua(&record.data)),
        OutputFormat::Ycl => Ok(ycl::to_ycl(&record.data)),
    }
}

/// Write `contents` through a temp file in the target folder, then rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ExportError::write(dir, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ExportError::write(path, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| ExportError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| ExportError::write(path, e.error))?;
    Ok(())
}

/// `"\n"` followed by two spaces per level.
pub(crate) fn newline(out: &mut String, indent: usize) {
    out.push('\n');
    for _ in 0..indent {
        out.push_str("  ");
    }
}

/// Scalars as JSON literals, shared by the Lua and YCL writers.
pub(crate) fn scalar_literal(value: &cellcast_common::Scalar) -> String {
    use cellcast_common::Scalar;
    match value {
        Scalar::Int(i) => i.to_string(),
        Scalar::Double(d) => serde_json::Value::from(*d).to_string(),
        Scalar::Str(s) => serde_json::Value::from(s.as_str()).to_string(),
        Scalar::Bool(b) => b.to_string(),
    }
}
