//! Export annotated workbooks to json, xml, lua or ycl config files.
//!
//! Sheets named `Title|mark` are exported. A sheet whose first row names
//! `name`, `value` and `type` columns becomes one mapping; any other marked
//! sheet is read row by row into a list (or a nested mapping with `map`).

pub mod builder;
pub mod config;
pub mod constraint;
pub mod emit;
pub mod error;
pub mod exporter;
pub mod extract;
pub mod record;

pub use builder::{Parent, RecordBuilder};
pub use config::{ExportConfig, OutputFormat};
pub use constraint::Constraint;
pub use error::{BuildError, ExportError};
pub use exporter::{ExportSummary, Exporter};
pub use record::Record;

// Re-export for convenience
pub use cellcast_workbook::Workbook;
