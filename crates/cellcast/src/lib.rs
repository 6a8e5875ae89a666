//! Meta crate that re-exports the cellcast layers. Depend on this crate and
//! pick layers through feature flags; the underlying crates stay reachable
//! for deeper integration.

#[cfg(feature = "common")]
pub use cellcast_common as common;

#[cfg(feature = "parse")]
pub use cellcast_parse as parse;

#[cfg(feature = "workbook")]
pub use cellcast_workbook as workbook;

#[cfg(feature = "export")]
pub use cellcast_export as export;

#[cfg(feature = "common")]
pub use cellcast_common::{CellValue, Key, Location, Scalar, Value};

#[cfg(feature = "parse")]
pub use cellcast_parse::{TypeDescriptor, parse_type};

#[cfg(feature = "workbook")]
pub use cellcast_workbook::{Sheet, Workbook};

#[cfg(feature = "export")]
pub use cellcast_export::{ExportConfig, ExportError, ExportSummary, Exporter, OutputFormat};
